//! Lazy stamina regeneration.
//!
//! Stamina is never ticked by a background job. Instead every request that
//! reads or spends stamina first calls [`recompute`] with the current time,
//! which grants whatever whole regeneration intervals have elapsed since the
//! last update.

use chrono::Duration;

use crate::error::{CoreError, Resource};
use crate::types::Timestamp;

/// Seconds needed to regenerate one point of stamina.
pub const REGEN_INTERVAL_SECS: i64 = 300;

/// Stamina fields of a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaminaState {
    pub stamina: i32,
    pub max_stamina: i32,
    pub last_update: Timestamp,
}

impl StaminaState {
    pub fn is_full(&self) -> bool {
        self.stamina >= self.max_stamina
    }
}

/// Bring `state` up to date as of `now`.
///
/// - Full stamina only refreshes the timestamp.
/// - Otherwise `floor(elapsed / REGEN_INTERVAL_SECS)` points are granted
///   (capped at `max_stamina`) and the timestamp advances by exactly those
///   whole intervals, so partial progress toward the next point survives.
/// - A `now` earlier than the stored timestamp changes nothing.
///
/// Calling this twice with the same `now` yields the same state as calling
/// it once.
pub fn recompute(state: StaminaState, now: Timestamp) -> StaminaState {
    if now < state.last_update {
        return state;
    }

    if state.is_full() {
        return StaminaState {
            last_update: now,
            ..state
        };
    }

    let elapsed = (now - state.last_update).num_seconds();
    let intervals = elapsed / REGEN_INTERVAL_SECS;
    if intervals < 1 {
        return state;
    }

    let missing = i64::from(state.max_stamina - state.stamina);
    let gained = intervals.min(missing) as i32;

    StaminaState {
        stamina: state.stamina + gained,
        max_stamina: state.max_stamina,
        last_update: state.last_update + Duration::seconds(intervals * REGEN_INTERVAL_SECS),
    }
}

/// Seconds until the next point regenerates, or `None` when already full.
pub fn seconds_until_next(state: &StaminaState, now: Timestamp) -> Option<i64> {
    if state.is_full() {
        return None;
    }
    let elapsed = (now - state.last_update).num_seconds().max(0);
    Some(REGEN_INTERVAL_SECS - elapsed % REGEN_INTERVAL_SECS)
}

/// Check that `cost` stamina is available.
pub fn ensure_available(state: &StaminaState, cost: i32) -> Result<(), CoreError> {
    if state.stamina < cost {
        return Err(CoreError::insufficient(
            Resource::Stamina,
            i64::from(cost),
            i64::from(state.stamina),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> Timestamp {
        chrono::Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn state(stamina: i32, max_stamina: i32, last: i64) -> StaminaState {
        StaminaState {
            stamina,
            max_stamina,
            last_update: at(last),
        }
    }

    #[test]
    fn full_stamina_only_refreshes_timestamp() {
        let next = recompute(state(50, 50, 0), at(10_000));
        assert_eq!(next.stamina, 50);
        assert_eq!(next.last_update, at(10_000));
    }

    #[test]
    fn less_than_one_interval_changes_nothing() {
        let s = state(10, 50, 0);
        assert_eq!(recompute(s, at(REGEN_INTERVAL_SECS - 1)), s);
    }

    #[test]
    fn whole_intervals_are_granted_and_remainder_kept() {
        let next = recompute(state(10, 50, 0), at(3 * REGEN_INTERVAL_SECS + 42));
        assert_eq!(next.stamina, 13);
        assert_eq!(next.last_update, at(3 * REGEN_INTERVAL_SECS));
        assert_eq!(seconds_until_next(&next, at(3 * REGEN_INTERVAL_SECS + 42)), Some(258));
    }

    #[test]
    fn grant_is_capped_at_max() {
        let next = recompute(state(48, 50, 0), at(100 * REGEN_INTERVAL_SECS));
        assert_eq!(next.stamina, 50);
    }

    #[test]
    fn repeated_calls_at_same_instant_are_idempotent() {
        let now = at(7 * REGEN_INTERVAL_SECS + 5);
        let once = recompute(state(0, 50, 0), now);
        let twice = recompute(once, now);
        assert_eq!(once, twice);
        assert_eq!(twice.stamina, 7);
    }

    #[test]
    fn clock_going_backwards_is_ignored() {
        let s = state(5, 50, 1_000);
        assert_eq!(recompute(s, at(0)), s);
    }

    #[test]
    fn never_reduces_never_exceeds_max_over_elapsed_range() {
        for start in [0, 1, 25, 49, 50] {
            for elapsed in (0..40_000).step_by(137) {
                let before = state(start, 50, 0);
                let after = recompute(before, at(elapsed));
                assert!(after.stamina >= before.stamina);
                assert!(after.stamina <= after.max_stamina);
                assert!(after.last_update >= before.last_update);
            }
        }
    }

    #[test]
    fn ensure_available_reports_shortfall() {
        let err = ensure_available(&state(3, 50, 0), 10).unwrap_err();
        match err {
            CoreError::InsufficientResource {
                resource,
                required,
                available,
            } => {
                assert_eq!(resource, Resource::Stamina);
                assert_eq!(required, 10);
                assert_eq!(available, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
