//! Time-limited events: point accumulation, reward tiers and ranking.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::reward::RewardBundle;
use crate::types::{DbId, Timestamp};

/// Half-open activity window `[starts_at, ends_at)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWindow {
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

impl EventWindow {
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.starts_at <= now && now < self.ends_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardTier {
    pub threshold: i64,
    pub reward: RewardBundle,
}

/// Tier thresholds must be positive and strictly increasing.
pub fn validate_tiers(tiers: &[RewardTier]) -> Result<(), CoreError> {
    let mut previous = 0;
    for tier in tiers {
        if tier.threshold <= previous {
            return Err(CoreError::Validation(format!(
                "Tier thresholds must be positive and increasing (found {} after {previous})",
                tier.threshold
            )));
        }
        if !tier.reward.is_non_negative() {
            return Err(CoreError::Validation(format!(
                "Tier {} reward must not be negative",
                tier.threshold
            )));
        }
        previous = tier.threshold;
    }
    Ok(())
}

/// New point total after a qualifying action.
///
/// Points only move forward and only while the event is running.
pub fn add_points(
    current: i64,
    amount: i64,
    window: &EventWindow,
    now: Timestamp,
) -> Result<i64, CoreError> {
    if amount < 0 {
        return Err(CoreError::Validation(
            "Event points cannot be negative".to_string(),
        ));
    }
    if !window.is_active(now) {
        return Err(CoreError::Conflict("Event is not running".to_string()));
    }
    Ok(current.saturating_add(amount))
}

/// Client view of one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierStatus {
    pub threshold: i64,
    pub reward: RewardBundle,
    pub reached: bool,
    pub claimed: bool,
}

pub fn tier_statuses(tiers: &[RewardTier], points: i64, claimed: &[i64]) -> Vec<TierStatus> {
    tiers
        .iter()
        .map(|t| TierStatus {
            threshold: t.threshold,
            reward: t.reward.clone(),
            reached: points >= t.threshold,
            claimed: claimed.contains(&t.threshold),
        })
        .collect()
}

/// Pick the tier at `threshold` for claiming.
///
/// Fails if no such tier exists, it has not been reached, or it was
/// already claimed.
pub fn claimable_tier<'a>(
    tiers: &'a [RewardTier],
    points: i64,
    threshold: i64,
    already_claimed: bool,
) -> Result<&'a RewardTier, CoreError> {
    let tier = tiers
        .iter()
        .find(|t| t.threshold == threshold)
        .ok_or_else(|| CoreError::Validation(format!("No reward tier at {threshold} points")))?;
    if already_claimed {
        return Err(CoreError::Conflict(format!(
            "Tier {threshold} has already been claimed"
        )));
    }
    if points < tier.threshold {
        return Err(CoreError::Validation(format!(
            "Tier {threshold} not reached ({points} points)"
        )));
    }
    Ok(tier)
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// One participant's progress as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub user_id: DbId,
    pub points: i64,
    /// When the current total was reached.
    pub reached_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedStanding {
    pub rank: usize,
    pub user_id: DbId,
    pub points: i64,
}

/// Order participants by points (descending), then by who reached their
/// total first, then by user id. Ranks are 1-based and unique.
pub fn rank(mut standings: Vec<Standing>) -> Vec<RankedStanding> {
    standings.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(a.reached_at.cmp(&b.reached_at))
            .then(a.user_id.cmp(&b.user_id))
    });
    standings
        .into_iter()
        .enumerate()
        .map(|(i, s)| RankedStanding {
            rank: i + 1,
            user_id: s.user_id,
            points: s.points,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn t(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn window() -> EventWindow {
        EventWindow {
            starts_at: t(0),
            ends_at: t(0) + Duration::days(7),
        }
    }

    fn tiers() -> Vec<RewardTier> {
        vec![
            RewardTier {
                threshold: 100,
                reward: RewardBundle::money(1_000),
            },
            RewardTier {
                threshold: 500,
                reward: RewardBundle::star_jewels(50),
            },
        ]
    }

    #[test]
    fn points_accumulate_only_while_running() {
        assert_eq!(add_points(10, 5, &window(), t(60)).unwrap(), 15);
        assert_matches!(add_points(10, 5, &window(), t(-1)), Err(CoreError::Conflict(_)));
        assert_matches!(
            add_points(10, 5, &window(), window().ends_at),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(add_points(10, -1, &window(), t(60)), Err(CoreError::Validation(_)));
    }

    #[test]
    fn tier_claim_rules() {
        let tiers = tiers();
        assert_eq!(claimable_tier(&tiers, 150, 100, false).unwrap().threshold, 100);
        assert_matches!(claimable_tier(&tiers, 150, 500, false), Err(CoreError::Validation(_)));
        assert_matches!(claimable_tier(&tiers, 150, 100, true), Err(CoreError::Conflict(_)));
        assert_matches!(claimable_tier(&tiers, 999, 250, false), Err(CoreError::Validation(_)));
    }

    #[test]
    fn statuses_reflect_points_and_claims() {
        let statuses = tier_statuses(&tiers(), 120, &[100]);
        assert!(statuses[0].reached && statuses[0].claimed);
        assert!(!statuses[1].reached && !statuses[1].claimed);
    }

    #[test]
    fn tiers_must_increase() {
        assert!(validate_tiers(&tiers()).is_ok());
        let mut bad = tiers();
        bad[1].threshold = 100;
        assert!(validate_tiers(&bad).is_err());
    }

    #[test]
    fn ranking_breaks_ties_by_earliest_arrival() {
        let ranked = rank(vec![
            Standing { user_id: 1, points: 300, reached_at: t(50) },
            Standing { user_id: 2, points: 500, reached_at: t(90) },
            Standing { user_id: 3, points: 300, reached_at: t(10) },
            Standing { user_id: 4, points: 300, reached_at: t(10) },
        ]);
        let order: Vec<DbId> = ranked.iter().map(|r| r.user_id).collect();
        assert_eq!(order, vec![2, 3, 4, 1]);
        assert_eq!(ranked.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }
}
