//! Work/job resolution.
//!
//! A job costs stamina and pays money, experience and affection. The deck
//! composition matters through the "great success" roll:
//!
//! - every job has a flat [`GREAT_SUCCESS_BASE_CHANCE`];
//! - a typed job whose deck has at least [`TYPE_MATCH_THRESHOLD`] matching
//!   idols gets a second, independent [`TYPE_MATCH_BONUS_CHANCE`] roll.
//!
//! Either roll succeeding is a great success. `ALL` jobs match every idol
//! but never get the second roll.

use rand::Rng;
use serde::Serialize;

use crate::catalog::{IdolType, WorkJob};
use crate::error::CoreError;
use crate::items::roll_work_drop;
use crate::ledger::LedgerDelta;
use crate::stamina::{ensure_available, StaminaState};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Chance of a great success for any deck.
pub const GREAT_SUCCESS_BASE_CHANCE: f64 = 0.10;

/// Matching idols required before the type bonus roll is available.
pub const TYPE_MATCH_THRESHOLD: usize = 3;

/// Chance of the type bonus roll.
pub const TYPE_MATCH_BONUS_CHANCE: f64 = 0.40;

/// Great success multiplier applied to money and exp, as a fraction.
pub const GREAT_SUCCESS_NUMERATOR: i64 = 3;
pub const GREAT_SUCCESS_DENOMINATOR: i64 = 2;

/// Affection granted to each deck member.
pub const AFFECTION_NORMAL: i32 = 1;
pub const AFFECTION_GREAT: i32 = 2;

/// Chance that a job drops one item, independent of the success tier.
pub const ITEM_DROP_CHANCE: f64 = 0.15;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A deck member as seen by the work resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkMember {
    pub idol_id: DbId,
    pub idol_type: IdolType,
}

/// Everything a single job execution grants and costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOutcome {
    pub job_id: DbId,
    pub great_success: bool,
    pub matched_count: usize,
    pub stamina_cost: i32,
    pub money: i64,
    pub exp: i64,
    pub affection_per_idol: i32,
    pub affected_idols: Vec<DbId>,
    pub dropped_item: Option<String>,
    pub event_points: i64,
}

impl WorkOutcome {
    /// Ledger delta that commits this outcome.
    pub fn to_delta(&self) -> LedgerDelta {
        let mut delta = LedgerDelta::new()
            .stamina(-self.stamina_cost)
            .money(self.money)
            .exp(self.exp);
        for idol_id in &self.affected_idols {
            delta = delta.affection(*idol_id, self.affection_per_idol);
        }
        if let Some(item) = &self.dropped_item {
            delta = delta.item(item.clone(), 1);
        }
        delta
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Number of deck members whose type satisfies the job.
pub fn count_matches(job: &WorkJob, members: &[WorkMember]) -> usize {
    members
        .iter()
        .filter(|m| job.job_type.matches(m.idol_type))
        .count()
}

/// Whether the deck earns the second great-success roll.
pub fn bonus_roll_eligible(job: &WorkJob, matched: usize) -> bool {
    job.job_type.favored().is_some() && matched >= TYPE_MATCH_THRESHOLD
}

/// Apply the great success multiplier, rounding down.
pub fn boosted(amount: i64) -> i64 {
    amount * GREAT_SUCCESS_NUMERATOR / GREAT_SUCCESS_DENOMINATOR
}

/// Resolve one execution of `job` for a deck.
///
/// Rolls are drawn in a fixed order (base, bonus, drop, drop item) so a
/// seeded generator reproduces the same outcome.
pub fn resolve<R: Rng + ?Sized>(
    rng: &mut R,
    job: &WorkJob,
    members: &[WorkMember],
    stamina: &StaminaState,
) -> Result<WorkOutcome, CoreError> {
    ensure_available(stamina, job.stamina_cost)?;

    let matched = count_matches(job, members);
    let base_hit = rng.random_bool(GREAT_SUCCESS_BASE_CHANCE);
    let bonus_hit = rng.random_bool(TYPE_MATCH_BONUS_CHANCE);
    let great_success = base_hit || (bonus_roll_eligible(job, matched) && bonus_hit);

    let dropped_item = if rng.random_bool(ITEM_DROP_CHANCE) {
        Some(roll_work_drop(rng).to_string())
    } else {
        None
    };

    let (money, exp, affection, event_points) = if great_success {
        (
            boosted(job.base_money),
            boosted(job.base_exp),
            AFFECTION_GREAT,
            boosted(job.base_event_points),
        )
    } else {
        (job.base_money, job.base_exp, AFFECTION_NORMAL, job.base_event_points)
    };

    Ok(WorkOutcome {
        job_id: job.id,
        great_success,
        matched_count: matched,
        stamina_cost: job.stamina_cost,
        money,
        exp,
        affection_per_idol: affection,
        affected_idols: members.iter().map(|m| m.idol_id).collect(),
        dropped_item,
        event_points: if job.event_id.is_some() { event_points } else { 0 },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
