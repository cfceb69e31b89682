//! Work region listing and job execution.

use chrono::Utc;
use idolsim_core::catalog::{WorkJob, WorkRegion};
use idolsim_core::error::CoreError;
use idolsim_core::types::DbId;
use idolsim_core::work::{self, WorkMember, WorkOutcome};
use idolsim_db::repositories::{DeckRepo, LedgerRepo};
use serde::Serialize;

use crate::engine::events::credit_points;
use crate::engine::stamina::lock_user;
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkResult {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: WorkOutcome,
    /// Event total after this job, when it fed a running event.
    pub event_points_total: Option<i64>,
    pub stamina: i32,
    pub max_stamina: i32,
    pub money: i64,
    pub level: i32,
    pub exp: i64,
    pub levels_gained: i32,
}

pub fn regions(state: &AppState) -> Vec<WorkRegion> {
    state.catalog.current().regions().to_vec()
}

pub fn jobs(state: &AppState, region_id: DbId) -> AppResult<Vec<WorkJob>> {
    let catalog = state.catalog.current();
    if catalog.region(region_id).is_none() {
        return Err(CoreError::NotFound {
            entity: "work_region",
            id: region_id,
        }
        .into());
    }
    Ok(catalog
        .jobs_in_region(region_id)
        .into_iter()
        .cloned()
        .collect())
}

/// Run one job with the user's current deck.
pub async fn execute(state: &AppState, user_id: DbId, job_id: DbId) -> AppResult<WorkResult> {
    let catalog = state.catalog.current();
    let job = catalog.job(job_id).ok_or(CoreError::NotFound {
        entity: "work_job",
        id: job_id,
    })?;
    let unlock_level = catalog
        .region(job.region_id)
        .map_or(1, |r| r.unlock_level);

    let _guard = state.user_locks.acquire(user_id).await;
    let now = Utc::now();
    let mut tx = state.pool.begin().await?;
    let user = lock_user(&mut tx, user_id, now).await?;

    if user.level < unlock_level {
        return Err(CoreError::Validation(format!(
            "Region {} unlocks at level {unlock_level}",
            job.region_id
        ))
        .into());
    }

    let members = DeckRepo::cards(&mut *tx, user_id)
        .await?
        .iter()
        .map(|card| {
            Ok(WorkMember {
                idol_id: card.idol_id,
                idol_type: card.idol_type()?,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    let outcome = {
        let mut rng = state.dice.rng();
        work::resolve(&mut rng, job, &members, &user.stamina_state())?
    };

    let applied = LedgerRepo::apply(&mut tx, &user, &outcome.to_delta()).await?;

    let event_points_total = match job.event_id {
        Some(event_id) if outcome.event_points > 0 => {
            credit_points(&mut tx, event_id, user_id, outcome.event_points, now).await?
        }
        _ => None,
    };

    tx.commit().await?;

    tracing::info!(
        user_id,
        job_id,
        great_success = outcome.great_success,
        matched = outcome.matched_count,
        dropped_item = outcome.dropped_item.as_deref(),
        "Work executed"
    );

    let balances = applied.balances;
    Ok(WorkResult {
        success: true,
        outcome,
        event_points_total,
        stamina: balances.stamina,
        max_stamina: balances.max_stamina,
        money: balances.money,
        level: balances.level,
        exp: balances.exp,
        levels_gained: applied.levels_gained,
    })
}
