//! Present box: pending rewards and their claiming.

use chrono::Utc;
use idolsim_core::error::CoreError;
use idolsim_core::ledger::{Balances, LedgerDelta};
use idolsim_core::types::DbId;
use idolsim_db::models::present::Present;
use idolsim_db::repositories::{LedgerRepo, PresentRepo, UserRepo};
use serde::Serialize;
use sqlx::PgConnection;

use crate::engine::stamina::lock_user;
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentClaim {
    pub success: bool,
    pub claimed: Vec<Present>,
    pub balances: Balances,
    pub levels_gained: i32,
}

pub async fn list(state: &AppState, user_id: DbId) -> AppResult<Vec<Present>> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: user_id,
        })?;
    Ok(PresentRepo::list_for_user(&state.pool, user_id).await?)
}

pub async fn claim_one(
    state: &AppState,
    user_id: DbId,
    present_id: DbId,
) -> AppResult<PresentClaim> {
    let _guard = state.user_locks.acquire(user_id).await;
    let mut tx = state.pool.begin().await?;
    let taken = PresentRepo::take(&mut tx, user_id, present_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "present",
            id: present_id,
        })?;
    let claim = grant(&mut tx, user_id, vec![taken]).await?;
    tx.commit().await?;

    tracing::info!(user_id, present_id, "Present claimed");
    Ok(claim)
}

/// Claim everything in the box. An empty box succeeds with nothing claimed.
pub async fn claim_all(state: &AppState, user_id: DbId) -> AppResult<PresentClaim> {
    let _guard = state.user_locks.acquire(user_id).await;
    let mut tx = state.pool.begin().await?;
    let taken = PresentRepo::take_all(&mut tx, user_id).await?;
    let claim = grant(&mut tx, user_id, taken).await?;
    tx.commit().await?;

    tracing::info!(user_id, count = claim.claimed.len(), "Presents claimed");
    Ok(claim)
}

/// Apply the merged delta of `presents`, which the caller already deleted.
async fn grant(
    conn: &mut PgConnection,
    user_id: DbId,
    presents: Vec<Present>,
) -> AppResult<PresentClaim> {
    let user = lock_user(&mut *conn, user_id, Utc::now()).await?;
    let mut delta = LedgerDelta::new();
    for present in &presents {
        delta = delta.merge(present.to_delta()?);
    }
    let applied = LedgerRepo::apply(conn, &user, &delta).await?;

    Ok(PresentClaim {
        success: true,
        claimed: presents,
        balances: applied.balances,
        levels_gained: applied.levels_gained,
    })
}
