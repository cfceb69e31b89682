//! Idol roster: listing, locking and retirement.

use chrono::Utc;
use idolsim_core::error::CoreError;
use idolsim_core::idol;
use idolsim_core::types::DbId;
use idolsim_db::models::idol::{Idol, OwnedIdol};
use idolsim_db::repositories::{DeckRepo, IdolRepo, UserRepo};
use serde::Serialize;

use crate::engine::retry_on_conflict;
use crate::engine::stamina::lock_user;
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetireResult {
    pub success: bool,
    pub retired_idol_id: DbId,
    pub removed_from_deck: bool,
}

fn idol_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "idol", id }
}

pub async fn list(state: &AppState, user_id: DbId) -> AppResult<Vec<OwnedIdol>> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: user_id,
        })?;
    Ok(IdolRepo::list_for_user(&state.pool, user_id).await?)
}

/// Lock or unlock an idol against retirement.
pub async fn set_locked(
    state: &AppState,
    user_id: DbId,
    idol_id: DbId,
    locked: bool,
) -> AppResult<Idol> {
    let _guard = state.user_locks.acquire(user_id).await;
    let mut tx = state.pool.begin().await?;
    lock_user(&mut tx, user_id, Utc::now()).await?;
    let idol = IdolRepo::set_locked(&mut tx, user_id, idol_id, locked)
        .await?
        .ok_or_else(|| idol_not_found(idol_id))?;
    tx.commit().await?;

    tracing::info!(user_id, idol_id, locked, "Idol lock changed");
    Ok(idol)
}

/// Delete an unlocked idol, taking it out of the deck first.
pub async fn retire(state: &AppState, user_id: DbId, idol_id: DbId) -> AppResult<RetireResult> {
    let _guard = state.user_locks.acquire(user_id).await;
    let result = retry_on_conflict("idol_retire", || retire_once(state, user_id, idol_id)).await?;

    tracing::info!(
        user_id,
        idol_id,
        removed_from_deck = result.removed_from_deck,
        "Idol retired"
    );
    Ok(result)
}

async fn retire_once(state: &AppState, user_id: DbId, idol_id: DbId) -> AppResult<RetireResult> {
    let mut tx = state.pool.begin().await?;
    lock_user(&mut tx, user_id, Utc::now()).await?;

    let idol = IdolRepo::find_owned(&mut *tx, user_id, idol_id)
        .await?
        .ok_or_else(|| idol_not_found(idol_id))?;
    idol::ensure_retirable(idol.id, idol.is_locked)?;

    let removed_from_deck = DeckRepo::remove_idol(&mut tx, user_id, idol_id).await?;
    if !IdolRepo::delete_unlocked(&mut tx, user_id, idol_id).await? {
        // Lost a race with a lock or a concurrent retire; report what is there now.
        drop(tx);
        let current = IdolRepo::find_owned(&state.pool, user_id, idol_id)
            .await?
            .ok_or_else(|| idol_not_found(idol_id))?;
        idol::ensure_retirable(current.id, current.is_locked)?;
        return Err(CoreError::Raced(format!("Idol {idol_id} changed during retirement")).into());
    }
    tx.commit().await?;

    Ok(RetireResult {
        success: true,
        retired_idol_id: idol_id,
        removed_from_deck,
    })
}
