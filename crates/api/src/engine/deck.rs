//! Deck view and replacement.

use chrono::Utc;
use idolsim_core::deck::{Deck, DECK_SIZE};
use idolsim_core::error::CoreError;
use idolsim_core::types::DbId;
use idolsim_db::repositories::{DeckRepo, IdolRepo, UserRepo};

use crate::engine::retry_on_conflict;
use crate::engine::stamina::lock_user;
use crate::error::AppResult;
use crate::state::AppState;

/// Deck slots as the client expects them: ids as strings, empty slots null.
pub async fn get(state: &AppState, user_id: DbId) -> AppResult<[Option<String>; DECK_SIZE]> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: user_id,
        })?;
    let deck = DeckRepo::get(&state.pool, user_id).await?;
    Ok(deck.as_client_slots())
}

/// Replace the whole deck with `card_ids`, in order.
pub async fn set(state: &AppState, user_id: DbId, card_ids: Vec<DbId>) -> AppResult<Deck> {
    let deck = Deck::from_ids(&card_ids)?;
    let _guard = state.user_locks.acquire(user_id).await;
    retry_on_conflict("deck_set", || replace(state, user_id, &deck)).await?;

    tracing::info!(user_id, members = deck.len(), "Deck updated");
    Ok(deck)
}

async fn replace(state: &AppState, user_id: DbId, deck: &Deck) -> AppResult<()> {
    let mut tx = state.pool.begin().await?;
    lock_user(&mut tx, user_id, Utc::now()).await?;

    let members = deck.members();
    let owned = IdolRepo::owned_ids(&mut *tx, user_id, &members).await?;
    if let Some(missing) = members.iter().find(|id| !owned.contains(id)) {
        return Err(CoreError::NotFound {
            entity: "idol",
            id: *missing,
        }
        .into());
    }

    DeckRepo::replace(&mut tx, user_id, deck).await?;
    tx.commit().await?;
    Ok(())
}
