//! User creation and profile reads.

use std::collections::BTreeMap;

use chrono::Utc;
use idolsim_core::deck::{Deck, DECK_SIZE};
use idolsim_core::error::CoreError;
use idolsim_core::idol;
use idolsim_core::types::DbId;
use idolsim_db::models::idol::Idol;
use idolsim_db::models::user::{CreateUser, User};
use idolsim_db::repositories::{DeckRepo, IdolRepo, InventoryRepo, UserRepo};
use serde::Serialize;

use crate::engine::stamina::{lock_user, StaminaView};
use crate::error::AppResult;
use crate::state::AppState;

/// Longest accepted producer name, in characters.
pub const MAX_NAME_LEN: usize = 32;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub user: User,
    pub idols: Vec<Idol>,
    pub deck: [Option<String>; DECK_SIZE],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub items: BTreeMap<String, i64>,
    pub stamina_status: StaminaView,
}

fn validate_name(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Create a producer with default balances and one starter idol per type,
/// all placed in the deck.
pub async fn create(state: &AppState, name: &str) -> AppResult<NewUser> {
    let input = CreateUser {
        name: validate_name(name)?,
    };
    let catalog = state.catalog.current();
    let starters = {
        let mut rng = state.dice.rng();
        idol::starter_templates(&mut rng, &catalog)
    };

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::create(&mut tx, &input).await?;

    let mut idols = Vec::with_capacity(starters.len());
    for template_id in starters {
        idols.push(IdolRepo::create(&mut tx, user.id, template_id).await?);
    }
    let ids: Vec<DbId> = idols.iter().map(|i| i.id).collect();
    let deck = Deck::from_ids(&ids)?;
    DeckRepo::replace(&mut tx, user.id, &deck).await?;
    tx.commit().await?;

    tracing::info!(user_id = user.id, starters = idols.len(), "User created");

    Ok(NewUser {
        user,
        idols,
        deck: deck.as_client_slots(),
    })
}

/// Current profile with stamina regenerated up to now.
pub async fn profile(state: &AppState, user_id: DbId) -> AppResult<UserProfile> {
    let _guard = state.user_locks.acquire(user_id).await;
    let now = Utc::now();

    let mut tx = state.pool.begin().await?;
    let user = lock_user(&mut tx, user_id, now).await?;
    let items = InventoryRepo::list(&mut *tx, user_id).await?;
    tx.commit().await?;

    Ok(UserProfile {
        stamina_status: StaminaView::of(&user, now),
        user,
        items,
    })
}
