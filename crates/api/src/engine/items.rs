//! Consumable item use.

use chrono::Utc;
use idolsim_core::items;
use idolsim_core::types::DbId;
use idolsim_db::repositories::{InventoryRepo, LedgerRepo};
use serde::Serialize;

use crate::engine::stamina::lock_user;
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUseResult {
    pub success: bool,
    pub item: String,
    pub remaining: i64,
    pub stamina: i32,
    pub max_stamina: i32,
}

pub async fn use_item(state: &AppState, user_id: DbId, item: &str) -> AppResult<ItemUseResult> {
    let _guard = state.user_locks.acquire(user_id).await;
    let mut tx = state.pool.begin().await?;
    let user = lock_user(&mut tx, user_id, Utc::now()).await?;

    let inventory = InventoryRepo::list(&mut *tx, user_id).await?;
    let delta = items::use_item(&user.balances(inventory), item)?;
    let applied = LedgerRepo::apply(&mut tx, &user, &delta).await?;
    tx.commit().await?;

    let remaining = applied.balances.item_count(item);
    tracing::info!(
        user_id,
        item,
        remaining,
        stamina = applied.balances.stamina,
        "Item used"
    );

    Ok(ItemUseResult {
        success: true,
        item: item.to_string(),
        remaining,
        stamina: applied.balances.stamina,
        max_stamina: applied.balances.max_stamina,
    })
}
