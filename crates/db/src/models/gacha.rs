//! Gacha pull history rows.

use idolsim_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `gacha_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GachaPull {
    pub id: DbId,
    pub user_id: DbId,
    pub template_id: DbId,
    pub rarity: String,
    pub guaranteed: bool,
    pub pulled_at: Timestamp,
}
