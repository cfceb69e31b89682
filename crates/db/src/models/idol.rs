//! Owned idol instances.

use idolsim_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `idols` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Idol {
    pub id: DbId,
    pub user_id: DbId,
    pub template_id: DbId,
    pub level: i32,
    pub affection: i32,
    pub is_locked: bool,
    pub star_rank: i32,
    pub awakened: bool,
    pub created_at: Timestamp,
}

/// An idol joined with its template, as listed to the owner.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedIdol {
    pub id: DbId,
    pub template_id: DbId,
    pub name: String,
    pub rarity: String,
    pub idol_type: String,
    pub vocal: i32,
    pub dance: i32,
    pub visual: i32,
    pub level: i32,
    pub affection: i32,
    pub is_locked: bool,
    pub star_rank: i32,
    pub awakened: bool,
    pub created_at: Timestamp,
}
