//! Deck slot rows.

use idolsim_core::catalog::{IdolType, Rarity};
use idolsim_core::error::CoreError;
use idolsim_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `deck_slots` table.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSlot {
    pub slot_index: i16,
    pub idol_id: DbId,
}

/// A deck member joined with its template stats, in slot order.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCard {
    pub slot_index: i16,
    pub idol_id: DbId,
    pub name: String,
    pub rarity: String,
    pub idol_type: String,
    pub vocal: i32,
    pub dance: i32,
    pub visual: i32,
}

impl DeckCard {
    pub fn rarity(&self) -> Result<Rarity, CoreError> {
        self.rarity.parse()
    }

    pub fn idol_type(&self) -> Result<IdolType, CoreError> {
        self.idol_type.parse()
    }
}
