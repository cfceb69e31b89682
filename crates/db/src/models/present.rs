//! Present box rows.

use idolsim_core::error::CoreError;
use idolsim_core::ledger::LedgerDelta;
use idolsim_core::present::{delta_for, PresentKind};
use idolsim_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `presents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Present {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub item_name: Option<String>,
    pub amount: i64,
    pub description: String,
    pub received_at: Timestamp,
}

impl Present {
    /// Ledger delta granted when this present is claimed.
    pub fn to_delta(&self) -> Result<LedgerDelta, CoreError> {
        let kind: PresentKind = self.kind.parse()?;
        delta_for(kind, self.item_name.as_deref(), self.amount)
    }
}
