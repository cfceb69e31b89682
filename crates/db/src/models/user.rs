//! User (producer) rows.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use idolsim_core::ledger::Balances;
use idolsim_core::stamina::StaminaState;
use idolsim_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub money: i64,
    pub star_jewels: i64,
    pub level: i32,
    pub exp: i64,
    pub max_exp: i64,
    pub stamina: i32,
    pub max_stamina: i32,
    pub last_stamina_update: Timestamp,
    pub login_streak: i32,
    pub last_login_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn stamina_state(&self) -> StaminaState {
        StaminaState {
            stamina: self.stamina,
            max_stamina: self.max_stamina,
            last_update: self.last_stamina_update,
        }
    }

    /// Ledger view of this row combined with its inventory.
    pub fn balances(&self, items: BTreeMap<String, i64>) -> Balances {
        Balances {
            money: self.money,
            star_jewels: self.star_jewels,
            level: self.level,
            exp: self.exp,
            max_exp: self.max_exp,
            stamina: self.stamina,
            max_stamina: self.max_stamina,
            items,
        }
    }
}

/// DTO for creating a new user. Balances take their column defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
}

/// A row from the `user_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserItem {
    pub item_name: String,
    pub count: i64,
}
