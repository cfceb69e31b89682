//! Event rows: definitions, reward tiers and per-user progress.

use idolsim_core::event::{EventWindow, RewardTier, Standing};
use idolsim_core::reward::RewardBundle;
use idolsim_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: DbId,
    pub name: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub created_at: Timestamp,
}

impl Event {
    pub fn window(&self) -> EventWindow {
        EventWindow {
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        }
    }
}

/// A row from the `event_reward_tiers` table.
#[derive(Debug, Clone, FromRow)]
pub struct TierRow {
    pub threshold: i64,
    pub reward: Json<RewardBundle>,
}

impl From<TierRow> for RewardTier {
    fn from(row: TierRow) -> Self {
        RewardTier {
            threshold: row.threshold,
            reward: row.reward.0,
        }
    }
}

/// A row from the `event_progress` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventProgress {
    pub event_id: DbId,
    pub user_id: DbId,
    pub points: i64,
    pub updated_at: Timestamp,
}

impl From<EventProgress> for Standing {
    fn from(row: EventProgress) -> Self {
        Standing {
            user_id: row.user_id,
            points: row.points,
            reached_at: row.updated_at,
        }
    }
}
