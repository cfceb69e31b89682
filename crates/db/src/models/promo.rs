//! Promo code rows.

use idolsim_core::reward::RewardBundle;
use idolsim_core::types::Timestamp;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `promo_codes` table.
#[derive(Debug, Clone, FromRow)]
pub struct PromoCode {
    pub code: String,
    pub reward: Json<RewardBundle>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}
