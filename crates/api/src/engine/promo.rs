//! Promo code redemption.

use chrono::Utc;
use idolsim_core::error::CoreError;
use idolsim_core::ledger::{Balances, LedgerDelta};
use idolsim_core::promo::{self, PromoRejection};
use idolsim_core::reward::RewardBundle;
use idolsim_core::types::DbId;
use idolsim_db::repositories::{LedgerRepo, PromoRepo};
use serde::Serialize;

use crate::engine::stamina::lock_user;
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoResult {
    pub success: bool,
    pub code: String,
    pub reward: RewardBundle,
    pub balances: Balances,
}

/// Redeem `raw_code` for a user. The redemption row and the reward commit together.
pub async fn redeem(state: &AppState, user_id: DbId, raw_code: &str) -> AppResult<PromoResult> {
    let code = promo::normalize_code(raw_code);
    if code.is_empty() {
        return Err(CoreError::from(PromoRejection::Unknown).into());
    }

    let _guard = state.user_locks.acquire(user_id).await;
    let now = Utc::now();
    let mut tx = state.pool.begin().await?;
    let user = lock_user(&mut tx, user_id, now).await?;

    let promo = PromoRepo::find(&mut *tx, &code)
        .await?
        .ok_or(CoreError::from(PromoRejection::Unknown))?;
    let already = PromoRepo::is_redeemed(&mut *tx, &code, user_id).await?;
    if let Err(reason) = promo::check_redeemable(promo.starts_at, promo.ends_at, already, now) {
        tracing::debug!(user_id, code = %code, %reason, "Promo code rejected");
        return Err(CoreError::from(reason).into());
    }
    if !PromoRepo::record_redemption(&mut tx, &code, user_id).await? {
        return Err(CoreError::from(PromoRejection::AlreadyUsed).into());
    }

    let reward = promo.reward.0;
    let applied = LedgerRepo::apply(&mut tx, &user, &LedgerDelta::from(&reward)).await?;
    tx.commit().await?;

    tracing::info!(user_id, code = %code, "Promo code redeemed");

    Ok(PromoResult {
        success: true,
        code,
        reward,
        balances: applied.balances,
    })
}
