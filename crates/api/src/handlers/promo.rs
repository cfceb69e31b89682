//! Handler for promo code redemption.

use axum::extract::State;
use axum::Json;
use idolsim_core::types::DbId;
use serde::Deserialize;

use crate::engine::promo::{self, PromoResult};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub user_id: DbId,
    pub code: String,
}

/// POST /api/v1/promo/redeem
pub async fn redeem(
    State(state): State<AppState>,
    Json(input): Json<RedeemRequest>,
) -> AppResult<Json<PromoResult>> {
    Ok(Json(promo::redeem(&state, input.user_id, &input.code).await?))
}
