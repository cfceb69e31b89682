//! Handler for the daily login bonus.

use axum::extract::State;
use axum::Json;
use idolsim_core::types::DbId;
use serde::Deserialize;

use crate::engine::login_bonus::{self, LoginBonusResult};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBonusRequest {
    pub user_id: DbId,
}

/// POST /api/v1/login-bonus
pub async fn claim(
    State(state): State<AppState>,
    Json(input): Json<LoginBonusRequest>,
) -> AppResult<Json<LoginBonusResult>> {
    Ok(Json(login_bonus::claim(&state, input.user_id).await?))
}
