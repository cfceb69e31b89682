//! Handler for gacha pulls.

use axum::extract::State;
use axum::Json;
use idolsim_core::types::DbId;
use serde::Deserialize;

use crate::engine::gacha::{self, GachaResult};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub user_id: DbId,
    pub count: u32,
}

/// POST /api/v1/gacha
///
/// Pull 1 or 10 idols for star jewels.
pub async fn pull(
    State(state): State<AppState>,
    Json(input): Json<PullRequest>,
) -> AppResult<Json<GachaResult>> {
    Ok(Json(gacha::pull(&state, input.user_id, input.count).await?))
}
