//! Handlers for the present box.

use axum::extract::{Path, State};
use axum::Json;
use idolsim_core::types::DbId;
use idolsim_db::models::present::Present;
use serde::Deserialize;

use crate::engine::presents::{self, PresentClaim};
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPresentRequest {
    pub user_id: DbId,
}

/// GET /api/v1/user/{id}/presents
pub async fn list_presents(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Present>>>> {
    let presents = presents::list(&state, user_id).await?;
    Ok(Json(DataResponse { data: presents }))
}

/// POST /api/v1/presents/{id}/claim
pub async fn claim_one(
    State(state): State<AppState>,
    Path(present_id): Path<DbId>,
    Json(input): Json<ClaimPresentRequest>,
) -> AppResult<Json<PresentClaim>> {
    Ok(Json(
        presents::claim_one(&state, input.user_id, present_id).await?,
    ))
}

/// POST /api/v1/presents/claim-all
pub async fn claim_all(
    State(state): State<AppState>,
    Json(input): Json<ClaimPresentRequest>,
) -> AppResult<Json<PresentClaim>> {
    Ok(Json(presents::claim_all(&state, input.user_id).await?))
}
