//! Handlers for the idol roster.

use axum::extract::{Path, State};
use axum::Json;
use idolsim_core::types::DbId;
use idolsim_db::models::idol::{Idol, OwnedIdol};
use serde::Deserialize;

use crate::engine::idols::{self, RetireResult};
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetireRequest {
    pub user_id: DbId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRequest {
    pub user_id: DbId,
    pub locked: bool,
}

/// GET /api/v1/user/{id}/idols
pub async fn list_idols(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<OwnedIdol>>>> {
    let idols = idols::list(&state, user_id).await?;
    Ok(Json(DataResponse { data: idols }))
}

/// POST /api/v1/idols/{id}/retire
pub async fn retire(
    State(state): State<AppState>,
    Path(idol_id): Path<DbId>,
    Json(input): Json<RetireRequest>,
) -> AppResult<Json<RetireResult>> {
    Ok(Json(idols::retire(&state, input.user_id, idol_id).await?))
}

/// POST /api/v1/idols/{id}/lock
pub async fn set_lock(
    State(state): State<AppState>,
    Path(idol_id): Path<DbId>,
    Json(input): Json<LockRequest>,
) -> AppResult<Json<Idol>> {
    Ok(Json(
        idols::set_locked(&state, input.user_id, idol_id, input.locked).await?,
    ))
}
