//! Handlers for work regions and job execution.

use axum::extract::{Path, State};
use axum::Json;
use idolsim_core::catalog::{WorkJob, WorkRegion};
use idolsim_core::types::DbId;
use serde::Deserialize;

use crate::engine::work::{self, WorkResult};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteWorkRequest {
    pub user_id: DbId,
    pub job_id: DbId,
}

/// GET /api/v1/work/regions
pub async fn list_regions(State(state): State<AppState>) -> Json<Vec<WorkRegion>> {
    Json(work::regions(&state))
}

/// GET /api/v1/work/jobs/{region_id}
pub async fn list_jobs(
    State(state): State<AppState>,
    Path(region_id): Path<DbId>,
) -> AppResult<Json<Vec<WorkJob>>> {
    Ok(Json(work::jobs(&state, region_id)?))
}

/// POST /api/v1/work/execute
pub async fn execute(
    State(state): State<AppState>,
    Json(input): Json<ExecuteWorkRequest>,
) -> AppResult<Json<WorkResult>> {
    Ok(Json(work::execute(&state, input.user_id, input.job_id).await?))
}
