//! Handlers for events, tier claims and leaderboards.

use axum::extract::{Path, Query, State};
use axum::Json;
use idolsim_core::event::RankedStanding;
use idolsim_core::types::DbId;
use serde::Deserialize;

use crate::engine::events::{self, EventProgressView, EventSummary, TierClaim};
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimTierRequest {
    pub user_id: DbId,
    pub threshold: i64,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Number of entries (default 50, max 100).
    pub limit: Option<i64>,
}

/// GET /api/v1/events
pub async fn list_events(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<EventSummary>>>> {
    let events = events::list(&state).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/{id}/progress/{user_id}
pub async fn get_progress(
    State(state): State<AppState>,
    Path((event_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<EventProgressView>> {
    Ok(Json(events::progress(&state, event_id, user_id).await?))
}

/// POST /api/v1/events/{id}/claim
pub async fn claim_tier(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<ClaimTierRequest>,
) -> AppResult<Json<TierClaim>> {
    Ok(Json(
        events::claim(&state, event_id, input.user_id, input.threshold).await?,
    ))
}

/// GET /api/v1/events/{id}/leaderboard?limit=
pub async fn leaderboard(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<Json<DataResponse<Vec<RankedStanding>>>> {
    let ranking = events::leaderboard(&state, event_id, query.limit).await?;
    Ok(Json(DataResponse { data: ranking }))
}
