//! Handlers for battle matchmaking and results.

use axum::extract::{Path, Query, State};
use axum::Json;
use idolsim_core::battle::BattleMode;
use idolsim_core::types::DbId;
use serde::Deserialize;

use crate::engine::battle::{self, FinishResult, MatchResult};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    /// `bot` (default) or `pvp`.
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishRequest {
    pub user_id: DbId,
    /// Client-side result. Logged when it disagrees, never trusted.
    pub won: Option<bool>,
}

/// GET /api/v1/battle/match/{user_id}?mode=bot|pvp
pub async fn find_match(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(query): Query<MatchQuery>,
) -> AppResult<Json<MatchResult>> {
    let mode = match query.mode.as_deref() {
        None => BattleMode::Bot,
        Some(raw) => raw.parse::<BattleMode>()?,
    };
    Ok(Json(battle::matchmake(&state, user_id, mode).await?))
}

/// POST /api/v1/battle/finish
pub async fn finish(
    State(state): State<AppState>,
    Json(input): Json<FinishRequest>,
) -> AppResult<Json<FinishResult>> {
    Ok(Json(battle::finish(&state, input.user_id, input.won).await?))
}
