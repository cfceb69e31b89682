//! Route definitions for events.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET  /                            -> list_events
/// GET  /{id}/progress/{user_id}     -> get_progress
/// POST /{id}/claim                  -> claim_tier
/// GET  /{id}/leaderboard?limit=     -> leaderboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events))
        .route("/{id}/progress/{user_id}", get(events::get_progress))
        .route("/{id}/claim", post(events::claim_tier))
        .route("/{id}/leaderboard", get(events::leaderboard))
}
