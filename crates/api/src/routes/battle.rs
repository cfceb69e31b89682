//! Route definitions for battles.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::battle;
use crate::state::AppState;

/// Routes mounted at `/battle`.
///
/// ```text
/// GET  /match/{user_id}?mode=    -> find_match
/// POST /finish                   -> finish
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/match/{user_id}", get(battle::find_match))
        .route("/finish", post(battle::finish))
}
