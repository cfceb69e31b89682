//! Route definitions for idol actions.

use axum::routing::post;
use axum::Router;

use crate::handlers::idols;
use crate::state::AppState;

/// Routes mounted at `/idols`.
///
/// ```text
/// POST /{id}/retire     -> retire
/// POST /{id}/lock       -> set_lock
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/retire", post(idols::retire))
        .route("/{id}/lock", post(idols::set_lock))
}
