//! Route definitions for the present box.

use axum::routing::post;
use axum::Router;

use crate::handlers::presents;
use crate::state::AppState;

/// Routes mounted at `/presents`.
///
/// ```text
/// POST /{id}/claim      -> claim_one
/// POST /claim-all       -> claim_all
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/claim", post(presents::claim_one))
        .route("/claim-all", post(presents::claim_all))
}
