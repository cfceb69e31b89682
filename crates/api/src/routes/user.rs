//! Route definitions for producer-scoped resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::{deck, idols, presents, users};
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET  /{id}              -> get_user
/// GET  /{id}/deck         -> get_deck
/// GET  /{id}/idols        -> list_idols
/// GET  /{id}/presents     -> list_presents
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(users::get_user))
        .route("/{id}/deck", get(deck::get_deck))
        .route("/{id}/idols", get(idols::list_idols))
        .route("/{id}/presents", get(presents::list_presents))
}
