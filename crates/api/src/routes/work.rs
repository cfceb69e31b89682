//! Route definitions for work.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::work;
use crate::state::AppState;

/// Routes mounted at `/work`.
///
/// ```text
/// GET  /regions              -> list_regions
/// GET  /jobs/{region_id}     -> list_jobs
/// POST /execute              -> execute
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/regions", get(work::list_regions))
        .route("/jobs/{region_id}", get(work::list_jobs))
        .route("/execute", post(work::execute))
}
