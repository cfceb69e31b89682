//! Liveness probe for the game server.
//!
//! Reports whether Postgres answers and which catalog revision players are
//! pulling and working against.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// 0 until a remote catalog has been installed.
    pub catalog_version: u64,
    /// Idol templates in the served catalog.
    pub catalog_idols: usize,
}

/// GET /health
///
/// A degraded server answers 503 so load balancers stop routing to it.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_healthy = idolsim_db::health_check(&state.pool).await.is_ok();
    let catalog = state.catalog.current();

    let (code, status) = if db_healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        catalog_version: catalog.version(),
        catalog_idols: catalog.templates().count(),
    };
    (code, Json(body))
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
