#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use idolsim_core::catalog::CatalogSnapshot;
use idolsim_db::repositories::CatalogRepo;
use sqlx::PgPool;
use tower::ServiceExt;

use idolsim_api::config::ServerConfig;
use idolsim_api::router::build_app_router;
use idolsim_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and a fixed roll seed.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        catalog_sync_url: None,
        catalog_sync_interval_secs: 300,
        catalog_sync_timeout_secs: 10,
        rng_seed: Some(42),
    }
}

/// Application state over the seeded catalog in `pool`.
pub async fn test_state(pool: PgPool) -> AppState {
    let document = CatalogRepo::load_document(&pool).await.unwrap();
    let catalog = CatalogSnapshot::build(0, document).unwrap();
    AppState::new(pool, test_config(), catalog)
}

/// Build the full application router with the production middleware stack.
///
/// Clone the returned router for each request; clones share state, so a
/// battle matched through one clone can be finished through another.
pub async fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    build_app_router(test_state(pool).await, &config)
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Create a producer and return the response JSON (user, idols, deck).
pub async fn create_user(app: &Router, name: &str) -> serde_json::Value {
    let response = post_json(
        app.clone(),
        "/api/v1/users",
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}

pub fn user_id(created: &serde_json::Value) -> i64 {
    created["user"]["id"].as_i64().unwrap()
}

/// Fire `n` identical POSTs at once and collect their status codes.
pub async fn post_concurrently(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    n: usize,
) -> Vec<axum::http::StatusCode> {
    let handles: Vec<_> = (0..n)
        .map(|_| {
            let app = app.clone();
            let uri = uri.to_string();
            let body = body.clone();
            tokio::spawn(async move { post_json(app, &uri, body).await.status() })
        })
        .collect();
    let mut statuses = Vec::with_capacity(n);
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }
    statuses
}
