//! HTTP tests for gacha pulls.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn ten_pull_spends_jewels_and_grants_idols(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let id = common::user_id(&common::create_user(&app, "Puller").await);

    let response = post_json(
        app.clone(),
        "/api/v1/gacha",
        serde_json::json!({ "userId": id, "count": 10 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["newJewels"], 0);
    let pulled = json["pulledIdols"].as_array().unwrap();
    assert_eq!(pulled.len(), 10);
    assert!(pulled
        .iter()
        .any(|p| p["rarity"] == "SR" || p["rarity"] == "SSR"));

    let (owned,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM idols WHERE user_id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(owned, 13);

    let (history,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM gacha_history WHERE user_id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(history, 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn insufficient_jewels_returns_409_with_details(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let id = common::user_id(&common::create_user(&app, "Broke").await);

    let first = post_json(
        app.clone(),
        "/api/v1/gacha",
        serde_json::json!({ "userId": id, "count": 10 }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let response = post_json(
        app,
        "/api/v1/gacha",
        serde_json::json!({ "userId": id, "count": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_RESOURCE");
    assert_eq!(json["resource"], "star_jewels");
    assert_eq!(json["required"], 250);
    assert_eq!(json["available"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsupported_pull_count_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let id = common::user_id(&common::create_user(&app, "Odd").await);

    let response = post_json(
        app,
        "/api/v1/gacha",
        serde_json::json!({ "userId": id, "count": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn simultaneous_ten_pulls_charge_once(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let id = common::user_id(&common::create_user(&app, "Impatient").await);

    let statuses = common::post_concurrently(
        &app,
        "/api/v1/gacha",
        serde_json::json!({ "userId": id, "count": 10 }),
        4,
    )
    .await;
    let ok = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    assert_eq!(ok, 1, "statuses {statuses:?}");

    let (jewels,): (i64,) = sqlx::query_as("SELECT star_jewels FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(jewels, 0);

    let (owned,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM idols WHERE user_id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(owned, 13);
}
