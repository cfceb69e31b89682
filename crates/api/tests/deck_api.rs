//! HTTP tests for deck reads and replacement.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use sqlx::PgPool;

fn idol_ids(created: &serde_json::Value) -> Vec<i64> {
    created["idols"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deck_is_four_null_padded_string_slots(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let created = common::create_user(&app, "Decker").await;
    let id = common::user_id(&created);
    let ids = idol_ids(&created);

    let json = body_json(get(app, &format!("/api/v1/user/{id}/deck")).await).await;
    let expected = serde_json::json!([
        ids[0].to_string(),
        ids[1].to_string(),
        ids[2].to_string(),
        null
    ]);
    assert_eq!(json, expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deck_accepts_string_and_numeric_ids(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let created = common::create_user(&app, "Mixer").await;
    let id = common::user_id(&created);
    let ids = idol_ids(&created);

    let response = post_json(
        app.clone(),
        "/api/v1/deck",
        serde_json::json!({ "userId": id, "cardIds": [ids[2].to_string(), ids[0]] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    let json = body_json(get(app, &format!("/api/v1/user/{id}/deck")).await).await;
    assert_eq!(
        json,
        serde_json::json!([ids[2].to_string(), ids[0].to_string(), null, null])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_ids_are_rejected(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let created = common::create_user(&app, "Twice").await;
    let id = common::user_id(&created);
    let ids = idol_ids(&created);

    let response = post_json(
        app,
        "/api/v1/deck",
        serde_json::json!({ "userId": id, "cardIds": [ids[0], ids[0]] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oversized_deck_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let id = common::user_id(&common::create_user(&app, "Greedy").await);

    let response = post_json(
        app,
        "/api/v1/deck",
        serde_json::json!({ "userId": id, "cardIds": [1, 2, 3, 4, 5] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_idol_returns_404_and_keeps_deck(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let mine = common::create_user(&app, "Owner").await;
    let other = common::create_user(&app, "Neighbor").await;
    let id = common::user_id(&mine);
    let foreign = idol_ids(&other)[0];

    let response = post_json(
        app.clone(),
        "/api/v1/deck",
        serde_json::json!({ "userId": id, "cardIds": [foreign] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(get(app, &format!("/api/v1/user/{id}/deck")).await).await;
    assert_eq!(json[0], idol_ids(&mine)[0].to_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_id_is_a_validation_error(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let id = common::user_id(&common::create_user(&app, "Typo").await);

    let response = post_json(
        app,
        "/api/v1/deck",
        serde_json::json!({ "userId": id, "cardIds": ["abc"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
