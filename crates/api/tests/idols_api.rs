//! HTTP tests for idol listing, locking and retirement.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use sqlx::PgPool;

fn first_idol(created: &serde_json::Value) -> i64 {
    created["idols"][0]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lists_owned_idols_with_template_data(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let id = common::user_id(&common::create_user(&app, "Collector").await);

    let json = body_json(get(app, &format!("/api/v1/user/{id}/idols")).await).await;
    let idols = json["data"].as_array().unwrap();
    assert_eq!(idols.len(), 3);
    assert!(idols.iter().all(|i| i["rarity"] == "N"));
    assert!(idols.iter().all(|i| i["name"].is_string()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn retire_removes_idol_from_deck(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let created = common::create_user(&app, "Retirer").await;
    let id = common::user_id(&created);
    let idol = first_idol(&created);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/idols/{idol}/retire"),
        serde_json::json!({ "userId": id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["retiredIdolId"], idol);
    assert_eq!(json["removedFromDeck"], true);

    let deck = body_json(get(app.clone(), &format!("/api/v1/user/{id}/deck")).await).await;
    assert!(!deck
        .as_array()
        .unwrap()
        .contains(&serde_json::json!(idol.to_string())));

    let again = post_json(
        app,
        &format!("/api/v1/idols/{idol}/retire"),
        serde_json::json!({ "userId": id }),
    )
    .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn locked_idol_cannot_be_retired(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let created = common::create_user(&app, "Keeper").await;
    let id = common::user_id(&created);
    let idol = first_idol(&created);

    let locked = post_json(
        app.clone(),
        &format!("/api/v1/idols/{idol}/lock"),
        serde_json::json!({ "userId": id, "locked": true }),
    )
    .await;
    assert_eq!(locked.status(), StatusCode::OK);
    assert_eq!(body_json(locked).await["isLocked"], true);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/idols/{idol}/retire"),
        serde_json::json!({ "userId": id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    post_json(
        app.clone(),
        &format!("/api/v1/idols/{idol}/lock"),
        serde_json::json!({ "userId": id, "locked": false }),
    )
    .await;
    let response = post_json(
        app,
        &format!("/api/v1/idols/{idol}/retire"),
        serde_json::json!({ "userId": id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_idol_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let me = common::user_id(&common::create_user(&app, "Me").await);
    let theirs = first_idol(&common::create_user(&app, "Them").await);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/idols/{theirs}/retire"),
        serde_json::json!({ "userId": me }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        app,
        &format!("/api/v1/idols/{theirs}/lock"),
        serde_json::json!({ "userId": me, "locked": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
