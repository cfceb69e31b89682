//! HTTP tests for item use.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json};
use sqlx::PgPool;

async fn give_item(pool: &PgPool, user_id: i64, item: &str, count: i64) {
    sqlx::query("INSERT INTO user_items (user_id, item_name, count) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(item)
        .bind(count)
        .execute(pool)
        .await
        .unwrap();
}

async fn set_stamina(pool: &PgPool, user_id: i64, stamina: i32) {
    sqlx::query("UPDATE users SET stamina = $2, last_stamina_update = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(stamina)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stamina_drink_restores_twenty(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let id = common::user_id(&common::create_user(&app, "Thirsty").await);
    give_item(&pool, id, "stamina_drink", 2).await;
    set_stamina(&pool, id, 10).await;

    let response = post_json(
        app,
        "/api/v1/item/use",
        serde_json::json!({ "userId": id, "item": "stamina_drink" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["stamina"], 30);
    assert_eq!(json["remaining"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_drink_restores_to_max_and_removes_last_item(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let id = common::user_id(&common::create_user(&app, "Sprinter").await);
    give_item(&pool, id, "stamina_drink_full", 1).await;
    set_stamina(&pool, id, 4).await;

    let json = body_json(
        post_json(
            app,
            "/api/v1/item/use",
            serde_json::json!({ "userId": id, "item": "stamina_drink_full" }),
        )
        .await,
    )
    .await;
    assert_eq!(json["stamina"], 50);
    assert_eq!(json["remaining"], 0);

    let (rows,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM user_items WHERE user_id = $1 AND count > 0")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_stamina_keeps_the_item(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let id = common::user_id(&common::create_user(&app, "Rested").await);
    give_item(&pool, id, "stamina_drink", 1).await;

    let response = post_json(
        app,
        "/api/v1/item/use",
        serde_json::json!({ "userId": id, "item": "stamina_drink" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (count,): (i64,) = sqlx::query_as(
        "SELECT count FROM user_items WHERE user_id = $1 AND item_name = 'stamina_drink'",
    )
    .bind(id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_or_unknown_items_are_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let id = common::user_id(&common::create_user(&app, "Empty").await);
    set_stamina(&pool, id, 10).await;

    let none = post_json(
        app.clone(),
        "/api/v1/item/use",
        serde_json::json!({ "userId": id, "item": "stamina_drink" }),
    )
    .await;
    assert_eq!(none.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(none).await["resource"], "item");

    let unknown = post_json(
        app,
        "/api/v1/item/use",
        serde_json::json!({ "userId": id, "item": "golden_ticket" }),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}
