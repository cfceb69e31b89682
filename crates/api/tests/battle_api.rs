//! HTTP tests for battle matchmaking and resolution.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn bot_battle_matches_and_resolves_server_side(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let id = common::user_id(&common::create_user(&app, "Fighter").await);

    let matched = get(app.clone(), &format!("/api/v1/battle/match/{id}?mode=bot")).await;
    assert_eq!(matched.status(), StatusCode::OK);
    let matched = body_json(matched).await;
    assert_eq!(matched["mode"], "bot");
    assert_eq!(matched["staminaCost"], 0);
    assert_eq!(matched["opponent"]["squad"].as_array().unwrap().len(), 3);

    let finished = post_json(
        app.clone(),
        "/api/v1/battle/finish",
        serde_json::json!({ "userId": id, "won": true }),
    )
    .await;
    assert_eq!(finished.status(), StatusCode::OK);
    let finished = body_json(finished).await;
    assert_eq!(finished["success"], true);
    assert_eq!(finished["turns"].as_array().unwrap().len(), 3);
    let won = finished["won"].as_bool().unwrap();
    let expected_money = if won { 1000 } else { 200 };
    assert_eq!(finished["rewards"]["money"], expected_money);
    assert_eq!(
        won,
        finished["playerTotal"].as_i64().unwrap() > finished["opponentTotal"].as_i64().unwrap()
    );

    // The pending battle is consumed.
    let again = post_json(
        app,
        "/api/v1/battle/finish",
        serde_json::json!({ "userId": id }),
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn finish_without_match_is_a_conflict(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let id = common::user_id(&common::create_user(&app, "Eager").await);

    let response = post_json(
        app,
        "/api/v1/battle/finish",
        serde_json::json!({ "userId": id, "won": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_deck_returns_422_with_hint(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let id = common::user_id(&common::create_user(&app, "Empty").await);

    let cleared = post_json(
        app.clone(),
        "/api/v1/deck",
        serde_json::json!({ "userId": id, "cardIds": [] }),
    )
    .await;
    assert_eq!(cleared.status(), StatusCode::OK);

    let response = get(app, &format!("/api/v1/battle/match/{id}")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "EMPTY_DECK");
    assert_eq!(json["hint"], "setup_deck");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pvp_without_opponents_is_retryable(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let id = common::user_id(&common::create_user(&app, "Lonely").await);

    let response = get(app.clone(), &format!("/api/v1/battle/match/{id}?mode=pvp")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "RETRYABLE");

    // No stamina is charged for a failed search.
    let profile = body_json(get(app, &format!("/api/v1/user/{id}")).await).await;
    assert_eq!(profile["stamina"], 50);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pvp_match_charges_stamina(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let id = common::user_id(&common::create_user(&app, "Challenger").await);
    common::create_user(&app, "Defender").await;

    let response = get(app, &format!("/api/v1/battle/match/{id}?mode=pvp")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["opponent"]["name"], "Defender");
    assert_eq!(json["staminaCost"], 10);
    assert_eq!(json["stamina"], 40);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_mode_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let id = common::user_id(&common::create_user(&app, "Confused").await);

    let response = get(app, &format!("/api/v1/battle/match/{id}?mode=raid")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_match_cannot_be_finished(pool: PgPool) {
    let state = common::test_state(pool).await;
    let app = idolsim_api::router::build_app_router(state.clone(), &common::test_config());
    let id = common::user_id(&common::create_user(&app, "Wanderer").await);

    let matched = get(app.clone(), &format!("/api/v1/battle/match/{id}?mode=bot")).await;
    assert_eq!(matched.status(), StatusCode::OK);

    let mut pending = state.battles.get(id).await.unwrap();
    pending.matched_at -= chrono::Duration::hours(1);
    state.battles.insert(id, pending).await;

    let response = post_json(
        app.clone(),
        "/api/v1/battle/finish",
        serde_json::json!({ "userId": id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(state.battles.get(id).await.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pvp_picks_an_opponent_from_the_pool(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let id = common::user_id(&common::create_user(&app, "Challenger").await);
    let defenders = ["Alpha", "Bravo", "Charlie"];
    for name in defenders {
        common::create_user(&app, name).await;
    }

    let response = get(app, &format!("/api/v1/battle/match/{id}?mode=pvp")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let name = json["opponent"]["name"].as_str().unwrap();
    assert!(defenders.contains(&name), "opponent {name}");
}
