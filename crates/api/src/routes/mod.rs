pub mod battle;
pub mod events;
pub mod health;
pub mod idols;
pub mod presents;
pub mod user;
pub mod work;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users                                 create producer (POST)
/// /user/{id}                             profile
/// /user/{id}/deck                        deck slots
/// /user/{id}/idols                       owned idols
/// /user/{id}/presents                    present box
///
/// /deck                                  replace deck (POST)
/// /gacha                                 pull (POST)
/// /item/use                              use item (POST)
/// /promo/redeem                          redeem code (POST)
/// /login-bonus                           daily bonus (POST)
///
/// /work/regions                          list regions
/// /work/jobs/{region_id}                 jobs in a region
/// /work/execute                          run a job (POST)
///
/// /battle/match/{user_id}?mode=          matchmaking
/// /battle/finish                         resolve (POST)
///
/// /idols/{id}/retire                     retire (POST)
/// /idols/{id}/lock                       lock/unlock (POST)
///
/// /events                                list
/// /events/{id}/progress/{user_id}        points and tiers
/// /events/{id}/claim                     claim tier (POST)
/// /events/{id}/leaderboard               ranking
///
/// /presents/{id}/claim                   claim one (POST)
/// /presents/claim-all                    claim all (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::users::create_user))
        .nest("/user", user::router())
        .route("/deck", post(handlers::deck::set_deck))
        .route("/gacha", post(handlers::gacha::pull))
        .route("/item/use", post(handlers::items::use_item))
        .route("/promo/redeem", post(handlers::promo::redeem))
        .route("/login-bonus", post(handlers::login_bonus::claim))
        .nest("/work", work::router())
        .nest("/battle", battle::router())
        .nest("/idols", idols::router())
        .nest("/events", events::router())
        .nest("/presents", presents::router())
}
