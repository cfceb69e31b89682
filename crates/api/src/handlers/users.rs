//! Handlers for producer accounts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use idolsim_core::types::DbId;
use serde::Deserialize;

use crate::engine::users::{self, NewUser, UserProfile};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

/// POST /api/v1/users
///
/// Create a producer with starting balances and a starter deck.
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<NewUser>)> {
    let created = users::create(&state, &input.name).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/user/{id}
///
/// Profile with stamina brought up to date.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(users::profile(&state, id).await?))
}
