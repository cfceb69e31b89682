//! Server-side stamina refresh.

use idolsim_core::error::CoreError;
use idolsim_core::stamina;
use idolsim_core::types::{DbId, Timestamp};
use idolsim_db::models::user::User;
use idolsim_db::repositories::UserRepo;
use serde::Serialize;
use sqlx::PgConnection;

use crate::error::AppResult;

/// Row-lock a user and persist regenerated stamina as of `now`.
///
/// Every cost check runs against the row this returns.
pub async fn lock_user(conn: &mut PgConnection, user_id: DbId, now: Timestamp) -> AppResult<User> {
    let user = UserRepo::lock_for_update(&mut *conn, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: user_id,
        })?;

    let current = user.stamina_state();
    let next = stamina::recompute(current, now);
    if next == current {
        return Ok(user);
    }

    tracing::debug!(
        user_id,
        from = current.stamina,
        to = next.stamina,
        "Stamina regenerated"
    );
    Ok(UserRepo::save_stamina(conn, user_id, &next).await?)
}

/// Stamina as shown to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaminaView {
    pub stamina: i32,
    pub max_stamina: i32,
    /// `None` while stamina is full.
    pub next_regen_in_secs: Option<i64>,
}

impl StaminaView {
    pub fn of(user: &User, now: Timestamp) -> Self {
        let state = user.stamina_state();
        Self {
            stamina: state.stamina,
            max_stamina: state.max_stamina,
            next_regen_in_secs: stamina::seconds_until_next(&state, now),
        }
    }
}
