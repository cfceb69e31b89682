//! Daily login bonus, delivered through the present box.

use chrono::Utc;
use idolsim_core::login_bonus::{self, LoginBonus};
use idolsim_core::present::presents_for;
use idolsim_core::types::DbId;
use idolsim_db::models::present::Present;
use idolsim_db::repositories::{PresentRepo, UserRepo};
use serde::Serialize;

use crate::engine::stamina::lock_user;
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBonusResult {
    #[serde(flatten)]
    pub bonus: LoginBonus,
    pub presents: Vec<Present>,
}

/// Claim today's bonus (UTC calendar day) and queue it as presents.
pub async fn claim(state: &AppState, user_id: DbId) -> AppResult<LoginBonusResult> {
    let _guard = state.user_locks.acquire(user_id).await;
    let now = Utc::now();
    let today = now.date_naive();

    let mut tx = state.pool.begin().await?;
    let user = lock_user(&mut tx, user_id, now).await?;
    let bonus = login_bonus::claim(user.last_login_date, user.login_streak, today)?;
    UserRepo::record_login(&mut tx, user_id, bonus.streak, today).await?;

    let description = format!("Login bonus day {}", bonus.day_in_cycle);
    let mut presents = Vec::new();
    for present in presents_for(&bonus.reward, &description) {
        presents.push(PresentRepo::create(&mut tx, user_id, &present).await?);
    }
    tx.commit().await?;

    tracing::info!(
        user_id,
        streak = bonus.streak,
        day = bonus.day_in_cycle,
        presents = presents.len(),
        "Login bonus claimed"
    );

    Ok(LoginBonusResult { bonus, presents })
}
