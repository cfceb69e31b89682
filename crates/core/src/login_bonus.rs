//! Daily login bonus and streak tracking.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::reward::RewardBundle;

/// Length of the reward cycle; day 7 pays star jewels.
pub const CYCLE_DAYS: i32 = 7;

pub const BASE_DAILY_MONEY: i64 = 500;
pub const DAILY_MONEY_STEP: i64 = 250;
pub const FINAL_DAY_STAR_JEWELS: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBonus {
    pub streak: i32,
    pub day_in_cycle: i32,
    pub reward: RewardBundle,
}

/// Streak after logging in on `today`.
///
/// Consecutive days extend the streak, a gap resets it to 1, and a second
/// claim on the same day is a conflict.
pub fn next_streak(
    last_login: Option<NaiveDate>,
    streak: i32,
    today: NaiveDate,
) -> Result<i32, CoreError> {
    match last_login {
        Some(last) if last >= today => Err(CoreError::Conflict(
            "Login bonus already claimed today".to_string(),
        )),
        Some(last) if last.succ_opt() == Some(today) => Ok(streak.max(0) + 1),
        _ => Ok(1),
    }
}

/// Position of `streak` inside the reward cycle, 1-based.
pub fn day_in_cycle(streak: i32) -> i32 {
    (streak.max(1) - 1) % CYCLE_DAYS + 1
}

pub fn reward_for_day(day: i32) -> RewardBundle {
    let money = BASE_DAILY_MONEY + DAILY_MONEY_STEP * i64::from(day - 1);
    let mut reward = RewardBundle::money(money);
    if day == CYCLE_DAYS {
        reward.star_jewels = FINAL_DAY_STAR_JEWELS;
    }
    reward
}

pub fn claim(
    last_login: Option<NaiveDate>,
    streak: i32,
    today: NaiveDate,
) -> Result<LoginBonus, CoreError> {
    let streak = next_streak(last_login, streak, today)?;
    let day = day_in_cycle(streak);
    Ok(LoginBonus {
        streak,
        day_in_cycle: day,
        reward: reward_for_day(day),
    })
}
