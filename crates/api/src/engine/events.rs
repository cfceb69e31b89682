//! Event progress, tier claims and leaderboards.

use chrono::Utc;
use idolsim_core::error::CoreError;
use idolsim_core::event::{self, RankedStanding, RewardTier, Standing, TierStatus};
use idolsim_core::ledger::LedgerDelta;
use idolsim_core::reward::RewardBundle;
use idolsim_core::types::{DbId, Timestamp};
use idolsim_db::models::event::Event;
use idolsim_db::repositories::{EventRepo, LedgerRepo};
use serde::Serialize;
use sqlx::PgConnection;

use crate::engine::stamina::lock_user;
use crate::error::AppResult;
use crate::state::AppState;

pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 50;
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    #[serde(flatten)]
    pub event: Event,
    pub active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventProgressView {
    pub event_id: DbId,
    pub user_id: DbId,
    pub points: i64,
    pub active: bool,
    pub tiers: Vec<TierStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierClaim {
    pub success: bool,
    pub threshold: i64,
    pub reward: RewardBundle,
    pub money: i64,
    pub star_jewels: i64,
    pub level: i32,
}

async fn find_event(conn: &mut PgConnection, event_id: DbId) -> AppResult<Event> {
    Ok(EventRepo::find_by_id(conn, event_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "event",
            id: event_id,
        })?)
}

/// Stored tiers, rejected as a server fault if the table is malformed.
async fn load_tiers(conn: &mut PgConnection, event_id: DbId) -> AppResult<Vec<RewardTier>> {
    let tiers = EventRepo::tiers(conn, event_id).await?;
    event::validate_tiers(&tiers)
        .map_err(|e| CoreError::Internal(format!("event {event_id}: {e}")))?;
    Ok(tiers)
}

pub async fn list(state: &AppState) -> AppResult<Vec<EventSummary>> {
    let now = Utc::now();
    Ok(EventRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|event| EventSummary {
            active: event.window().is_active(now),
            event,
        })
        .collect())
}

pub async fn progress(
    state: &AppState,
    event_id: DbId,
    user_id: DbId,
) -> AppResult<EventProgressView> {
    let mut conn = state.pool.acquire().await?;
    let event = find_event(&mut conn, event_id).await?;
    let points = EventRepo::progress(&mut *conn, event_id, user_id)
        .await?
        .map_or(0, |p| p.points);
    let tiers = load_tiers(&mut *conn, event_id).await?;
    let claimed = EventRepo::claimed_thresholds(&mut *conn, event_id, user_id).await?;

    Ok(EventProgressView {
        event_id,
        user_id,
        points,
        active: event.window().is_active(Utc::now()),
        tiers: event::tier_statuses(&tiers, points, &claimed),
    })
}

/// Add points earned by a qualifying action inside the caller's transaction.
///
/// Returns the new total, or `None` when the event is missing or not running;
/// the action itself still succeeds in that case.
pub async fn credit_points(
    conn: &mut PgConnection,
    event_id: DbId,
    user_id: DbId,
    amount: i64,
    now: Timestamp,
) -> AppResult<Option<i64>> {
    let Some(event) = EventRepo::find_by_id(&mut *conn, event_id).await? else {
        tracing::warn!(event_id, "Job references a missing event");
        return Ok(None);
    };
    let window = event.window();
    if !window.is_active(now) {
        tracing::debug!(event_id, user_id, "Event not running, points skipped");
        return Ok(None);
    }

    let current = EventRepo::progress(&mut *conn, event_id, user_id)
        .await?
        .map_or(0, |p| p.points);
    let next = event::add_points(current, amount, &window, now)?;
    let progress = EventRepo::set_points(conn, event_id, user_id, next).await?;

    tracing::info!(event_id, user_id, amount, total = progress.points, "Event points added");
    Ok(Some(progress.points))
}

/// Grant the reward of one reached tier, exactly once.
pub async fn claim(
    state: &AppState,
    event_id: DbId,
    user_id: DbId,
    threshold: i64,
) -> AppResult<TierClaim> {
    let _guard = state.user_locks.acquire(user_id).await;
    let mut tx = state.pool.begin().await?;
    let user = lock_user(&mut tx, user_id, Utc::now()).await?;
    find_event(&mut tx, event_id).await?;

    let points = EventRepo::progress(&mut *tx, event_id, user_id)
        .await?
        .map_or(0, |p| p.points);
    let tiers = load_tiers(&mut *tx, event_id).await?;
    let claimed = EventRepo::claimed_thresholds(&mut *tx, event_id, user_id).await?;
    let tier = event::claimable_tier(&tiers, points, threshold, claimed.contains(&threshold))?;

    if !EventRepo::record_claim(&mut tx, event_id, user_id, threshold).await? {
        return Err(
            CoreError::Conflict(format!("Tier {threshold} has already been claimed")).into(),
        );
    }
    let applied = LedgerRepo::apply(&mut tx, &user, &LedgerDelta::from(&tier.reward)).await?;
    tx.commit().await?;

    tracing::info!(event_id, user_id, threshold, "Event tier claimed");

    Ok(TierClaim {
        success: true,
        threshold,
        reward: tier.reward.clone(),
        money: applied.balances.money,
        star_jewels: applied.balances.star_jewels,
        level: applied.balances.level,
    })
}

pub async fn leaderboard(
    state: &AppState,
    event_id: DbId,
    limit: Option<i64>,
) -> AppResult<Vec<RankedStanding>> {
    let limit = limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);
    let mut conn = state.pool.acquire().await?;
    find_event(&mut conn, event_id).await?;
    let rows = EventRepo::leaderboard(&mut *conn, event_id, limit).await?;
    Ok(event::rank(rows.into_iter().map(Standing::from).collect()))
}
