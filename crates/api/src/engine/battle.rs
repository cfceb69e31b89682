//! Battle matchmaking and resolution.
//!
//! Matchmaking stores the opponent in memory; `finish` scores it against
//! the player's deck at that moment. Opponents are never persisted.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use idolsim_core::battle::{
    self, BattleMode, BattleOutcome, BattlePhase, CardSnapshot, Opponent, TurnScore,
    MATCHMAKING_ATTEMPTS,
};
use idolsim_core::error::CoreError;
use idolsim_core::ledger::LedgerDelta;
use idolsim_core::reward::RewardBundle;
use idolsim_core::stamina;
use idolsim_core::types::{DbId, Timestamp};
use idolsim_db::models::deck::DeckCard;
use idolsim_db::repositories::{DeckRepo, LedgerRepo, UserRepo};
use rand::seq::IndexedRandom;
use serde::Serialize;
use sqlx::PgConnection;
use tokio::sync::RwLock;

use crate::engine::stamina::lock_user;
use crate::error::AppResult;
use crate::state::AppState;

/// Pause between PVP matchmaking attempts, multiplied by the attempt number.
pub const PVP_RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Producers fetched per matchmaking attempt; one is picked at random.
pub const PVP_CANDIDATE_POOL: i64 = 20;

/// How long a matched opponent stays available for `finish`.
pub const PENDING_BATTLE_TTL_SECS: i64 = 30 * 60;

// ---------------------------------------------------------------------------
// Pending battles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PendingBattle {
    pub opponent: Opponent,
    pub phase: BattlePhase,
    pub matched_at: Timestamp,
}

impl PendingBattle {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now - self.matched_at > chrono::Duration::seconds(PENDING_BATTLE_TTL_SECS)
    }
}

/// Matched opponents keyed by user id. A new match replaces the old one.
pub struct PendingBattles {
    battles: RwLock<HashMap<DbId, PendingBattle>>,
}

impl PendingBattles {
    pub fn new() -> Self {
        Self {
            battles: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, user_id: DbId, battle: PendingBattle) {
        self.battles.write().await.insert(user_id, battle);
    }

    pub async fn get(&self, user_id: DbId) -> Option<PendingBattle> {
        self.battles.read().await.get(&user_id).cloned()
    }

    pub async fn remove(&self, user_id: DbId) -> Option<PendingBattle> {
        self.battles.write().await.remove(&user_id)
    }
}

impl Default for PendingBattles {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub mode: BattleMode,
    pub opponent: Opponent,
    pub stamina_cost: i32,
    pub stamina: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishResult {
    pub success: bool,
    pub won: bool,
    pub rewards: RewardBundle,
    pub turns: Vec<TurnScore>,
    pub player_total: i64,
    pub opponent_total: i64,
    pub level: i32,
    pub levels_gained: i32,
}

fn snapshots(cards: &[DeckCard]) -> Result<Vec<CardSnapshot>, CoreError> {
    cards
        .iter()
        .map(|c| {
            Ok(CardSnapshot::new(
                c.name.clone(),
                c.rarity()?,
                c.vocal,
                c.dance,
                c.visual,
            ))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Matchmaking
// ---------------------------------------------------------------------------

/// Find an opponent for the user's deck and remember it until `finish`.
///
/// PVP stamina is charged here, so abandoning a matched battle still pays.
pub async fn matchmake(
    state: &AppState,
    user_id: DbId,
    mode: BattleMode,
) -> AppResult<MatchResult> {
    let catalog = state.catalog.current();
    let _guard = state.user_locks.acquire(user_id).await;
    let now = Utc::now();

    let mut tx = state.pool.begin().await?;
    let user = lock_user(&mut tx, user_id, now).await?;
    let cards = DeckRepo::cards(&mut *tx, user_id).await?;
    if cards.is_empty() {
        return Err(CoreError::EmptyDeck.into());
    }

    let cost = mode.stamina_cost();
    stamina::ensure_available(&user.stamina_state(), cost)?;

    let phase = BattlePhase::Matchmaking;
    let opponent = match mode {
        BattleMode::Bot => {
            let size = battle::squad_size(cards.len(), cards.len());
            let mut rng = state.dice.rng();
            battle::generate_bot(&mut rng, &catalog, user.level, size)
        }
        BattleMode::Pvp => find_pvp_opponent(state, &mut tx, user_id, cards.len()).await?,
    };
    let phase = phase.advance(BattlePhase::Matched)?;

    let stamina_left = if cost > 0 {
        let applied = LedgerRepo::apply(&mut tx, &user, &LedgerDelta::new().stamina(-cost)).await?;
        applied.balances.stamina
    } else {
        user.stamina
    };
    tx.commit().await?;

    state
        .battles
        .insert(
            user_id,
            PendingBattle {
                opponent: opponent.clone(),
                phase,
                matched_at: now,
            },
        )
        .await;

    tracing::info!(
        user_id,
        mode = ?mode,
        opponent = %opponent.name,
        opponent_power = opponent.total_power,
        "Battle matched"
    );

    Ok(MatchResult {
        mode,
        opponent,
        stamina_cost: cost,
        stamina: stamina_left,
    })
}

/// Pick another producer with a non-empty deck, retrying a bounded number of times.
async fn find_pvp_opponent(
    state: &AppState,
    conn: &mut PgConnection,
    user_id: DbId,
    player_size: usize,
) -> AppResult<Opponent> {
    for attempt in 1..=MATCHMAKING_ATTEMPTS {
        let candidates = UserRepo::pvp_candidates(&mut *conn, user_id, PVP_CANDIDATE_POOL).await?;
        let candidate = {
            let mut rng = state.dice.rng();
            candidates.choose(&mut rng).cloned()
        };
        if let Some(candidate) = candidate {
            let cards = DeckRepo::cards(&mut *conn, candidate.id).await?;
            if !cards.is_empty() {
                let size = battle::squad_size(player_size, cards.len());
                return Ok(battle::pvp_opponent(candidate.name, snapshots(&cards)?, size));
            }
        }
        tracing::debug!(user_id, attempt, "No PVP opponent found");
        if attempt < MATCHMAKING_ATTEMPTS {
            tokio::time::sleep(PVP_RETRY_BACKOFF * attempt).await;
        }
    }
    Err(CoreError::Unavailable("No opponent available, try again shortly".to_string()).into())
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Score the pending battle server-side and grant its reward.
///
/// `reported_won` from the client is only compared and logged.
pub async fn finish(
    state: &AppState,
    user_id: DbId,
    reported_won: Option<bool>,
) -> AppResult<FinishResult> {
    let _guard = state.user_locks.acquire(user_id).await;
    let pending = state
        .battles
        .get(user_id)
        .await
        .ok_or_else(|| CoreError::Conflict("No battle in progress".to_string()))?;
    if pending.is_expired(Utc::now()) {
        state.battles.remove(user_id).await;
        return Err(CoreError::Conflict("Matched battle has expired".to_string()).into());
    }
    let phase = pending.phase.advance(BattlePhase::InProgress)?;

    let mut tx = state.pool.begin().await?;
    let user = lock_user(&mut tx, user_id, Utc::now()).await?;
    let cards = DeckRepo::cards(&mut *tx, user_id).await?;
    if cards.is_empty() {
        return Err(CoreError::EmptyDeck.into());
    }
    let player = snapshots(&cards)?;

    let score = battle::score(&player, &pending.opponent.squad);
    phase.advance(BattlePhase::Resolved)?;

    let rewards = battle::reward_for(score.outcome);
    let applied = LedgerRepo::apply(&mut tx, &user, &LedgerDelta::from(&rewards)).await?;
    tx.commit().await?;
    state.battles.remove(user_id).await;

    let won = score.outcome == BattleOutcome::Win;
    if let Some(reported) = reported_won.filter(|r| *r != won) {
        tracing::warn!(user_id, reported, won, "Client battle result ignored");
    }
    tracing::info!(
        user_id,
        won,
        player_total = score.player_total,
        opponent_total = score.opponent_total,
        "Battle resolved"
    );

    Ok(FinishResult {
        success: true,
        won,
        rewards,
        turns: score.turns,
        player_total: score.player_total,
        opponent_total: score.opponent_total,
        level: applied.balances.level,
        levels_gained: applied.levels_gained,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(matched_at: Timestamp) -> PendingBattle {
        PendingBattle {
            opponent: Opponent::new("Rival", BattleMode::Bot, Vec::new()),
            phase: BattlePhase::Matched,
            matched_at,
        }
    }

    #[test]
    fn pending_battles_expire_after_ttl() {
        let now = Utc::now();
        assert!(!pending(now).is_expired(now));
        let edge = now - chrono::Duration::seconds(PENDING_BATTLE_TTL_SECS);
        assert!(!pending(edge).is_expired(now));
        assert!(pending(edge - chrono::Duration::seconds(1)).is_expired(now));
    }
}
