//! Battle matchmaking rules, turn scoring and rewards.
//!
//! A battle moves through [`BattlePhase`] in a fixed order. Opponents are
//! ephemeral: bots are generated from the catalog, PvP opponents are
//! snapshots of another producer's deck. Neither is ever persisted.

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogSnapshot, IdolTemplate, Rarity};
use crate::deck::DECK_SIZE;
use crate::error::CoreError;
use crate::reward::RewardBundle;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Turns are bounded by the deck size.
pub const MAX_TURNS: usize = DECK_SIZE;

/// Stamina charged when a PvP match is found.
pub const PVP_STAMINA_COST: i32 = 10;

/// Bot stat growth per producer level.
pub const BOT_LEVEL_SCALE: f64 = 0.05;

/// Maximum relative deviation applied to each bot stat.
pub const BOT_STAT_JITTER: f64 = 0.10;

/// Matchmaking attempts before PvP gives up with a retryable error.
pub const MATCHMAKING_ATTEMPTS: u32 = 3;

/// Result recorded for the player when both totals are equal.
pub const TIE_OUTCOME: BattleOutcome = BattleOutcome::Loss;

pub const WIN_MONEY: i64 = 1_000;
pub const WIN_EXP: i64 = 20;
pub const WIN_STAR_JEWELS: i64 = 5;
pub const LOSS_MONEY: i64 = 200;
pub const LOSS_EXP: i64 = 5;

const BOT_NAMES: [&str; 4] = [
    "Rival Unit Aurora",
    "Rival Unit Nocturne",
    "Rival Unit Ember",
    "Rival Unit Prism",
];

// ---------------------------------------------------------------------------
// Modes and phases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleMode {
    Bot,
    Pvp,
}

impl BattleMode {
    pub fn stamina_cost(self) -> i32 {
        match self {
            Self::Bot => 0,
            Self::Pvp => PVP_STAMINA_COST,
        }
    }
}

impl FromStr for BattleMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bot" => Ok(Self::Bot),
            "pvp" => Ok(Self::Pvp),
            _ => Err(CoreError::Validation(format!("Unknown battle mode '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    Matchmaking,
    Matched,
    InProgress,
    Resolved,
}

impl BattlePhase {
    /// Move to `next`, rejecting skips and reversals.
    pub fn advance(self, next: BattlePhase) -> Result<BattlePhase, CoreError> {
        let allowed = matches!(
            (self, next),
            (Self::Matchmaking, Self::Matched)
                | (Self::Matched, Self::InProgress)
                | (Self::InProgress, Self::Resolved)
        );
        if !allowed {
            return Err(CoreError::Conflict(format!(
                "Battle cannot move from {self:?} to {next:?}"
            )));
        }
        Ok(next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleOutcome {
    Win,
    Loss,
}

// ---------------------------------------------------------------------------
// Squads
// ---------------------------------------------------------------------------

/// Frozen copy of one card's battle stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSnapshot {
    pub name: String,
    pub rarity: Rarity,
    pub vocal: i32,
    pub dance: i32,
    pub visual: i32,
    pub total: i64,
}

impl CardSnapshot {
    pub fn new(
        name: impl Into<String>,
        rarity: Rarity,
        vocal: i32,
        dance: i32,
        visual: i32,
    ) -> Self {
        Self {
            name: name.into(),
            rarity,
            vocal,
            dance,
            visual,
            total: i64::from(vocal) + i64::from(dance) + i64::from(visual),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Opponent {
    pub name: String,
    pub mode: BattleMode,
    pub squad: Vec<CardSnapshot>,
    pub total_power: i64,
}

impl Opponent {
    pub fn new(name: impl Into<String>, mode: BattleMode, squad: Vec<CardSnapshot>) -> Self {
        let total_power = squad.iter().map(|c| c.total).sum();
        Self {
            name: name.into(),
            mode,
            squad,
            total_power,
        }
    }
}

/// Opponent squad size: `min(4, max(player_deck_size, opponent_pool_size))`.
pub fn squad_size(player_deck_size: usize, opponent_pool_size: usize) -> usize {
    player_deck_size.max(opponent_pool_size).min(DECK_SIZE)
}

/// Generate a bot squad scaled to the player's level.
pub fn generate_bot<R: Rng + ?Sized>(
    rng: &mut R,
    catalog: &CatalogSnapshot,
    player_level: i32,
    size: usize,
) -> Opponent {
    let mut pool: Vec<&IdolTemplate> = catalog.templates().collect();
    pool.sort_by_key(|t| t.id);

    let scale = 1.0 + f64::from(player_level.max(1)) * BOT_LEVEL_SCALE;
    let mut squad = Vec::with_capacity(size);
    if !pool.is_empty() {
        for _ in 0..size {
            let template = pool[rng.random_range(0..pool.len())];
            let mut stat = |base: i32| -> i32 {
                let jitter = 1.0 + rng.random_range(-BOT_STAT_JITTER..=BOT_STAT_JITTER);
                (f64::from(base) * scale * jitter).round().max(0.0) as i32
            };
            let vocal = stat(template.vocal);
            let dance = stat(template.dance);
            let visual = stat(template.visual);
            squad.push(CardSnapshot::new(
                template.name.clone(),
                template.rarity,
                vocal,
                dance,
                visual,
            ));
        }
    }

    let name = BOT_NAMES[rng.random_range(0..BOT_NAMES.len())];
    Opponent::new(name, BattleMode::Bot, squad)
}

/// Build a PvP opponent from another producer's deck, trimmed to `size`.
pub fn pvp_opponent(
    name: impl Into<String>,
    mut cards: Vec<CardSnapshot>,
    size: usize,
) -> Opponent {
    cards.truncate(size);
    Opponent::new(name, BattleMode::Pvp, cards)
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnScore {
    pub turn: usize,
    pub player: i64,
    pub opponent: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleScore {
    pub turns: Vec<TurnScore>,
    pub player_total: i64,
    pub opponent_total: i64,
    pub outcome: BattleOutcome,
}

/// Score both squads slot by slot.
///
/// The number of turns is the larger squad size, capped at [`MAX_TURNS`].
/// A side with no card in a slot scores zero for that turn.
pub fn score(player: &[CardSnapshot], opponent: &[CardSnapshot]) -> BattleScore {
    let turn_count = player.len().max(opponent.len()).min(MAX_TURNS);
    let turns: Vec<TurnScore> = (0..turn_count)
        .map(|i| TurnScore {
            turn: i + 1,
            player: player.get(i).map_or(0, |c| c.total),
            opponent: opponent.get(i).map_or(0, |c| c.total),
        })
        .collect();

    let player_total: i64 = turns.iter().map(|t| t.player).sum();
    let opponent_total: i64 = turns.iter().map(|t| t.opponent).sum();
    let outcome = match player_total.cmp(&opponent_total) {
        std::cmp::Ordering::Greater => BattleOutcome::Win,
        std::cmp::Ordering::Less => BattleOutcome::Loss,
        std::cmp::Ordering::Equal => TIE_OUTCOME,
    };

    BattleScore {
        turns,
        player_total,
        opponent_total,
        outcome,
    }
}

/// Reward bundle granted for a finished battle.
pub fn reward_for(outcome: BattleOutcome) -> RewardBundle {
    match outcome {
        BattleOutcome::Win => RewardBundle {
            money: WIN_MONEY,
            star_jewels: WIN_STAR_JEWELS,
            exp: WIN_EXP,
            ..RewardBundle::default()
        },
        BattleOutcome::Loss => RewardBundle {
            money: LOSS_MONEY,
            exp: LOSS_EXP,
            ..RewardBundle::default()
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
