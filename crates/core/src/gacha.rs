//! Gacha pricing, rarity weights and the ten-pull guarantee.

use rand::Rng;
use serde::Serialize;

use crate::catalog::{CatalogSnapshot, Rarity};
use crate::error::{CoreError, Resource};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Star jewel price of a single draw.
pub const SINGLE_PULL_COST: i64 = 250;

/// Star jewel price of a ten-draw batch.
pub const TEN_PULL_COST: i64 = 2_500;

/// Rarity weights in per-mille. Must sum to [`WEIGHT_TOTAL`].
pub const RARITY_WEIGHTS: [(Rarity, u32); 4] = [
    (Rarity::Ssr, 30),
    (Rarity::Sr, 120),
    (Rarity::R, 350),
    (Rarity::N, 500),
];

pub const WEIGHT_TOTAL: u32 = 1_000;

/// Minimum rarity a ten-pull is guaranteed to contain.
pub const GUARANTEED_RARITY: Rarity = Rarity::Sr;

// ---------------------------------------------------------------------------
// Pull size
// ---------------------------------------------------------------------------

/// Supported batch sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullCount {
    Single,
    Ten,
}

impl PullCount {
    pub fn draws(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Ten => 10,
        }
    }

    pub fn cost(self) -> i64 {
        match self {
            Self::Single => SINGLE_PULL_COST,
            Self::Ten => TEN_PULL_COST,
        }
    }

    pub fn has_guarantee(self) -> bool {
        matches!(self, Self::Ten)
    }
}

impl TryFrom<u32> for PullCount {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Single),
            10 => Ok(Self::Ten),
            other => Err(CoreError::Validation(format!(
                "Pull count must be 1 or 10, got {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Rolling
// ---------------------------------------------------------------------------

/// One drawn card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draw {
    pub template_id: DbId,
    pub rarity: Rarity,
    /// Set when the ten-pull guarantee raised this draw's rarity.
    pub guaranteed: bool,
}

/// Check that `star_jewels` covers the price of `count`.
pub fn ensure_affordable(star_jewels: i64, count: PullCount) -> Result<(), CoreError> {
    if star_jewels < count.cost() {
        return Err(CoreError::insufficient(
            Resource::StarJewels,
            count.cost(),
            star_jewels,
        ));
    }
    Ok(())
}

/// Roll a single rarity using [`RARITY_WEIGHTS`].
pub fn roll_rarity<R: Rng + ?Sized>(rng: &mut R) -> Rarity {
    let mut ticket = rng.random_range(0..WEIGHT_TOTAL);
    for (rarity, weight) in RARITY_WEIGHTS {
        if ticket < weight {
            return rarity;
        }
        ticket -= weight;
    }
    Rarity::N
}

/// Raise the first lowest-rarity entry to [`GUARANTEED_RARITY`] if the batch
/// has nothing at or above it.
///
/// Returns the index that was upgraded, if any.
pub fn apply_guarantee(rarities: &mut [Rarity]) -> Option<usize> {
    if rarities.iter().any(|r| *r >= GUARANTEED_RARITY) {
        return None;
    }
    let lowest = rarities.iter().copied().min()?;
    let index = rarities.iter().position(|r| *r == lowest)?;
    rarities[index] = GUARANTEED_RARITY;
    Some(index)
}

/// Roll `count` independent draws against `catalog`, in draw order.
///
/// Templates are picked uniformly inside the rolled rarity bucket.
pub fn draw<R: Rng + ?Sized>(
    rng: &mut R,
    catalog: &CatalogSnapshot,
    count: PullCount,
) -> Result<Vec<Draw>, CoreError> {
    let mut rarities: Vec<Rarity> = (0..count.draws()).map(|_| roll_rarity(rng)).collect();
    let upgraded = if count.has_guarantee() {
        apply_guarantee(&mut rarities)
    } else {
        None
    };

    rarities
        .into_iter()
        .enumerate()
        .map(|(i, rarity)| {
            let ids = catalog.template_ids(rarity);
            if ids.is_empty() {
                return Err(CoreError::Internal(format!(
                    "Gacha pool has no {} templates",
                    rarity.as_str()
                )));
            }
            Ok(Draw {
                template_id: ids[rng.random_range(0..ids.len())],
                rarity,
                guaranteed: upgraded == Some(i),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
