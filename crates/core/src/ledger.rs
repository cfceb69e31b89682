//! Reward/inventory ledger rules.
//!
//! Every change to a user's balances is expressed as a [`LedgerDelta`] and
//! checked by [`apply`] before anything is written. `apply` works on a copy:
//! either the whole delta is valid and a new [`Balances`] is returned, or an
//! error is returned and the caller's balances are untouched. The database
//! layer then writes the result inside a single transaction.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{CoreError, Resource};
use crate::reward::RewardBundle;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Experience needed to clear level 1.
pub const BASE_MAX_EXP: i64 = 100;

/// Additional experience needed per level beyond the first.
pub const MAX_EXP_PER_LEVEL: i64 = 20;

/// Maximum stamina gained with each level-up.
pub const MAX_STAMINA_PER_LEVEL: i32 = 1;

/// Upper bound for `max_stamina` growth through leveling.
pub const MAX_STAMINA_CAP: i32 = 200;

/// Experience threshold for clearing `level`.
pub fn max_exp_for_level(level: i32) -> i64 {
    BASE_MAX_EXP + MAX_EXP_PER_LEVEL * i64::from(level.max(1) - 1)
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Tracked balances of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    pub money: i64,
    pub star_jewels: i64,
    pub level: i32,
    pub exp: i64,
    pub max_exp: i64,
    pub stamina: i32,
    pub max_stamina: i32,
    pub items: BTreeMap<String, i64>,
}

impl Balances {
    pub fn item_count(&self, name: &str) -> i64 {
        self.items.get(name).copied().unwrap_or(0)
    }
}

/// A structured bundle of balance changes applied as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDelta {
    pub money: i64,
    pub star_jewels: i64,
    pub exp: i64,
    /// Negative to spend; positive grants are capped at `max_stamina`.
    pub stamina: i32,
    pub items: BTreeMap<String, i64>,
    /// Affection gained per idol instance.
    pub affection: BTreeMap<DbId, i32>,
}

impl LedgerDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn money(mut self, amount: i64) -> Self {
        self.money += amount;
        self
    }

    pub fn star_jewels(mut self, amount: i64) -> Self {
        self.star_jewels += amount;
        self
    }

    pub fn exp(mut self, amount: i64) -> Self {
        self.exp += amount;
        self
    }

    pub fn stamina(mut self, amount: i32) -> Self {
        self.stamina += amount;
        self
    }

    pub fn item(mut self, name: impl Into<String>, count: i64) -> Self {
        *self.items.entry(name.into()).or_insert(0) += count;
        self
    }

    pub fn affection(mut self, idol_id: DbId, amount: i32) -> Self {
        *self.affection.entry(idol_id).or_insert(0) += amount;
        self
    }

    /// Fold a reward bundle into this delta.
    pub fn reward(mut self, bundle: &RewardBundle) -> Self {
        self.money += bundle.money;
        self.star_jewels += bundle.star_jewels;
        self.exp += bundle.exp;
        for (name, count) in &bundle.items {
            *self.items.entry(name.clone()).or_insert(0) += count;
        }
        self
    }

    /// Combine two deltas into one that applies both.
    pub fn merge(mut self, other: LedgerDelta) -> Self {
        self.money += other.money;
        self.star_jewels += other.star_jewels;
        self.exp += other.exp;
        self.stamina += other.stamina;
        for (name, count) in other.items {
            *self.items.entry(name).or_insert(0) += count;
        }
        for (idol_id, amount) in other.affection {
            *self.affection.entry(idol_id).or_insert(0) += amount;
        }
        self
    }
}

impl From<&RewardBundle> for LedgerDelta {
    fn from(bundle: &RewardBundle) -> Self {
        LedgerDelta::new().reward(bundle)
    }
}

/// Result of a successful [`apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Applied {
    pub balances: Balances,
    pub levels_gained: i32,
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

/// Compute the balances that result from applying `delta` to `current`.
///
/// Fails without side effects if any balance would go negative or the delta
/// tries to remove experience.
pub fn apply(current: &Balances, delta: &LedgerDelta) -> Result<Applied, CoreError> {
    if delta.exp < 0 {
        return Err(CoreError::Validation(
            "Experience cannot be removed".to_string(),
        ));
    }
    if delta.affection.values().any(|a| *a < 0) {
        return Err(CoreError::Validation(
            "Affection cannot be removed".to_string(),
        ));
    }

    let mut next = current.clone();

    next.money = checked_balance(current.money, delta.money, Resource::Money)?;
    next.star_jewels =
        checked_balance(current.star_jewels, delta.star_jewels, Resource::StarJewels)?;

    let stamina = i64::from(current.stamina) + i64::from(delta.stamina);
    if stamina < 0 {
        return Err(CoreError::insufficient(
            Resource::Stamina,
            i64::from(-delta.stamina),
            i64::from(current.stamina),
        ));
    }
    next.stamina = if delta.stamina > 0 {
        // Grants never push past the cap, but never take away an existing surplus.
        (stamina as i32).min(current.max_stamina.max(current.stamina))
    } else {
        stamina as i32
    };

    for (name, change) in &delta.items {
        let have = current.item_count(name);
        let after = have + change;
        if after < 0 {
            return Err(CoreError::insufficient(Resource::Item, -change, have));
        }
        if after == 0 {
            next.items.remove(name);
        } else {
            next.items.insert(name.clone(), after);
        }
    }

    next.exp = current.exp + delta.exp;
    let mut levels_gained = 0;
    while next.max_exp > 0 && next.exp >= next.max_exp {
        next.exp -= next.max_exp;
        next.level += 1;
        next.max_exp = max_exp_for_level(next.level);
        next.max_stamina = (next.max_stamina + MAX_STAMINA_PER_LEVEL)
            .min(MAX_STAMINA_CAP.max(current.max_stamina));
        levels_gained += 1;
    }

    Ok(Applied {
        balances: next,
        levels_gained,
    })
}

fn checked_balance(have: i64, change: i64, resource: Resource) -> Result<i64, CoreError> {
    let after = have + change;
    if after < 0 {
        return Err(CoreError::insufficient(resource, -change, have));
    }
    Ok(after)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn balances() -> Balances {
        Balances {
            money: 1_000,
            star_jewels: 500,
            level: 1,
            exp: 0,
            max_exp: max_exp_for_level(1),
            stamina: 30,
            max_stamina: 50,
            items: BTreeMap::from([("stamina_drink".to_string(), 2)]),
        }
    }

    #[test]
    fn applies_every_field() {
        let delta = LedgerDelta::new()
            .money(250)
            .star_jewels(-100)
            .exp(40)
            .stamina(-10)
            .item("stamina_drink", 1);
        let applied = apply(&balances(), &delta).unwrap();
        assert_eq!(applied.balances.money, 1_250);
        assert_eq!(applied.balances.star_jewels, 400);
        assert_eq!(applied.balances.exp, 40);
        assert_eq!(applied.balances.stamina, 20);
        assert_eq!(applied.balances.item_count("stamina_drink"), 3);
        assert_eq!(applied.levels_gained, 0);
    }

    #[test]
    fn failure_late_in_the_delta_leaves_balances_unchanged() {
        let before = balances();
        let snapshot = before.clone();
        // Currency and stamina are valid; the item underflow comes last.
        let delta = LedgerDelta::new()
            .money(-500)
            .stamina(-10)
            .item("stamina_drink", -5);
        assert_matches!(
            apply(&before, &delta),
            Err(CoreError::InsufficientResource {
                resource: Resource::Item,
                ..
            })
        );
        assert_eq!(before, snapshot);
    }

    #[test]
    fn overspending_currency_is_rejected() {
        assert_matches!(
            apply(&balances(), &LedgerDelta::new().star_jewels(-501)),
            Err(CoreError::InsufficientResource {
                resource: Resource::StarJewels,
                required: 501,
                available: 500,
            })
        );
    }

    #[test]
    fn stamina_grants_are_capped() {
        let applied = apply(&balances(), &LedgerDelta::new().stamina(100)).unwrap();
        assert_eq!(applied.balances.stamina, 50);
    }

    #[test]
    fn exp_overflow_levels_up_repeatedly() {
        // 100 clears level 1, 120 clears level 2, leaving 5.
        let applied = apply(&balances(), &LedgerDelta::new().exp(225)).unwrap();
        assert_eq!(applied.levels_gained, 2);
        assert_eq!(applied.balances.level, 3);
        assert_eq!(applied.balances.exp, 5);
        assert_eq!(applied.balances.max_exp, 140);
        assert_eq!(applied.balances.max_stamina, 52);
        // Leveling does not refill stamina.
        assert_eq!(applied.balances.stamina, 30);
    }

    #[test]
    fn negative_exp_and_affection_are_invalid() {
        assert_matches!(
            apply(&balances(), &LedgerDelta::new().exp(-1)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            apply(&balances(), &LedgerDelta::new().affection(7, -1)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn consumed_items_are_removed_at_zero() {
        let applied = apply(&balances(), &LedgerDelta::new().item("stamina_drink", -2)).unwrap();
        assert!(!applied.balances.items.contains_key("stamina_drink"));
    }

    #[test]
    fn reward_bundle_converts_to_delta() {
        let bundle = RewardBundle::money(10).with_item("stamina_drink", 1);
        let delta = LedgerDelta::from(&bundle);
        assert_eq!(delta.money, 10);
        assert_eq!(delta.items["stamina_drink"], 1);
    }

    #[test]
    fn merged_deltas_add_up() {
        let merged = LedgerDelta::new()
            .money(100)
            .item("stamina_drink", 1)
            .merge(LedgerDelta::new().money(50).item("stamina_drink", 2).affection(7, 1));
        assert_eq!(merged.money, 150);
        assert_eq!(merged.items["stamina_drink"], 3);
        assert_eq!(merged.affection[&7], 1);
    }
}
