//! Reward bundles shared by events, promo codes, battles and presents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A fixed bundle of currency, experience and items.
///
/// Stored as JSON in the database (event tiers, promo codes) and returned
/// to clients in result payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewardBundle {
    pub money: i64,
    pub star_jewels: i64,
    pub exp: i64,
    pub items: BTreeMap<String, i64>,
}

impl RewardBundle {
    pub fn money(amount: i64) -> Self {
        Self {
            money: amount,
            ..Self::default()
        }
    }

    pub fn star_jewels(amount: i64) -> Self {
        Self {
            star_jewels: amount,
            ..Self::default()
        }
    }

    pub fn with_item(mut self, name: impl Into<String>, count: i64) -> Self {
        *self.items.entry(name.into()).or_insert(0) += count;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.money == 0
            && self.star_jewels == 0
            && self.exp == 0
            && self.items.values().all(|c| *c == 0)
    }

    /// `true` when no field would take anything away from the user.
    pub fn is_non_negative(&self) -> bool {
        self.money >= 0
            && self.star_jewels >= 0
            && self.exp >= 0
            && self.items.values().all(|c| *c >= 0)
    }

    /// Sum two bundles field by field.
    pub fn merge(mut self, other: &RewardBundle) -> Self {
        self.money += other.money;
        self.star_jewels += other.star_jewels;
        self.exp += other.exp;
        for (name, count) in &other.items {
            *self.items.entry(name.clone()).or_insert(0) += count;
        }
        self
    }
}
