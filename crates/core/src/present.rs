//! Present box entries: pending rewards waiting to be claimed.

use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::ledger::LedgerDelta;
use crate::reward::RewardBundle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentKind {
    Money,
    StarJewels,
    Exp,
    Item,
}

impl PresentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Money => "money",
            Self::StarJewels => "star_jewels",
            Self::Exp => "exp",
            Self::Item => "item",
        }
    }
}

impl FromStr for PresentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "money" => Ok(Self::Money),
            "star_jewels" => Ok(Self::StarJewels),
            "exp" => Ok(Self::Exp),
            "item" => Ok(Self::Item),
            other => Err(CoreError::Validation(format!("Unknown present type '{other}'"))),
        }
    }
}

/// A present about to be queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPresent {
    pub kind: PresentKind,
    pub item_name: Option<String>,
    pub amount: i64,
    pub description: String,
}

/// Split a reward bundle into one present per non-zero component.
pub fn presents_for(bundle: &RewardBundle, description: &str) -> Vec<NewPresent> {
    let mut presents = Vec::new();
    let mut push = |kind, item_name: Option<String>, amount: i64| {
        if amount > 0 {
            presents.push(NewPresent {
                kind,
                item_name,
                amount,
                description: description.to_string(),
            });
        }
    };
    push(PresentKind::Money, None, bundle.money);
    push(PresentKind::StarJewels, None, bundle.star_jewels);
    push(PresentKind::Exp, None, bundle.exp);
    for (name, count) in &bundle.items {
        push(PresentKind::Item, Some(name.clone()), *count);
    }
    presents
}

/// Ledger delta granted when a present is claimed.
pub fn delta_for(
    kind: PresentKind,
    item_name: Option<&str>,
    amount: i64,
) -> Result<LedgerDelta, CoreError> {
    if amount <= 0 {
        return Err(CoreError::Validation("Present amount must be positive".to_string()));
    }
    let delta = LedgerDelta::new();
    Ok(match kind {
        PresentKind::Money => delta.money(amount),
        PresentKind::StarJewels => delta.star_jewels(amount),
        PresentKind::Exp => delta.exp(amount),
        PresentKind::Item => {
            let name = item_name.ok_or_else(|| {
                CoreError::Internal("Item present without an item name".to_string())
            })?;
            delta.item(name, amount)
        }
    })
}
