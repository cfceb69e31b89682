//! Consumable items: effects on use and the work drop table.

use rand::Rng;

use crate::error::{CoreError, Resource};
use crate::ledger::{Balances, LedgerDelta};

/// Restores [`STAMINA_DRINK_AMOUNT`] stamina.
pub const STAMINA_DRINK: &str = "stamina_drink";

/// Restores stamina to the maximum.
pub const STAMINA_DRINK_FULL: &str = "stamina_drink_full";

pub const STAMINA_DRINK_AMOUNT: i32 = 20;

/// Work drop table as `(item, weight)`; weights sum to 100.
pub const WORK_DROP_TABLE: [(&str, u32); 2] = [(STAMINA_DRINK, 80), (STAMINA_DRINK_FULL, 20)];

/// What using an item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEffect {
    RestoreStamina(i32),
    RestoreStaminaFull,
}

/// Look up the effect of a usable item.
pub fn effect_of(item: &str) -> Result<ItemEffect, CoreError> {
    match item {
        STAMINA_DRINK => Ok(ItemEffect::RestoreStamina(STAMINA_DRINK_AMOUNT)),
        STAMINA_DRINK_FULL => Ok(ItemEffect::RestoreStaminaFull),
        other => Err(CoreError::Validation(format!("Unknown item '{other}'"))),
    }
}

/// Build the ledger delta for using one `item`.
///
/// Requires at least one in inventory and stamina below the maximum, so a
/// drink is never wasted.
pub fn use_item(balances: &Balances, item: &str) -> Result<LedgerDelta, CoreError> {
    let effect = effect_of(item)?;
    let have = balances.item_count(item);
    if have < 1 {
        return Err(CoreError::insufficient(Resource::Item, 1, have));
    }
    if balances.stamina >= balances.max_stamina {
        return Err(CoreError::Validation("Stamina is already full".to_string()));
    }
    let restore = match effect {
        ItemEffect::RestoreStamina(amount) => amount,
        ItemEffect::RestoreStaminaFull => balances.max_stamina - balances.stamina,
    };
    Ok(LedgerDelta::new().item(item, -1).stamina(restore))
}

/// Pick an item from [`WORK_DROP_TABLE`].
pub fn roll_work_drop<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    let total: u32 = WORK_DROP_TABLE.iter().map(|(_, w)| w).sum();
    let mut ticket = rng.random_range(0..total);
    for (item, weight) in WORK_DROP_TABLE {
        if ticket < weight {
            return item;
        }
        ticket -= weight;
    }
    STAMINA_DRINK
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert_matches::assert_matches;

    use super::*;
    use crate::ledger::apply;

    fn balances(stamina: i32, drinks: i64) -> Balances {
        Balances {
            money: 0,
            star_jewels: 0,
            level: 1,
            exp: 0,
            max_exp: 100,
            stamina,
            max_stamina: 50,
            items: BTreeMap::from([
                (STAMINA_DRINK.to_string(), drinks),
                (STAMINA_DRINK_FULL.to_string(), drinks),
            ]),
        }
    }

    #[test]
    fn stamina_drink_restores_and_consumes_one() {
        let b = balances(10, 2);
        let applied = apply(&b, &use_item(&b, STAMINA_DRINK).unwrap()).unwrap();
        assert_eq!(applied.balances.stamina, 30);
        assert_eq!(applied.balances.item_count(STAMINA_DRINK), 1);
    }

    #[test]
    fn full_drink_fills_to_max() {
        let b = balances(3, 1);
        let applied = apply(&b, &use_item(&b, STAMINA_DRINK_FULL).unwrap()).unwrap();
        assert_eq!(applied.balances.stamina, 50);
    }

    #[test]
    fn drink_near_max_is_capped() {
        let b = balances(45, 1);
        let applied = apply(&b, &use_item(&b, STAMINA_DRINK).unwrap()).unwrap();
        assert_eq!(applied.balances.stamina, 50);
    }

    #[test]
    fn rejects_unknown_missing_and_wasted_items() {
        assert_matches!(use_item(&balances(10, 1), "cake"), Err(CoreError::Validation(_)));
        assert_matches!(
            use_item(&balances(10, 0), STAMINA_DRINK),
            Err(CoreError::InsufficientResource {
                resource: Resource::Item,
                ..
            })
        );
        assert_matches!(use_item(&balances(50, 1), STAMINA_DRINK), Err(CoreError::Validation(_)));
    }
}
