//! Idol instance rules: the affection cap, retirement and the starter grant
//! given to new producers.

use rand::Rng;

use crate::catalog::{CatalogSnapshot, IdolType, Rarity};
use crate::error::CoreError;
use crate::types::DbId;

/// Affection never rises above this value.
pub const MAX_AFFECTION: i32 = 100;

/// Locked idols are protected from retirement.
pub fn ensure_retirable(idol_id: DbId, locked: bool) -> Result<(), CoreError> {
    if locked {
        return Err(CoreError::Conflict(format!(
            "Idol {idol_id} is locked and cannot be retired"
        )));
    }
    Ok(())
}

/// Pick one N-rarity template per idol type for a new user.
///
/// Types without an N template fall back to any N template.
pub fn starter_templates<R: Rng + ?Sized>(rng: &mut R, catalog: &CatalogSnapshot) -> Vec<DbId> {
    let commons = catalog.template_ids(Rarity::N);
    if commons.is_empty() {
        return Vec::new();
    }
    IdolType::ALL
        .iter()
        .map(|idol_type| {
            let typed: Vec<DbId> = commons
                .iter()
                .copied()
                .filter(|id| {
                    catalog
                        .template(*id)
                        .is_some_and(|t| t.idol_type == *idol_type)
                })
                .collect();
            let pool: &[DbId] = if typed.is_empty() { commons } else { &typed };
            pool[rng.random_range(0..pool.len())]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::catalog::tests::sample_document;

    #[test]
    fn locked_idols_cannot_retire() {
        assert!(matches!(ensure_retirable(5, true), Err(CoreError::Conflict(_))));
        assert!(ensure_retirable(5, false).is_ok());
    }

    #[test]
    fn starter_grant_gives_one_common_per_type() {
        let catalog = CatalogSnapshot::build(1, sample_document()).unwrap();
        let picks = starter_templates(&mut StdRng::seed_from_u64(3), &catalog);
        assert_eq!(picks.len(), IdolType::ALL.len());
        for id in picks {
            assert_eq!(catalog.template(id).unwrap().rarity, Rarity::N);
        }
    }
}
