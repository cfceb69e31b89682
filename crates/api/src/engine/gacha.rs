//! Gacha pulls.

use chrono::Utc;
use idolsim_core::catalog::{IdolType, Rarity};
use idolsim_core::error::CoreError;
use idolsim_core::gacha::{self, PullCount};
use idolsim_core::ledger::LedgerDelta;
use idolsim_core::types::DbId;
use idolsim_db::repositories::{GachaRepo, IdolRepo, LedgerRepo};
use serde::Serialize;

use crate::engine::stamina::lock_user;
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PulledIdol {
    pub id: DbId,
    pub template_id: DbId,
    pub name: String,
    pub rarity: Rarity,
    pub idol_type: IdolType,
    pub guaranteed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GachaResult {
    pub pulled_idols: Vec<PulledIdol>,
    pub new_jewels: i64,
}

/// Spend star jewels and grant `count` new idols in draw order.
pub async fn pull(state: &AppState, user_id: DbId, count: u32) -> AppResult<GachaResult> {
    let count = PullCount::try_from(count)?;
    let catalog = state.catalog.current();

    let _guard = state.user_locks.acquire(user_id).await;
    let mut tx = state.pool.begin().await?;
    let user = lock_user(&mut tx, user_id, Utc::now()).await?;
    gacha::ensure_affordable(user.star_jewels, count)?;

    let draws = {
        let mut rng = state.dice.rng();
        gacha::draw(&mut rng, &catalog, count)?
    };

    let applied = LedgerRepo::apply(
        &mut tx,
        &user,
        &LedgerDelta::new().star_jewels(-count.cost()),
    )
    .await?;

    let mut pulled = Vec::with_capacity(draws.len());
    for draw in &draws {
        let template = catalog.template(draw.template_id).ok_or_else(|| {
            CoreError::Internal(format!("Drawn template {} missing", draw.template_id))
        })?;
        let idol = IdolRepo::create(&mut tx, user_id, draw.template_id).await?;
        GachaRepo::record(&mut tx, user_id, draw).await?;
        pulled.push(PulledIdol {
            id: idol.id,
            template_id: template.id,
            name: template.name.clone(),
            rarity: draw.rarity,
            idol_type: template.idol_type,
            guaranteed: draw.guaranteed,
        });
    }
    tx.commit().await?;

    tracing::info!(
        user_id,
        draws = pulled.len(),
        ssr = pulled.iter().filter(|p| p.rarity == Rarity::Ssr).count(),
        new_jewels = applied.balances.star_jewels,
        "Gacha pull completed"
    );

    Ok(GachaResult {
        pulled_idols: pulled,
        new_jewels: applied.balances.star_jewels,
    })
}
