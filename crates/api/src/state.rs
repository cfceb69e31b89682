use std::sync::Arc;

use idolsim_core::catalog::{CatalogSnapshot, CatalogStore};

use crate::config::ServerConfig;
use crate::dice::Dice;
use crate::engine::battle::PendingBattles;
use crate::locks::UserLocks;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: idolsim_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Current catalog snapshot, replaced by the sync task.
    pub catalog: Arc<CatalogStore>,
    /// Per-user critical sections for mutating requests.
    pub user_locks: Arc<UserLocks>,
    /// Randomness for gacha, work and battle rolls.
    pub dice: Arc<Dice>,
    /// Matched opponents waiting for `/battle/finish`.
    pub battles: Arc<PendingBattles>,
}

impl AppState {
    pub fn new(pool: idolsim_db::DbPool, config: ServerConfig, catalog: CatalogSnapshot) -> Self {
        let dice = Dice::new(config.rng_seed);
        Self {
            pool,
            config: Arc::new(config),
            catalog: Arc::new(CatalogStore::new(catalog)),
            user_locks: Arc::new(UserLocks::new()),
            dice: Arc::new(dice),
            battles: Arc::new(PendingBattles::new()),
        }
    }
}
