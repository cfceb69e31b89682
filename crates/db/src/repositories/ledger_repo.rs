//! The only writer of user balances, inventory and idol affection.

use idolsim_core::error::CoreError;
use idolsim_core::ledger::{self, Applied, LedgerDelta};
use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::user::User;
use crate::repositories::{IdolRepo, InventoryRepo, UserRepo};

pub struct LedgerRepo;

impl LedgerRepo {
    /// Validate and apply `delta` to a user inside the caller's transaction.
    ///
    /// `user` must have been fetched with [`UserRepo::lock_for_update`] on the
    /// same connection. Nothing is written unless the whole delta validates;
    /// if a later write fails the caller drops the transaction and every
    /// earlier write rolls back with it.
    pub async fn apply(
        conn: &mut PgConnection,
        user: &User,
        delta: &LedgerDelta,
    ) -> Result<Applied, DbError> {
        let items = InventoryRepo::list(&mut *conn, user.id).await?;
        let applied = ledger::apply(&user.balances(items), delta)?;

        if !delta.affection.is_empty() {
            let wanted: Vec<_> = delta.affection.keys().copied().collect();
            let owned = IdolRepo::owned_ids(&mut *conn, user.id, &wanted).await?;
            if let Some(missing) = wanted.iter().find(|id| !owned.contains(id)) {
                return Err(CoreError::NotFound {
                    entity: "idol",
                    id: *missing,
                }
                .into());
            }
        }

        UserRepo::save_balances(&mut *conn, user.id, &applied.balances).await?;

        for name in delta.items.keys() {
            let count = applied.balances.item_count(name);
            InventoryRepo::set_count(&mut *conn, user.id, name, count).await?;
        }

        for (idol_id, amount) in &delta.affection {
            if !IdolRepo::add_affection(&mut *conn, user.id, *idol_id, *amount).await? {
                return Err(CoreError::NotFound {
                    entity: "idol",
                    id: *idol_id,
                }
                .into());
            }
        }

        if applied.levels_gained > 0 {
            tracing::info!(
                user_id = user.id,
                level = applied.balances.level,
                levels_gained = applied.levels_gained,
                "User leveled up"
            );
        }

        Ok(applied)
    }
}
