//! Game action orchestration.
//!
//! Each operation takes the user's critical section, opens one transaction
//! that row-locks the user, brings stamina up to date, runs the pure
//! resolver from `idolsim_core`, commits every balance change through
//! [`idolsim_db::repositories::LedgerRepo`] and returns a result payload.

pub mod battle;
pub mod deck;
pub mod events;
pub mod gacha;
pub mod idols;
pub mod items;
pub mod login_bonus;
pub mod presents;
pub mod promo;
pub mod stamina;
pub mod users;
pub mod work;

use std::future::Future;

use crate::error::AppResult;

/// Run `op`, and run it once more if it lost a race.
pub async fn retry_on_conflict<T, F, Fut>(operation: &'static str, mut op: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    match op().await {
        Err(e) if e.is_retryable_conflict() => {
            tracing::warn!(operation, error = %e, "Retrying after conflict");
            op().await
        }
        other => other,
    }
}
