//! Per-user critical sections.
//!
//! Every mutating request for a user runs while holding that user's guard,
//! so two requests for the same producer never interleave inside this
//! process. Different users never contend.

use std::collections::HashMap;
use std::sync::Arc;

use idolsim_core::types::DbId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of one async mutex per user id.
///
/// Designed to be wrapped in `Arc` and shared across the application.
pub struct UserLocks {
    locks: Mutex<HashMap<DbId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Wait for and take the critical section of `user_id`.
    ///
    /// The section is released when the returned guard is dropped.
    pub async fn acquire(&self, user_id: DbId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Drop entries nobody holds or waits on.
            locks.retain(|id, l| *id == user_id || Arc::strong_count(l) > 1);
            Arc::clone(locks.entry(user_id).or_default())
        };
        lock.lock_owned().await
    }
}

impl Default for UserLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_user_waits_for_release() {
        let locks = Arc::new(UserLocks::new());
        let guard = locks.acquire(1).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(1).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender should acquire after release")
            .unwrap();
    }

    #[tokio::test]
    async fn different_users_do_not_contend() {
        let locks = UserLocks::new();
        let _a = locks.acquire(1).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire(2)).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn released_entries_are_pruned() {
        let locks = UserLocks::new();
        drop(locks.acquire(1).await);
        drop(locks.acquire(2).await);
        let _c = locks.acquire(3).await;
        assert_eq!(locks.locks.lock().await.len(), 1);
    }
}
