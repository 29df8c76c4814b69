use std::sync::Arc;

use common::UserId;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes writes per user.
///
/// Every read-modify-write on a user's prediction or cooldown holds the
/// user's guard for its whole duration, so two concurrent swaps for the same
/// user cannot both pass the position check against the same stored ranking.
#[derive(Default)]
pub struct UserLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLocks {
    pub async fn acquire(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(user_id).or_default().clone();
        lock.lock_owned().await
    }
}
