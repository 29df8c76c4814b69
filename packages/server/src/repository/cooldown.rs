use async_trait::async_trait;
use common::{SeasonId, SwapCooldown, UserId};
use dashmap::DashMap;

/// Swap cooldown state per (user, season). Absent means the initial state.
#[async_trait]
pub trait CooldownRepository: Send + Sync {
    async fn find(&self, user_id: UserId, season_id: SeasonId) -> Option<SwapCooldown>;

    async fn save(&self, user_id: UserId, season_id: SeasonId, cooldown: SwapCooldown);

    async fn delete(&self, user_id: UserId, season_id: SeasonId);
}

#[derive(Default)]
pub struct InMemoryCooldownRepository {
    cooldowns: DashMap<(UserId, SeasonId), SwapCooldown>,
}

#[async_trait]
impl CooldownRepository for InMemoryCooldownRepository {
    async fn find(&self, user_id: UserId, season_id: SeasonId) -> Option<SwapCooldown> {
        self.cooldowns.get(&(user_id, season_id)).map(|c| c.clone())
    }

    async fn save(&self, user_id: UserId, season_id: SeasonId, cooldown: SwapCooldown) {
        self.cooldowns.insert((user_id, season_id), cooldown);
    }

    async fn delete(&self, user_id: UserId, season_id: SeasonId) {
        self.cooldowns.remove(&(user_id, season_id));
    }
}
