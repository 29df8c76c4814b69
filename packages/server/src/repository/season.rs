use std::sync::RwLock;

use async_trait::async_trait;
use common::{Season, SeasonId};
use dashmap::DashMap;

#[async_trait]
pub trait SeasonRepository: Send + Sync {
    async fn save(&self, season: Season);

    async fn find(&self, id: SeasonId) -> Option<Season>;

    /// The season currently being played, if one is marked.
    async fn current(&self) -> Option<Season>;

    async fn set_current(&self, id: SeasonId);
}

#[derive(Default)]
pub struct InMemorySeasonRepository {
    seasons: DashMap<SeasonId, Season>,
    current: RwLock<Option<SeasonId>>,
}

#[async_trait]
impl SeasonRepository for InMemorySeasonRepository {
    async fn save(&self, season: Season) {
        self.seasons.insert(season.id, season);
    }

    async fn find(&self, id: SeasonId) -> Option<Season> {
        self.seasons.get(&id).map(|s| s.clone())
    }

    async fn current(&self) -> Option<Season> {
        let id = (*self.current.read().unwrap_or_else(|e| e.into_inner()))?;
        self.find(id).await
    }

    async fn set_current(&self, id: SeasonId) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(id);
    }
}
