use async_trait::async_trait;
use common::{SeasonId, SeasonPrediction, UserId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

#[async_trait]
pub trait PredictionRepository: Send + Sync {
    async fn find(&self, user_id: UserId, season_id: SeasonId) -> Option<SeasonPrediction>;

    /// Store a prediction unless the user already has one for the season.
    /// Returns `false` when one exists.
    async fn insert(&self, prediction: SeasonPrediction) -> bool;

    /// Store a prediction, replacing any existing one for the same key.
    async fn save(&self, prediction: SeasonPrediction);

    async fn delete(&self, user_id: UserId, season_id: SeasonId) -> bool;

    /// Keep a copy of a seeded prediction so it can be restored later.
    async fn remember_seed(&self, prediction: SeasonPrediction);

    async fn find_seed(&self, user_id: UserId, season_id: SeasonId) -> Option<SeasonPrediction>;
}

#[derive(Default)]
pub struct InMemoryPredictionRepository {
    predictions: DashMap<(UserId, SeasonId), SeasonPrediction>,
    seeds: DashMap<(UserId, SeasonId), SeasonPrediction>,
}

#[async_trait]
impl PredictionRepository for InMemoryPredictionRepository {
    async fn find(&self, user_id: UserId, season_id: SeasonId) -> Option<SeasonPrediction> {
        self.predictions
            .get(&(user_id, season_id))
            .map(|p| p.clone())
    }

    async fn insert(&self, prediction: SeasonPrediction) -> bool {
        match self
            .predictions
            .entry((prediction.user_id, prediction.season_id))
        {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(prediction);
                true
            }
        }
    }

    async fn save(&self, prediction: SeasonPrediction) {
        self.predictions
            .insert((prediction.user_id, prediction.season_id), prediction);
    }

    async fn delete(&self, user_id: UserId, season_id: SeasonId) -> bool {
        self.predictions.remove(&(user_id, season_id)).is_some()
    }

    async fn remember_seed(&self, prediction: SeasonPrediction) {
        self.seeds
            .insert((prediction.user_id, prediction.season_id), prediction);
    }

    async fn find_seed(&self, user_id: UserId, season_id: SeasonId) -> Option<SeasonPrediction> {
        self.seeds.get(&(user_id, season_id)).map(|p| p.clone())
    }
}
