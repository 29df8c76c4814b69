use std::sync::Arc;

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::repository::Repositories;
use crate::services::{LeagueService, PredictionService};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub repos: Repositories,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn predictions(&self) -> PredictionService<'_> {
        PredictionService::new(
            &self.repos,
            self.clock.as_ref(),
            self.config.prediction.swap_cooldown(),
        )
    }

    pub fn league(&self) -> LeagueService<'_> {
        LeagueService::new(&self.repos)
    }
}
