//! Storage seam. Each trait has an in-memory implementation standing in for a
//! database; all of them are built once at startup and shared through
//! [`Repositories`].

mod contest;
mod cooldown;
mod fixture;
mod locks;
mod prediction;
mod season;
mod standings;
mod team;
mod user;

use std::sync::Arc;

pub use contest::{ContestEntryRepository, InMemoryContestEntryRepository};
pub use cooldown::{CooldownRepository, InMemoryCooldownRepository};
pub use fixture::{FixtureRepository, InMemoryFixtureRepository};
pub use locks::UserLocks;
pub use prediction::{InMemoryPredictionRepository, PredictionRepository};
pub use season::{InMemorySeasonRepository, SeasonRepository};
pub use standings::{InMemoryStandingsRepository, StandingsRepository};
pub use team::{InMemoryTeamRepository, TeamRepository};
pub use user::{InMemoryUserRepository, User, UserRepository};

#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub seasons: Arc<dyn SeasonRepository>,
    pub predictions: Arc<dyn PredictionRepository>,
    pub cooldowns: Arc<dyn CooldownRepository>,
    pub standings: Arc<dyn StandingsRepository>,
    pub fixtures: Arc<dyn FixtureRepository>,
    pub entries: Arc<dyn ContestEntryRepository>,
    pub locks: Arc<UserLocks>,
}

impl Repositories {
    /// Fresh, empty in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::default()),
            teams: Arc::new(InMemoryTeamRepository::default()),
            seasons: Arc::new(InMemorySeasonRepository::default()),
            predictions: Arc::new(InMemoryPredictionRepository::default()),
            cooldowns: Arc::new(InMemoryCooldownRepository::default()),
            standings: Arc::new(InMemoryStandingsRepository::default()),
            fixtures: Arc::new(InMemoryFixtureRepository::default()),
            entries: Arc::new(InMemoryContestEntryRepository::default()),
            locks: Arc::new(UserLocks::default()),
        }
    }
}
