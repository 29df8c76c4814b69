pub mod access;
pub mod contest;
pub mod cooldown;
pub mod error;
pub mod ids;
pub mod league;
pub mod prediction;
pub mod ranking;

pub use access::{PredictionAccessMode, Viewer};
pub use contest::{MainContestEntry, Score};
pub use cooldown::{DEFAULT_SWAP_COOLDOWN, SwapCooldown};
pub use error::{BusinessRuleViolation, DomainError, DomainResult};
pub use ids::{
    ContestId, EntryId, FixtureId, LEAGUE_SIZE, MAX_ROUNDS, Position, PredictionId, RoundNumber,
    SeasonId, TeamId, UserId,
};
pub use league::{Fixture, MatchResult, Season, StandingEntry, Team};
pub use prediction::SeasonPrediction;
pub use ranking::{Ranking, RankingSource, TeamRanking};
