//! Use cases. Each service borrows the repositories for the length of one
//! request and returns `DomainResult`.

pub mod league;
pub mod prediction;
pub mod ranking;

pub use league::LeagueService;
pub use prediction::PredictionService;
pub use ranking::RankingResolver;
