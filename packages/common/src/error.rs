use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::ids::{Position, SeasonId, TeamId};

/// Failure returned by every domain operation and use case.
///
/// The four variants form the taxonomy the HTTP layer maps onto status codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Malformed input: wrong ranking size, duplicate team, out-of-range round.
    #[error("{0}")]
    Validation(String),

    /// Well-formed input that a business rule rejects.
    #[error(transparent)]
    BusinessRule(#[from] BusinessRuleViolation),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate creation attempt.
    #[error("{0}")]
    Conflict(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusinessRuleViolation {
    #[error("Swap cooldown active: next swap available in {}", describe_wait(.retry_after_secs))]
    CooldownActive {
        next_eligible_at: DateTime<Utc>,
        retry_after_secs: u64,
    },

    #[error("Only one pair of teams may change places per update, but {moved} teams moved")]
    TooManyChanges { moved: usize },

    #[error("Team {team_id} is at position {actual}, not {claimed}")]
    PositionMismatch {
        team_id: TeamId,
        claimed: Position,
        actual: Position,
    },

    #[error("Team {0} is not part of this prediction")]
    TeamNotFound(TeamId),

    /// The season has no baseline ranking. This is a broken system invariant,
    /// not a user error.
    #[error("No baseline ranking exists for season {0}")]
    MissingBaseline(SeasonId),
}

fn describe_wait(secs: &u64) -> String {
    crate::cooldown::format_remaining(*secs)
}

pub type DomainResult<T> = Result<T, DomainError>;
