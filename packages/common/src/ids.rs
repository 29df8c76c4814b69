use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Number of teams in the league, and therefore in every ranking.
pub const LEAGUE_SIZE: u8 = 20;

/// Number of rounds (gameweeks) in a season.
pub const MAX_ROUNDS: u8 = 38;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            utoipa::ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| DomainError::Validation(format!("Invalid {}: '{}'", $label, s)))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_id!(
    /// Identifies a registered user.
    UserId,
    "user id"
);
uuid_id!(
    /// Identifies one of the league's teams.
    TeamId,
    "team id"
);
uuid_id!(
    /// Identifies a season.
    SeasonId,
    "season id"
);
uuid_id!(ContestId, "contest id");
uuid_id!(PredictionId, "prediction id");
uuid_id!(EntryId, "contest entry id");
uuid_id!(FixtureId, "fixture id");

/// A round (gameweek) within a season, 1-based.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[serde(try_from = "u8", into = "u8")]
#[schema(value_type = u8, example = 8)]
pub struct RoundNumber(u8);

impl RoundNumber {
    pub const FIRST: RoundNumber = RoundNumber(1);
    pub const LAST: RoundNumber = RoundNumber(MAX_ROUNDS);

    pub fn new(round: u8) -> Result<Self, DomainError> {
        if (1..=MAX_ROUNDS).contains(&round) {
            Ok(Self(round))
        } else {
            Err(DomainError::Validation(format!(
                "Round must be between 1 and {MAX_ROUNDS}, got {round}"
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The round before this one, if any.
    pub fn previous(self) -> Option<Self> {
        (self.0 > 1).then(|| Self(self.0 - 1))
    }

    /// The round after this one, if the season has one.
    pub fn next(self) -> Option<Self> {
        (self.0 < MAX_ROUNDS).then(|| Self(self.0 + 1))
    }
}

impl TryFrom<u8> for RoundNumber {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoundNumber> for u8 {
    fn from(round: RoundNumber) -> Self {
        round.0
    }
}

impl fmt::Display for RoundNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A league table position, 1 through [`LEAGUE_SIZE`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[serde(try_from = "u8", into = "u8")]
#[schema(value_type = u8, example = 1)]
pub struct Position(u8);

impl Position {
    pub fn new(position: u8) -> Result<Self, DomainError> {
        if (1..=LEAGUE_SIZE).contains(&position) {
            Ok(Self(position))
        } else {
            Err(DomainError::Validation(format!(
                "Position must be between 1 and {LEAGUE_SIZE}, got {position}"
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Absolute distance between two positions.
    pub fn distance(self, other: Position) -> u8 {
        self.0.abs_diff(other.0)
    }

    /// Every valid position, top of the table first.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=LEAGUE_SIZE).map(Position)
    }
}

impl TryFrom<u8> for Position {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Position> for u8 {
    fn from(position: Position) -> Self {
        position.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
