use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BusinessRuleViolation, DomainError};
use crate::ids::{LEAGUE_SIZE, Position, TeamId};

/// A team placed at a position within a ranking list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TeamRanking {
    pub team_id: TeamId,
    pub position: Position,
}

impl TeamRanking {
    pub fn new(team_id: TeamId, position: Position) -> Self {
        Self { team_id, position }
    }

    pub fn with_position(self, position: Position) -> Self {
        Self { position, ..self }
    }
}

/// Which tier of the fallback hierarchy produced a ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RankingSource {
    UserPrediction,
    RoundStandings,
    SeasonBaseline,
}

impl RankingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserPrediction => "USER_PREDICTION",
            Self::RoundStandings => "ROUND_STANDINGS",
            Self::SeasonBaseline => "SEASON_BASELINE",
        }
    }
}

impl fmt::Display for RankingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete league ranking: every position 1..=20 exactly once, every team once.
///
/// Entries are kept sorted by position. All "modifications" return a new value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ranking(Vec<TeamRanking>);

impl Ranking {
    pub fn try_new(mut entries: Vec<TeamRanking>) -> Result<Self, DomainError> {
        if entries.len() != LEAGUE_SIZE as usize {
            return Err(DomainError::Validation(format!(
                "A ranking must contain exactly {LEAGUE_SIZE} teams, got {}",
                entries.len()
            )));
        }

        let mut teams = HashSet::with_capacity(entries.len());
        let mut positions = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !teams.insert(entry.team_id) {
                return Err(DomainError::Validation(format!(
                    "Duplicate team {} in ranking",
                    entry.team_id
                )));
            }
            if !positions.insert(entry.position) {
                return Err(DomainError::Validation(format!(
                    "Duplicate position {} in ranking",
                    entry.position
                )));
            }
        }

        entries.sort_by_key(|e| e.position);
        Ok(Self(entries))
    }

    /// Build a ranking from teams listed top to bottom.
    pub fn from_order(order: &[TeamId]) -> Result<Self, DomainError> {
        if order.len() != LEAGUE_SIZE as usize {
            return Err(DomainError::Validation(format!(
                "A ranking must contain exactly {LEAGUE_SIZE} teams, got {}",
                order.len()
            )));
        }
        let entries = order
            .iter()
            .zip(Position::all())
            .map(|(&team_id, position)| TeamRanking::new(team_id, position))
            .collect();
        Self::try_new(entries)
    }

    pub fn entries(&self) -> &[TeamRanking] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamRanking> {
        self.0.iter()
    }

    /// Teams listed top to bottom.
    pub fn order(&self) -> Vec<TeamId> {
        self.0.iter().map(|e| e.team_id).collect()
    }

    pub fn position_of(&self, team_id: TeamId) -> Option<Position> {
        self.0
            .iter()
            .find(|e| e.team_id == team_id)
            .map(|e| e.position)
    }

    pub fn team_at(&self, position: Position) -> TeamId {
        // Sorted and complete, so position n lives at index n - 1.
        self.0[position.get() as usize - 1].team_id
    }

    pub fn contains(&self, team_id: TeamId) -> bool {
        self.position_of(team_id).is_some()
    }

    /// Exchange the positions of two teams, leaving every other entry untouched.
    pub fn swap(&self, a: TeamId, b: TeamId) -> Result<Self, DomainError> {
        let pos_a = self
            .position_of(a)
            .ok_or(BusinessRuleViolation::TeamNotFound(a))?;
        let pos_b = self
            .position_of(b)
            .ok_or(BusinessRuleViolation::TeamNotFound(b))?;

        let entries = self
            .0
            .iter()
            .map(|entry| match entry.team_id {
                t if t == a => entry.with_position(pos_b),
                t if t == b => entry.with_position(pos_a),
                _ => *entry,
            })
            .collect();
        Self::try_new(entries)
    }

    /// Teams whose position differs between `self` and `other`.
    ///
    /// Both rankings must cover the same teams; a team missing from `other`
    /// counts as changed.
    pub fn changed_teams(&self, other: &Ranking) -> Vec<TeamId> {
        self.0
            .iter()
            .filter(|e| other.position_of(e.team_id) != Some(e.position))
            .map(|e| e.team_id)
            .collect()
    }

    pub fn same_teams_as(&self, other: &Ranking) -> bool {
        self.0.iter().all(|e| other.contains(e.team_id))
    }
}

impl<'a> IntoIterator for &'a Ranking {
    type Item = &'a TeamRanking;
    type IntoIter = std::slice::Iter<'a, TeamRanking>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for Ranking {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<TeamRanking>::deserialize(deserializer)?;
        Ranking::try_new(entries).map_err(serde::de::Error::custom)
    }
}
