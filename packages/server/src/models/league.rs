use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::{
    ContestId, Fixture, FixtureId, MatchResult, Position, RoundNumber, Season, SeasonId,
    StandingEntry, Team, TeamId, UserId,
};
use serde::{Deserialize, Serialize};

use super::shared::Pagination;
use crate::services::league::{Leaderboard, LeaderboardRow};

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamResponse {
    pub id: TeamId,
    #[schema(example = "Northbridge Rovers")]
    pub name: String,
    #[schema(example = "NBR")]
    pub short_name: String,
}

impl From<Team> for TeamResponse {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            name: team.name,
            short_name: team.short_name,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SeasonResponse {
    pub id: SeasonId,
    #[schema(example = "2025/26")]
    pub name: String,
    pub main_contest_id: ContestId,
    pub current_round: RoundNumber,
    /// Null before the first round is complete.
    pub latest_completed_round: Option<RoundNumber>,
    #[schema(example = 38)]
    pub total_rounds: u8,
}

impl From<Season> for SeasonResponse {
    fn from(season: Season) -> Self {
        Self {
            latest_completed_round: season.latest_completed_round(),
            id: season.id,
            name: season.name,
            main_contest_id: season.main_contest_id,
            current_round: season.current_round,
            total_rounds: season.total_rounds,
        }
    }
}

/// `?round=` query parameter.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct RoundQuery {
    /// Round to show. Defaults depend on the endpoint.
    #[param(value_type = Option<u8>, example = 7)]
    pub round: Option<RoundNumber>,
}

/// `?limit=` query parameter.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct LimitQuery {
    /// Number of fixtures (1-38, default 5).
    #[param(example = 5)]
    pub limit: Option<usize>,
}

impl LimitQuery {
    pub fn resolve(&self) -> usize {
        self.limit
            .unwrap_or(5)
            .clamp(1, usize::from(common::MAX_ROUNDS))
    }
}

/// A team as it appears inside another resource.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamRef {
    pub id: TeamId,
    #[schema(example = "Northbridge Rovers")]
    pub name: String,
    #[schema(example = "NBR")]
    pub short_name: String,
}

impl TeamRef {
    pub fn lookup(team_id: TeamId, teams: &HashMap<TeamId, Team>) -> Self {
        match teams.get(&team_id) {
            Some(team) => Self {
                id: team_id,
                name: team.name.clone(),
                short_name: team.short_name.clone(),
            },
            None => Self {
                id: team_id,
                name: String::new(),
                short_name: String::new(),
            },
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FixtureResponse {
    pub id: FixtureId,
    pub round: RoundNumber,
    #[schema(example = "2025-10-04T14:00:00Z")]
    pub kickoff: DateTime<Utc>,
    pub home: TeamRef,
    pub away: TeamRef,
    /// Null until the match is played.
    pub result: Option<MatchResult>,
}

impl FixtureResponse {
    pub fn new(fixture: Fixture, teams: &HashMap<TeamId, Team>) -> Self {
        Self {
            id: fixture.id,
            round: fixture.round,
            kickoff: fixture.kickoff,
            home: TeamRef::lookup(fixture.home, teams),
            away: TeamRef::lookup(fixture.away, teams),
            result: fixture.result,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FixturesResponse {
    pub season_id: SeasonId,
    pub round: RoundNumber,
    pub fixtures: Vec<FixtureResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamFixturesResponse {
    pub season_id: SeasonId,
    pub team: TeamRef,
    pub fixtures: Vec<FixtureResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StandingRow {
    pub position: Position,
    pub team: TeamRef,
    #[schema(example = 7)]
    pub played: u8,
    pub won: u8,
    pub drawn: u8,
    pub lost: u8,
    pub goals_for: u16,
    pub goals_against: u16,
    #[schema(example = 5)]
    pub goal_difference: i32,
    #[schema(example = 15)]
    pub points: u16,
}

impl StandingRow {
    pub fn new(entry: StandingEntry, teams: &HashMap<TeamId, Team>) -> Self {
        Self {
            position: entry.position,
            team: TeamRef::lookup(entry.team_id, teams),
            played: entry.played,
            won: entry.won,
            drawn: entry.drawn,
            lost: entry.lost,
            goals_for: entry.goals_for,
            goals_against: entry.goals_against,
            goal_difference: entry.goal_difference(),
            points: entry.points,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StandingsResponse {
    pub season_id: SeasonId,
    /// Round the table was taken after; null before any round is complete.
    pub round: Option<RoundNumber>,
    pub rows: Vec<StandingRow>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardEntry {
    #[schema(example = 1)]
    pub rank: u32,
    pub user_id: UserId,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "Alice")]
    pub display_name: String,
    #[schema(example = 31)]
    pub points: u32,
    /// Teams predicted in exactly the right place.
    #[schema(example = 6)]
    pub exact_hits: u32,
}

impl From<LeaderboardRow> for LeaderboardEntry {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            rank: row.rank,
            user_id: row.user_id,
            username: row.username,
            display_name: row.display_name,
            points: row.score.points,
            exact_hits: row.score.exact_hits,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardResponse {
    pub season_id: SeasonId,
    /// Round whose table the scores are computed against.
    pub scored_round: Option<RoundNumber>,
    pub data: Vec<LeaderboardEntry>,
    pub pagination: Pagination,
}

impl LeaderboardResponse {
    pub fn new(season_id: SeasonId, board: Leaderboard, page: u64, per_page: u64) -> Self {
        Self {
            season_id,
            scored_round: board.scored_round,
            pagination: Pagination::new(page, per_page, board.total),
            data: board.rows.into_iter().map(Into::into).collect(),
        }
    }
}
