use chrono::{DateTime, Utc};
use common::{
    FixtureId, Position, PredictionAccessMode, PredictionId, Ranking, RankingSource, RoundNumber,
    SeasonId, TeamId,
};
use serde::{Deserialize, Serialize};

use super::auth::UserResponse;
use super::league::TeamRef;
use crate::services::league::RowContext;
use crate::services::prediction::{
    PredictionUpdate, PredictionView, ResetOutcome, SwapStatus, SwapTeams,
};

/// Full ranking, top to bottom. Used to create or reorder a prediction.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct TeamOrderRequest {
    /// All 20 team ids, first place first.
    pub teams: Vec<TeamId>,
}

/// Exchange the places of two teams.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SwapRequest {
    pub team_a: TeamId,
    pub team_b: TeamId,
    /// Where the client believes `team_a` currently is. Rejected with
    /// `POSITION_MISMATCH` if stale.
    #[schema(value_type = Option<u8>, example = 5)]
    pub position_a: Option<Position>,
    #[schema(value_type = Option<u8>, example = 9)]
    pub position_b: Option<Position>,
}

impl From<SwapRequest> for SwapTeams {
    fn from(req: SwapRequest) -> Self {
        Self {
            team_a: req.team_a,
            team_b: req.team_b,
            position_a: req.position_a,
            position_b: req.position_b,
        }
    }
}

/// A team's next match as seen from that team.
#[derive(Serialize, utoipa::ToSchema)]
pub struct NextFixture {
    pub fixture_id: FixtureId,
    pub round: RoundNumber,
    #[schema(example = "2025-10-04T14:00:00Z")]
    pub kickoff: DateTime<Utc>,
    pub opponent: TeamRef,
    pub is_home: bool,
}

/// One line of a displayed ranking.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PredictionRow {
    pub position: Position,
    pub team_id: TeamId,
    #[schema(example = "Northbridge Rovers")]
    pub team_name: String,
    #[schema(example = "NBR")]
    pub short_name: String,
    /// Place in the latest completed table, if any round is complete.
    pub actual_position: Option<Position>,
    /// League points in the latest completed table.
    pub points: Option<u16>,
    pub next_fixture: Option<NextFixture>,
}

/// Decorate every ranking row with names, the real table and the next match.
pub fn prediction_rows(ranking: &Ranking, ctx: &RowContext) -> Vec<PredictionRow> {
    ranking
        .iter()
        .map(|entry| {
            let team = TeamRef::lookup(entry.team_id, &ctx.teams);
            let actual = ctx.actual.get(&entry.team_id);
            let next_fixture = ctx.next_fixture.get(&entry.team_id).and_then(|f| {
                f.opponent_of(entry.team_id).map(|opponent| NextFixture {
                    fixture_id: f.id,
                    round: f.round,
                    kickoff: f.kickoff,
                    opponent: TeamRef::lookup(opponent, &ctx.teams),
                    is_home: f.home == entry.team_id,
                })
            });
            PredictionRow {
                position: entry.position,
                team_id: entry.team_id,
                team_name: team.name,
                short_name: team.short_name,
                actual_position: actual.map(|a| a.position),
                points: actual.map(|a| a.points),
                next_fixture,
            }
        })
        .collect()
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PredictionResponse {
    pub season_id: SeasonId,
    pub round: RoundNumber,
    pub is_current_round: bool,
    /// Which tier produced the ranking.
    pub source: RankingSource,
    pub access_mode: PredictionAccessMode,
    /// Whether the UI should offer drag-and-drop.
    pub is_readonly: bool,
    #[schema(example = "Your first swap is free: exchange any two teams now.")]
    pub message: String,
    /// Whose prediction this is; null for guests and unknown users.
    pub owner: Option<UserResponse>,
    pub rows: Vec<PredictionRow>,
}

impl PredictionResponse {
    pub fn new(season_id: SeasonId, view: PredictionView, ctx: &RowContext) -> Self {
        Self {
            season_id,
            round: view.round,
            is_current_round: view.is_current_round,
            source: view.source,
            is_readonly: view.access_mode.is_readonly(),
            access_mode: view.access_mode,
            message: view.message,
            owner: view.owner.map(Into::into),
            rows: prediction_rows(&view.ranking, ctx),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SwapStatusResponse {
    pub can_swap: bool,
    pub last_swap_at: Option<DateTime<Utc>>,
    /// Null when a swap is allowed regardless of the clock.
    pub next_eligible_at: Option<DateTime<Utc>>,
    #[schema(example = 1)]
    pub swap_count: u32,
    pub first_swap_bonus_available: bool,
    #[schema(example = "Next swap available in 23h 59m.")]
    pub message: String,
}

impl From<SwapStatus> for SwapStatusResponse {
    fn from(s: SwapStatus) -> Self {
        Self {
            can_swap: s.can_swap,
            last_swap_at: s.last_swap_at,
            next_eligible_at: s.next_eligible_at,
            swap_count: s.swap_count,
            first_swap_bonus_available: s.first_swap_bonus_available,
            message: s.message,
        }
    }
}

/// Result of a create, swap or reorder.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PredictionUpdateResponse {
    pub prediction_id: PredictionId,
    pub season_id: SeasonId,
    pub round: RoundNumber,
    /// Teams whose position changed.
    pub moved: Vec<TeamId>,
    pub rows: Vec<PredictionRow>,
    pub swap_status: SwapStatusResponse,
}

impl PredictionUpdateResponse {
    pub fn new(update: PredictionUpdate, status: SwapStatus, ctx: &RowContext) -> Self {
        Self {
            prediction_id: update.prediction.id,
            season_id: update.prediction.season_id,
            round: update.prediction.at_round,
            rows: prediction_rows(&update.prediction.rankings, ctx),
            moved: update.moved,
            swap_status: status.into(),
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct DemoResetRequest {
    /// Season to reset; defaults to the current one.
    pub season_id: Option<SeasonId>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DemoResetResponse {
    /// `RESTORED` when the seeded prediction came back, `CLEARED` when the
    /// user's prediction was removed.
    #[schema(example = "RESTORED")]
    pub outcome: &'static str,
    pub swap_status: SwapStatusResponse,
}

impl DemoResetResponse {
    pub fn new(outcome: ResetOutcome, status: SwapStatus) -> Self {
        Self {
            outcome: match outcome {
                ResetOutcome::Restored => "RESTORED",
                ResetOutcome::Cleared => "CLEARED",
            },
            swap_status: status.into(),
        }
    }
}
