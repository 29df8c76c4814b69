use std::collections::HashMap;

use axum::{Json, extract::State};
use common::{SeasonId, Team, TeamId};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::{AppPath, AppQuery};
use crate::models::league::{
    FixtureResponse, FixturesResponse, LeaderboardResponse, LimitQuery, RoundQuery,
    SeasonResponse, StandingRow, StandingsResponse, TeamFixturesResponse, TeamRef, TeamResponse,
};
use crate::models::shared::PageQuery;
use crate::state::AppState;

async fn team_map(state: &AppState) -> HashMap<TeamId, Team> {
    state
        .league()
        .teams()
        .await
        .into_iter()
        .map(|t| (t.id, t))
        .collect()
}

#[utoipa::path(
    get,
    path = "/teams",
    tag = "League",
    operation_id = "listTeams",
    summary = "List all teams",
    responses(
        (status = 200, description = "Teams sorted by name", body = Vec<TeamResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_teams(State(state): State<AppState>) -> Json<Vec<TeamResponse>> {
    let teams = state.league().teams().await;
    Json(teams.into_iter().map(Into::into).collect())
}

#[utoipa::path(
    get,
    path = "/seasons/current",
    tag = "League",
    operation_id = "getCurrentSeason",
    summary = "The season currently being played",
    responses(
        (status = 200, description = "Current season", body = SeasonResponse),
        (status = 404, description = "No season (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn current_season(
    State(state): State<AppState>,
) -> Result<Json<SeasonResponse>, AppError> {
    let season = state.league().current_season().await?;
    Ok(Json(season.into()))
}

#[utoipa::path(
    get,
    path = "/seasons/{id}/standings",
    tag = "League",
    operation_id = "getStandings",
    summary = "League table after a round",
    description = "Defaults to the latest completed round. Rounds that are not complete yet are rejected.",
    params(("id" = SeasonId, Path, description = "Season ID"), RoundQuery),
    responses(
        (status = 200, description = "League table", body = StandingsResponse),
        (status = 400, description = "Round not complete (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(season_id = %season_id))]
pub async fn get_standings(
    State(state): State<AppState>,
    AppPath(season_id): AppPath<SeasonId>,
    AppQuery(query): AppQuery<RoundQuery>,
) -> Result<Json<StandingsResponse>, AppError> {
    let table = state.league().standings(season_id, query.round).await?;
    let teams = team_map(&state).await;
    Ok(Json(StandingsResponse {
        season_id,
        round: table.round,
        rows: table
            .entries
            .into_iter()
            .map(|e| StandingRow::new(e, &teams))
            .collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/seasons/{id}/fixtures",
    tag = "League",
    operation_id = "getFixtures",
    summary = "Fixtures of a round",
    description = "Defaults to the current round.",
    params(("id" = SeasonId, Path, description = "Season ID"), RoundQuery),
    responses(
        (status = 200, description = "Fixtures by kickoff", body = FixturesResponse),
        (status = 400, description = "Invalid round (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(season_id = %season_id))]
pub async fn get_fixtures(
    State(state): State<AppState>,
    AppPath(season_id): AppPath<SeasonId>,
    AppQuery(query): AppQuery<RoundQuery>,
) -> Result<Json<FixturesResponse>, AppError> {
    let (round, fixtures) = state.league().fixtures(season_id, query.round).await?;
    let teams = team_map(&state).await;
    Ok(Json(FixturesResponse {
        season_id,
        round,
        fixtures: fixtures
            .into_iter()
            .map(|f| FixtureResponse::new(f, &teams))
            .collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/seasons/{id}/teams/{team_id}/fixtures",
    tag = "League",
    operation_id = "getTeamFixtures",
    summary = "A team's upcoming fixtures",
    params(
        ("id" = SeasonId, Path, description = "Season ID"),
        ("team_id" = TeamId, Path, description = "Team ID"),
        LimitQuery,
    ),
    responses(
        (status = 200, description = "Upcoming fixtures from the current round", body = TeamFixturesResponse),
        (status = 404, description = "Season or team not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(season_id = %season_id, team_id = %team_id))]
pub async fn get_team_fixtures(
    State(state): State<AppState>,
    AppPath((season_id, team_id)): AppPath<(SeasonId, TeamId)>,
    AppQuery(query): AppQuery<LimitQuery>,
) -> Result<Json<TeamFixturesResponse>, AppError> {
    let fixtures = state
        .league()
        .team_fixtures(season_id, team_id, query.resolve())
        .await?;
    let teams = team_map(&state).await;
    Ok(Json(TeamFixturesResponse {
        season_id,
        team: TeamRef::lookup(team_id, &teams),
        fixtures: fixtures
            .into_iter()
            .map(|f| FixtureResponse::new(f, &teams))
            .collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/seasons/{id}/leaderboard",
    tag = "League",
    operation_id = "getLeaderboard",
    summary = "Main contest leaderboard",
    description = "Every entry scored against the latest completed table: 3 points per exact position, 1 point per team one place off. Ties share a rank.",
    params(("id" = SeasonId, Path, description = "Season ID"), PageQuery),
    responses(
        (status = 200, description = "Ranked entries", body = LeaderboardResponse),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(season_id = %season_id))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    AppPath(season_id): AppPath<SeasonId>,
    AppQuery(query): AppQuery<PageQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let (page, per_page) = query.resolve();
    let board = state
        .league()
        .leaderboard(season_id, page, per_page)
        .await?;
    Ok(Json(LeaderboardResponse::new(
        season_id, board, page, per_page,
    )))
}
