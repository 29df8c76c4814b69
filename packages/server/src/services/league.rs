use std::collections::HashMap;

use common::contest::{competition_ranks, score};
use common::league::table_to_ranking;
use common::{
    DomainError, DomainResult, Fixture, RoundNumber, Score, Season, SeasonId, StandingEntry, Team,
    TeamId, UserId,
};
use tracing::debug;

use crate::repository::Repositories;

/// A stored league table, or an empty one before any round is complete.
#[derive(Debug, Clone)]
pub struct RoundTable {
    pub round: Option<RoundNumber>,
    pub entries: Vec<StandingEntry>,
}

#[derive(Debug, Clone)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub user_id: UserId,
    pub username: String,
    pub display_name: String,
    pub score: Score,
}

#[derive(Debug, Clone)]
pub struct Leaderboard {
    /// Round whose table the scores are computed against.
    pub scored_round: Option<RoundNumber>,
    pub rows: Vec<LeaderboardRow>,
    pub total: u64,
}

/// Lookups used to decorate ranking rows with names, the real table and the
/// next match.
#[derive(Debug, Default)]
pub struct RowContext {
    pub teams: HashMap<TeamId, Team>,
    pub actual: HashMap<TeamId, StandingEntry>,
    pub next_fixture: HashMap<TeamId, Fixture>,
}

/// Read-only queries over teams, fixtures, tables and the contest.
pub struct LeagueService<'a> {
    repos: &'a Repositories,
}

impl<'a> LeagueService<'a> {
    pub fn new(repos: &'a Repositories) -> Self {
        Self { repos }
    }

    pub async fn teams(&self) -> Vec<Team> {
        self.repos.teams.list().await
    }

    pub async fn current_season(&self) -> DomainResult<Season> {
        self.repos
            .seasons
            .current()
            .await
            .ok_or_else(|| DomainError::NotFound("No season is running".into()))
    }

    pub async fn season(&self, season_id: SeasonId) -> DomainResult<Season> {
        self.repos
            .seasons
            .find(season_id)
            .await
            .ok_or_else(|| DomainError::NotFound("Season not found".into()))
    }

    /// Table after `round`, defaulting to the latest completed round.
    pub async fn standings(
        &self,
        season_id: SeasonId,
        round: Option<RoundNumber>,
    ) -> DomainResult<RoundTable> {
        let season = self.season(season_id).await?;
        let Some(round) = round.or(season.latest_completed_round()) else {
            return Ok(RoundTable {
                round: None,
                entries: Vec::new(),
            });
        };
        if round >= season.current_round {
            return Err(DomainError::Validation(format!(
                "Round {round} has not been completed yet"
            )));
        }
        let entries = self
            .repos
            .standings
            .find_round_table(season_id, round)
            .await
            .unwrap_or_default();
        Ok(RoundTable {
            round: Some(round),
            entries,
        })
    }

    /// Fixtures of a round, defaulting to the current round.
    pub async fn fixtures(
        &self,
        season_id: SeasonId,
        round: Option<RoundNumber>,
    ) -> DomainResult<(RoundNumber, Vec<Fixture>)> {
        let season = self.season(season_id).await?;
        let round = round.unwrap_or(season.current_round);
        if round.get() > season.total_rounds {
            return Err(DomainError::Validation(format!(
                "Season has only {} rounds",
                season.total_rounds
            )));
        }
        let fixtures = self.repos.fixtures.list_by_round(season_id, round).await;
        Ok((round, fixtures))
    }

    /// A team's next `limit` fixtures from the current round on.
    pub async fn team_fixtures(
        &self,
        season_id: SeasonId,
        team_id: TeamId,
        limit: usize,
    ) -> DomainResult<Vec<Fixture>> {
        let season = self.season(season_id).await?;
        if self.repos.teams.find(team_id).await.is_none() {
            return Err(DomainError::NotFound("Team not found".into()));
        }
        Ok(self
            .repos
            .fixtures
            .upcoming_for_team(season_id, team_id, season.current_round, limit)
            .await)
    }

    /// Main contest entries scored against the latest completed table.
    ///
    /// `page` is 1-based.
    pub async fn leaderboard(
        &self,
        season_id: SeasonId,
        page: u64,
        per_page: u64,
    ) -> DomainResult<Leaderboard> {
        let season = self.season(season_id).await?;
        let table = self.standings(season_id, None).await?;
        let actual = if table.entries.is_empty() {
            None
        } else {
            Some(table_to_ranking(&table.entries)?)
        };

        let entries = self
            .repos
            .entries
            .list_by_contest(season.main_contest_id)
            .await;

        let mut scored = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(user) = self.repos.users.find(entry.user_id).await else {
                debug!(user_id = %entry.user_id, "Skipping contest entry of unknown user");
                continue;
            };
            let score = match (
                &actual,
                self.repos.predictions.find(entry.user_id, season_id).await,
            ) {
                (Some(actual), Some(prediction)) => score(&prediction.rankings, actual),
                _ => Score::default(),
            };
            scored.push((score, entry.joined_at, user));
        }
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let scores: Vec<Score> = scored.iter().map(|(s, _, _)| *s).collect();
        let ranks = competition_ranks(&scores);
        let total = scored.len() as u64;

        let offset = usize::try_from(page.saturating_sub(1).saturating_mul(per_page))
            .unwrap_or(usize::MAX);
        let rows = scored
            .into_iter()
            .zip(ranks)
            .skip(offset)
            .take(usize::try_from(per_page).unwrap_or(usize::MAX))
            .map(|((score, _, user), rank)| LeaderboardRow {
                rank,
                user_id: user.id,
                username: user.username,
                display_name: user.display_name,
                score,
            })
            .collect();

        Ok(Leaderboard {
            scored_round: table.round,
            rows,
            total,
        })
    }

    /// Team names, the latest table at or before `round`, and each team's next
    /// fixture from `round` on.
    pub async fn row_context(&self, season_id: SeasonId, round: RoundNumber) -> RowContext {
        let teams = self
            .teams()
            .await
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        let mut actual = HashMap::new();
        if let Some(latest) = self.repos.standings.latest_round(season_id, round).await
            && let Some(table) = self.repos.standings.find_round_table(season_id, latest).await
        {
            actual = table.into_iter().map(|e| (e.team_id, e)).collect();
        }

        let mut next_fixture: HashMap<TeamId, Fixture> = HashMap::new();
        for fixture in self.repos.fixtures.list_by_season(season_id).await {
            if fixture.round < round {
                continue;
            }
            for team in [fixture.home, fixture.away] {
                next_fixture.entry(team).or_insert_with(|| fixture.clone());
            }
        }

        RowContext {
            teams,
            actual,
            next_fixture,
        }
    }
}
