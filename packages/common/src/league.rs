//! Teams, seasons, fixtures and league tables.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ContestId, FixtureId, MAX_ROUNDS, Position, RoundNumber, SeasonId, TeamId};
use crate::ranking::{Ranking, TeamRanking};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub short_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub name: String,
    /// The season-long contest every prediction is entered into.
    pub main_contest_id: ContestId,
    /// The round currently being played.
    pub current_round: RoundNumber,
    pub total_rounds: u8,
}

impl Season {
    pub fn is_current_round(&self, round: RoundNumber) -> bool {
        round == self.current_round
    }

    /// The last round whose matches are all played.
    pub fn latest_completed_round(&self) -> Option<RoundNumber> {
        self.current_round.previous()
    }

    /// Reject rounds that have not started yet.
    pub fn ensure_viewable(&self, round: RoundNumber) -> Result<(), DomainError> {
        if round > self.current_round {
            return Err(DomainError::Validation(format!(
                "Round {round} has not started yet (current round is {})",
                self.current_round
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MatchResult {
    pub home_goals: u8,
    pub away_goals: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub season_id: SeasonId,
    pub round: RoundNumber,
    pub home: TeamId,
    pub away: TeamId,
    pub kickoff: DateTime<Utc>,
    pub result: Option<MatchResult>,
}

impl Fixture {
    pub fn with_result(&self, result: MatchResult) -> Self {
        Self {
            result: Some(result),
            ..self.clone()
        }
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home == team_id || self.away == team_id
    }

    /// The other side of the fixture from `team_id`'s point of view.
    pub fn opponent_of(&self, team_id: TeamId) -> Option<TeamId> {
        if self.home == team_id {
            Some(self.away)
        } else if self.away == team_id {
            Some(self.home)
        } else {
            None
        }
    }
}

/// One row of a league table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub team_id: TeamId,
    pub position: Position,
    pub played: u8,
    pub won: u8,
    pub drawn: u8,
    pub lost: u8,
    pub goals_for: u16,
    pub goals_against: u16,
    pub points: u16,
}

impl StandingEntry {
    fn empty(team_id: TeamId, position: Position) -> Self {
        Self {
            team_id,
            position,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            points: 0,
        }
    }

    pub fn with_position(self, position: Position) -> Self {
        Self { position, ..self }
    }

    pub fn goal_difference(&self) -> i32 {
        i32::from(self.goals_for) - i32::from(self.goals_against)
    }

    pub fn as_team_ranking(&self) -> TeamRanking {
        TeamRanking::new(self.team_id, self.position)
    }

    fn record(&mut self, scored: u8, conceded: u8) {
        self.played += 1;
        self.goals_for += u16::from(scored);
        self.goals_against += u16::from(conceded);
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.won += 1;
                self.points += 3;
            }
            std::cmp::Ordering::Equal => {
                self.drawn += 1;
                self.points += 1;
            }
            std::cmp::Ordering::Less => self.lost += 1,
        }
    }
}

/// Convert a full table into a ranking.
pub fn table_to_ranking(table: &[StandingEntry]) -> Result<Ranking, DomainError> {
    Ranking::try_new(table.iter().map(StandingEntry::as_team_ranking).collect())
}

/// Build the league table from every played fixture up to and including `up_to`.
///
/// Ordered by points, goal difference, then goals scored; remaining ties keep
/// the order of `teams`.
pub fn build_table(
    teams: &[TeamId],
    fixtures: &[Fixture],
    up_to: RoundNumber,
) -> Result<Vec<StandingEntry>, DomainError> {
    let placeholder = Position::new(1)?;
    let mut rows: HashMap<TeamId, StandingEntry> = teams
        .iter()
        .map(|&team| (team, StandingEntry::empty(team, placeholder)))
        .collect();

    for fixture in fixtures.iter().filter(|f| f.round <= up_to) {
        let Some(result) = fixture.result else {
            continue;
        };
        let (Some(_), Some(_)) = (rows.get(&fixture.home), rows.get(&fixture.away)) else {
            return Err(DomainError::Validation(format!(
                "Fixture {} references a team outside the league",
                fixture.id
            )));
        };
        if let Some(home) = rows.get_mut(&fixture.home) {
            home.record(result.home_goals, result.away_goals);
        }
        if let Some(away) = rows.get_mut(&fixture.away) {
            away.record(result.away_goals, result.home_goals);
        }
    }

    let mut table: Vec<StandingEntry> = teams.iter().filter_map(|t| rows.remove(t)).collect();
    table.sort_by_key(|e| (Reverse(e.points), Reverse(e.goal_difference()), Reverse(e.goals_for)));

    table
        .into_iter()
        .enumerate()
        .map(|(i, entry)| Position::new(i as u8 + 1).map(|p| entry.with_position(p)))
        .collect()
}

/// Double round-robin schedule using the circle method.
///
/// Every team plays once per round; the second half mirrors the first with
/// home and away swapped. Rounds kick off one week apart.
pub fn round_robin(
    teams: &[TeamId],
    season_id: SeasonId,
    first_kickoff: DateTime<Utc>,
) -> Result<Vec<Fixture>, DomainError> {
    let n = teams.len();
    if n < 2 || n % 2 != 0 || 2 * (n - 1) != MAX_ROUNDS as usize {
        return Err(DomainError::Validation(format!(
            "A double round-robin over {MAX_ROUNDS} rounds needs {} teams, got {n}",
            MAX_ROUNDS / 2 + 1
        )));
    }

    let half = n - 1;
    let mut wheel: Vec<TeamId> = teams.to_vec();
    let mut fixtures = Vec::with_capacity(n * half);

    for leg_round in 0..half {
        for i in 0..n / 2 {
            let (mut home, mut away) = (wheel[i], wheel[n - 1 - i]);
            if (i == 0 && leg_round % 2 == 1) || (i > 0 && i % 2 == 1) {
                std::mem::swap(&mut home, &mut away);
            }
            for (round_index, home, away) in [(leg_round, home, away), (leg_round + half, away, home)]
            {
                let round = RoundNumber::new(round_index as u8 + 1)?;
                fixtures.push(Fixture {
                    id: FixtureId::new(),
                    season_id,
                    round,
                    home,
                    away,
                    kickoff: first_kickoff + TimeDelta::weeks(round_index as i64),
                    result: None,
                });
            }
        }
        // Keep the first team fixed and rotate the rest clockwise.
        wheel[1..].rotate_right(1);
    }

    fixtures.sort_by_key(|f| (f.round, f.kickoff));
    Ok(fixtures)
}
