use anyhow::{Context, ensure};
use chrono::{DateTime, TimeDelta, Utc};
use common::league::{build_table, round_robin};
use common::{
    ContestId, MAX_ROUNDS, MainContestEntry, MatchResult, Ranking, RoundNumber, Season, SeasonId,
    SeasonPrediction, SwapCooldown, Team, TeamId, UserId,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::{AuthConfig, DemoConfig};
use crate::repository::{Repositories, User};
use crate::utils::hash;

/// Clubs in the order they finished last season. That order is the new
/// season's baseline ranking.
const TEAMS: &[(&str, &str)] = &[
    ("Northbridge Rovers", "NBR"),
    ("Kingsport City", "KSC"),
    ("Ashdown Athletic", "ASH"),
    ("Harrowgate United", "HGU"),
    ("Westmere Wanderers", "WMW"),
    ("Castlebury Town", "CBT"),
    ("Redcliffe Albion", "RCA"),
    ("Elmstead Forest", "ELF"),
    ("Port Avalon", "PAV"),
    ("Brackenfield", "BRF"),
    ("Oakhurst Villa", "OKV"),
    ("Stonehaven Borough", "STB"),
    ("Millbrook Rangers", "MBR"),
    ("Greywater FC", "GWF"),
    ("Fenwick Park", "FWP"),
    ("Lowther Heath", "LWH"),
    ("Marlow Vale", "MLV"),
    ("Thornbury Wednesday", "TBW"),
    ("Sedgefield Orient", "SDO"),
    ("Calder Bay", "CDB"),
];

/// Seeded accounts and how long ago they last swapped. `None` leaves the
/// free first swap unused.
const DEMO_USERS: &[(&str, &str, Option<i64>)] = &[
    ("demo", "Demo Player", None),
    ("alice", "Alice", Some(30)),
    ("bob", "Bob", Some(2)),
    ("carol", "Carol", Some(20)),
];

const SEASON_NAME: &str = "2025/26";

/// Swaps applied to the baseline to give each seeded user their own order.
const SEED_SHUFFLES: usize = 6;

#[derive(Debug)]
pub struct SeedSummary {
    pub season_id: SeasonId,
    pub teams: usize,
    pub fixtures: usize,
    pub users: usize,
}

/// Populate empty repositories with one running season and a few players.
pub async fn seed_demo(
    repos: &Repositories,
    demo: &DemoConfig,
    auth: &AuthConfig,
    now: DateTime<Utc>,
) -> anyhow::Result<SeedSummary> {
    let current_round =
        RoundNumber::new(demo.current_round).context("demo.current_round is out of range")?;
    let mut rng = StdRng::seed_from_u64(demo.rng_seed);

    let mut team_ids = Vec::with_capacity(TEAMS.len());
    for &(name, short_name) in TEAMS {
        let team = Team {
            id: TeamId::new(),
            name: name.to_string(),
            short_name: short_name.to_string(),
        };
        team_ids.push(team.id);
        repos.teams.save(team).await;
    }

    let season = Season {
        id: SeasonId::new(),
        name: SEASON_NAME.to_string(),
        main_contest_id: ContestId::new(),
        current_round,
        total_rounds: MAX_ROUNDS,
    };
    repos.seasons.save(season.clone()).await;
    repos.seasons.set_current(season.id).await;

    let baseline = Ranking::from_order(&team_ids)?;
    repos.standings.save_baseline(season.id, baseline.clone()).await;

    // The current round kicks off in two days.
    let weeks_played = i64::from(current_round.get()) - 1;
    let first_kickoff = now + TimeDelta::days(2) - TimeDelta::weeks(weeks_played);
    let fixtures: Vec<_> = round_robin(&team_ids, season.id, first_kickoff)?
        .into_iter()
        .map(|fixture| {
            if fixture.round < current_round {
                let result = play(&mut rng, &team_ids, fixture.home, fixture.away);
                fixture.with_result(result)
            } else {
                fixture
            }
        })
        .collect();
    for fixture in &fixtures {
        repos.fixtures.save(fixture.clone()).await;
    }

    let mut round = RoundNumber::FIRST;
    while round < current_round {
        let table = build_table(&team_ids, &fixtures, round)?;
        repos.standings.save_round_table(season.id, round, table).await;
        debug!(%round, "Stored round table");
        match round.next() {
            Some(next) => round = next,
            None => break,
        }
    }

    ensure!(
        repos.standings.find_baseline(season.id).await.is_some(),
        "season {} has no baseline ranking",
        season.id
    );

    let password_hash = hash::hash_password(&demo.password, auth)?;
    let mut users = 0;
    for &(username, display_name, last_swap_hours_ago) in DEMO_USERS {
        let joined_at = now - TimeDelta::days(7 * weeks_played + 3);
        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            password_hash: password_hash.clone(),
            created_at: joined_at,
        };
        let user_id = user.id;
        if !repos.users.insert(user).await {
            debug!(username, "Demo user already exists");
            continue;
        }

        let order = shuffled(&mut rng, &baseline.order());
        let prediction = SeasonPrediction::new(
            user_id,
            season.id,
            RoundNumber::FIRST,
            Ranking::from_order(&order)?,
            joined_at,
        );
        repos.predictions.remember_seed(prediction.clone()).await;
        repos.predictions.insert(prediction.clone()).await;
        repos
            .entries
            .insert(MainContestEntry::new(
                user_id,
                season.main_contest_id,
                prediction.id,
                joined_at,
            ))
            .await;

        let mut cooldown = SwapCooldown::initial().with_initial_submission(joined_at);
        if let Some(hours) = last_swap_hours_ago {
            cooldown = cooldown.with_swap(now - TimeDelta::hours(hours));
        }
        repos.cooldowns.save(user_id, season.id, cooldown).await;
        users += 1;
    }

    info!(
        season = SEASON_NAME,
        %current_round,
        completed_rounds = weeks_played,
        "Demo season ready"
    );

    Ok(SeedSummary {
        season_id: season.id,
        teams: team_ids.len(),
        fixtures: fixtures.len(),
        users,
    })
}

/// Random result; the side that finished higher last season gets a small edge.
fn play(rng: &mut StdRng, baseline: &[TeamId], home: TeamId, away: TeamId) -> MatchResult {
    let rank = |team: TeamId| baseline.iter().position(|t| *t == team).unwrap_or(baseline.len());
    let home_stronger = rank(home) < rank(away);
    let mut home_goals = rng.random_range(0..=2u8);
    let mut away_goals = rng.random_range(0..=2u8);
    if rng.random_bool(0.35) {
        if home_stronger {
            home_goals += 1;
        } else {
            away_goals += 1;
        }
    }
    MatchResult {
        home_goals,
        away_goals,
    }
}

fn shuffled(rng: &mut StdRng, order: &[TeamId]) -> Vec<TeamId> {
    let mut order = order.to_vec();
    for _ in 0..SEED_SHUFFLES {
        let a = rng.random_range(0..order.len());
        let b = rng.random_range(0..order.len());
        order.swap(a, b);
    }
    order
}
