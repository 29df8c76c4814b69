use async_trait::async_trait;
use common::{Fixture, FixtureId, RoundNumber, SeasonId, TeamId};
use dashmap::DashMap;

#[async_trait]
pub trait FixtureRepository: Send + Sync {
    async fn save(&self, fixture: Fixture);

    /// Fixtures of one round, by kickoff.
    async fn list_by_round(&self, season_id: SeasonId, round: RoundNumber) -> Vec<Fixture>;

    /// Every fixture of the season, by round and kickoff.
    async fn list_by_season(&self, season_id: SeasonId) -> Vec<Fixture>;

    /// A team's fixtures from `from_round` on, by round, at most `limit`.
    async fn upcoming_for_team(
        &self,
        season_id: SeasonId,
        team_id: TeamId,
        from_round: RoundNumber,
        limit: usize,
    ) -> Vec<Fixture>;
}

#[derive(Default)]
pub struct InMemoryFixtureRepository {
    fixtures: DashMap<FixtureId, Fixture>,
}

impl InMemoryFixtureRepository {
    fn collect_sorted(&self, keep: impl Fn(&Fixture) -> bool) -> Vec<Fixture> {
        let mut fixtures: Vec<Fixture> = self
            .fixtures
            .iter()
            .filter(|f| keep(f.value()))
            .map(|f| f.value().clone())
            .collect();
        fixtures.sort_by_key(|f| (f.round, f.kickoff, f.id));
        fixtures
    }
}

#[async_trait]
impl FixtureRepository for InMemoryFixtureRepository {
    async fn save(&self, fixture: Fixture) {
        self.fixtures.insert(fixture.id, fixture);
    }

    async fn list_by_round(&self, season_id: SeasonId, round: RoundNumber) -> Vec<Fixture> {
        self.collect_sorted(|f| f.season_id == season_id && f.round == round)
    }

    async fn list_by_season(&self, season_id: SeasonId) -> Vec<Fixture> {
        self.collect_sorted(|f| f.season_id == season_id)
    }

    async fn upcoming_for_team(
        &self,
        season_id: SeasonId,
        team_id: TeamId,
        from_round: RoundNumber,
        limit: usize,
    ) -> Vec<Fixture> {
        let mut fixtures = self.collect_sorted(|f| {
            f.season_id == season_id && f.round >= from_round && f.involves(team_id)
        });
        fixtures.truncate(limit);
        fixtures
    }
}
