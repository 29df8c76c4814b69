use async_trait::async_trait;
use common::{Ranking, RoundNumber, SeasonId, StandingEntry};
use dashmap::DashMap;

#[async_trait]
pub trait StandingsRepository: Send + Sync {
    /// Store the table as it stood after `round`.
    async fn save_round_table(
        &self,
        season_id: SeasonId,
        round: RoundNumber,
        table: Vec<StandingEntry>,
    );

    async fn find_round_table(
        &self,
        season_id: SeasonId,
        round: RoundNumber,
    ) -> Option<Vec<StandingEntry>>;

    /// The latest round at or before `at_or_before` that has a stored table.
    async fn latest_round(
        &self,
        season_id: SeasonId,
        at_or_before: RoundNumber,
    ) -> Option<RoundNumber>;

    async fn save_baseline(&self, season_id: SeasonId, ranking: Ranking);

    /// The season's default team order.
    async fn find_baseline(&self, season_id: SeasonId) -> Option<Ranking>;
}

#[derive(Default)]
pub struct InMemoryStandingsRepository {
    tables: DashMap<(SeasonId, RoundNumber), Vec<StandingEntry>>,
    baselines: DashMap<SeasonId, Ranking>,
}

#[async_trait]
impl StandingsRepository for InMemoryStandingsRepository {
    async fn save_round_table(
        &self,
        season_id: SeasonId,
        round: RoundNumber,
        table: Vec<StandingEntry>,
    ) {
        self.tables.insert((season_id, round), table);
    }

    async fn find_round_table(
        &self,
        season_id: SeasonId,
        round: RoundNumber,
    ) -> Option<Vec<StandingEntry>> {
        self.tables.get(&(season_id, round)).map(|t| t.clone())
    }

    async fn latest_round(
        &self,
        season_id: SeasonId,
        at_or_before: RoundNumber,
    ) -> Option<RoundNumber> {
        self.tables
            .iter()
            .map(|entry| *entry.key())
            .filter(|(season, round)| *season == season_id && *round <= at_or_before)
            .map(|(_, round)| round)
            .max()
    }

    async fn save_baseline(&self, season_id: SeasonId, ranking: Ranking) {
        self.baselines.insert(season_id, ranking);
    }

    async fn find_baseline(&self, season_id: SeasonId) -> Option<Ranking> {
        self.baselines.get(&season_id).map(|r| r.clone())
    }
}
