use common::league::table_to_ranking;
use common::{
    BusinessRuleViolation, DomainResult, Ranking, RankingSource, RoundNumber, SeasonId, UserId,
};
use tracing::{debug, error};

use crate::repository::{PredictionRepository, StandingsRepository};

/// A ranking to display, tagged with the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRanking {
    pub ranking: Ranking,
    pub source: RankingSource,
}

/// Picks the ranking to show for a user, falling back from their own
/// prediction to the latest round table and finally to the season baseline.
pub struct RankingResolver<'a> {
    predictions: &'a dyn PredictionRepository,
    standings: &'a dyn StandingsRepository,
}

impl<'a> RankingResolver<'a> {
    pub fn new(
        predictions: &'a dyn PredictionRepository,
        standings: &'a dyn StandingsRepository,
    ) -> Self {
        Self {
            predictions,
            standings,
        }
    }

    /// First tier with data wins; lower tiers are never consulted after that.
    ///
    /// An empty round table counts as absent. A missing baseline is a broken
    /// system invariant and fails with `MissingBaseline`.
    pub async fn resolve(
        &self,
        user_id: Option<UserId>,
        season_id: SeasonId,
        viewing_round: RoundNumber,
    ) -> DomainResult<ResolvedRanking> {
        if let Some(user_id) = user_id
            && let Some(prediction) = self.predictions.find(user_id, season_id).await
        {
            return Ok(ResolvedRanking {
                ranking: prediction.rankings,
                source: RankingSource::UserPrediction,
            });
        }

        if let Some(round) = self.standings.latest_round(season_id, viewing_round).await {
            match self.standings.find_round_table(season_id, round).await {
                Some(table) if !table.is_empty() => {
                    return Ok(ResolvedRanking {
                        ranking: table_to_ranking(&table)?,
                        source: RankingSource::RoundStandings,
                    });
                }
                _ => debug!(%season_id, %round, "Round table empty, falling back to baseline"),
            }
        }

        match self.standings.find_baseline(season_id).await {
            Some(ranking) => Ok(ResolvedRanking {
                ranking,
                source: RankingSource::SeasonBaseline,
            }),
            None => {
                error!(%season_id, "Season has no baseline ranking");
                Err(BusinessRuleViolation::MissingBaseline(season_id).into())
            }
        }
    }
}
