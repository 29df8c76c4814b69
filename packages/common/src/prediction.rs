use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{PredictionId, RoundNumber, SeasonId, UserId};
use crate::ranking::Ranking;

/// A user's predicted final table for a season. One per (user, season).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonPrediction {
    pub id: PredictionId,
    pub user_id: UserId,
    pub season_id: SeasonId,
    /// Round during which the rankings were last set.
    pub at_round: RoundNumber,
    pub rankings: Ranking,
    pub created_at: DateTime<Utc>,
}

impl SeasonPrediction {
    pub fn new(
        user_id: UserId,
        season_id: SeasonId,
        at_round: RoundNumber,
        rankings: Ranking,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PredictionId::new(),
            user_id,
            season_id,
            at_round,
            rankings,
            created_at,
        }
    }

    /// Same prediction with new rankings, set during `at_round`.
    pub fn with_rankings(&self, rankings: Ranking, at_round: RoundNumber) -> Self {
        Self {
            rankings,
            at_round,
            ..self.clone()
        }
    }
}
