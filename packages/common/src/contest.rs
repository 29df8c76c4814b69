use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ContestId, EntryId, PredictionId, UserId};
use crate::ranking::Ranking;

/// Points for a team predicted in exactly the right place.
pub const EXACT_POINTS: u32 = 3;
/// Points for a team predicted one place away.
pub const NEAR_POINTS: u32 = 1;

/// Membership of a user in a season's main contest.
///
/// Created once, the first time the user submits a prediction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainContestEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub contest_id: ContestId,
    pub season_prediction_id: PredictionId,
    pub joined_at: DateTime<Utc>,
}

impl MainContestEntry {
    pub fn new(
        user_id: UserId,
        contest_id: ContestId,
        season_prediction_id: PredictionId,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            user_id,
            contest_id,
            season_prediction_id,
            joined_at,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Score {
    pub points: u32,
    pub exact_hits: u32,
}

/// Score a predicted ranking against an actual table.
pub fn score(prediction: &Ranking, actual: &Ranking) -> Score {
    prediction
        .iter()
        .filter_map(|entry| {
            actual
                .position_of(entry.team_id)
                .map(|p| p.distance(entry.position))
        })
        .fold(Score::default(), |acc, distance| match distance {
            0 => Score {
                points: acc.points + EXACT_POINTS,
                exact_hits: acc.exact_hits + 1,
            },
            1 => Score {
                points: acc.points + NEAR_POINTS,
                ..acc
            },
            _ => acc,
        })
}

/// Assign standard competition ranks ("1224") to entries already sorted best
/// first. Entries with equal scores share a rank.
pub fn competition_ranks(sorted_scores: &[Score]) -> Vec<u32> {
    let mut ranks = Vec::with_capacity(sorted_scores.len());
    for (i, score) in sorted_scores.iter().enumerate() {
        let rank = match i {
            0 => 1,
            _ if sorted_scores[i - 1] == *score => ranks[i - 1],
            _ => i as u32 + 1,
        };
        ranks.push(rank);
    }
    ranks
}
