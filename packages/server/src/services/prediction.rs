use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};
use common::cooldown::format_remaining;
use common::{
    BusinessRuleViolation, DomainError, DomainResult, MainContestEntry, Position,
    PredictionAccessMode, Ranking, RankingSource, RoundNumber, Season, SeasonId, SeasonPrediction,
    SwapCooldown, TeamId, UserId, Viewer,
};
use tracing::{debug, info, warn};

use super::ranking::RankingResolver;
use crate::clock::Clock;
use crate::repository::{Repositories, User};

/// Whose prediction is being looked at, and by whom.
#[derive(Debug, Clone)]
pub enum Subject {
    Guest,
    /// A signed-in user looking at their own prediction.
    Own(UserId),
    Other(User),
    /// A username that does not exist.
    Missing(String),
}

#[derive(Debug, Clone)]
pub struct PredictionView {
    pub ranking: Ranking,
    pub source: RankingSource,
    pub access_mode: PredictionAccessMode,
    pub message: String,
    pub round: RoundNumber,
    pub is_current_round: bool,
    /// The user whose prediction is shown, when that user exists.
    pub owner: Option<User>,
}

/// Exchange two teams; the optional positions are what the client believes
/// the current positions are.
#[derive(Debug, Clone, Copy)]
pub struct SwapTeams {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub position_a: Option<Position>,
    pub position_b: Option<Position>,
}

#[derive(Debug, Clone)]
pub struct PredictionUpdate {
    pub prediction: SeasonPrediction,
    pub cooldown: SwapCooldown,
    /// Teams whose position changed.
    pub moved: Vec<TeamId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapStatus {
    pub can_swap: bool,
    pub last_swap_at: Option<DateTime<Utc>>,
    pub next_eligible_at: Option<DateTime<Utc>>,
    pub swap_count: u32,
    pub first_swap_bonus_available: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The seeded prediction was put back.
    Restored,
    /// The user had no seeded prediction; theirs was removed.
    Cleared,
}

/// Use cases around a user's season prediction.
pub struct PredictionService<'a> {
    repos: &'a Repositories,
    clock: &'a dyn Clock,
    window: TimeDelta,
}

impl<'a> PredictionService<'a> {
    pub fn new(repos: &'a Repositories, clock: &'a dyn Clock, window: TimeDelta) -> Self {
        Self {
            repos,
            clock,
            window,
        }
    }

    fn resolver(&self) -> RankingResolver<'a> {
        RankingResolver::new(
            self.repos.predictions.as_ref(),
            self.repos.standings.as_ref(),
        )
    }

    async fn load_season(&self, season_id: SeasonId) -> DomainResult<Season> {
        self.repos
            .seasons
            .find(season_id)
            .await
            .ok_or_else(|| DomainError::NotFound("Season not found".into()))
    }

    /// Turn a username lookup into a subject from the viewer's perspective.
    pub async fn subject_for_username(&self, viewer: Option<UserId>, username: &str) -> Subject {
        match self.repos.users.find_by_username(username).await {
            None => Subject::Missing(username.to_string()),
            Some(user) if Some(user.id) == viewer => Subject::Own(user.id),
            Some(user) => Subject::Other(user),
        }
    }

    /// Rankings, source and access mode for a prediction page.
    pub async fn view(
        &self,
        subject: Subject,
        season_id: SeasonId,
        round: Option<RoundNumber>,
    ) -> DomainResult<PredictionView> {
        let season = self.load_season(season_id).await?;
        let round = round.unwrap_or(season.current_round);
        season.ensure_viewable(round)?;
        let is_current_round = season.is_current_round(round);
        let now = self.clock.now();

        let ranked_user = match &subject {
            Subject::Own(id) => Some(*id),
            Subject::Other(user) => Some(user.id),
            Subject::Guest | Subject::Missing(_) => None,
        };
        let resolved = self
            .resolver()
            .resolve(ranked_user, season_id, round)
            .await?;

        let cooldown = match &subject {
            Subject::Own(id) => self
                .repos
                .cooldowns
                .find(*id, season_id)
                .await
                .unwrap_or_default(),
            _ => SwapCooldown::initial(),
        };
        let viewer = match &subject {
            Subject::Guest => Viewer::Guest,
            Subject::Own(_) => Viewer::Authenticated {
                has_prediction: resolved.source == RankingSource::UserPrediction,
                cooldown: &cooldown,
            },
            Subject::Other(_) => Viewer::ViewingOther,
            Subject::Missing(_) => Viewer::UserNotFound,
        };
        let access_mode = PredictionAccessMode::resolve(&viewer, is_current_round, now, self.window);

        let owner = match subject {
            Subject::Own(id) => self.repos.users.find(id).await,
            Subject::Other(user) => Some(user),
            Subject::Guest | Subject::Missing(_) => None,
        };
        let message = match (&access_mode, &owner) {
            (PredictionAccessMode::ReadonlyViewingOther, Some(user)) => {
                format!("You are viewing {}'s prediction.", user.display_name)
            }
            (PredictionAccessMode::ReadonlyUserNotFound, _) => {
                "That user was not found; showing the default ranking.".to_string()
            }
            _ => self.access_message(access_mode, &cooldown, round, is_current_round, now),
        };

        Ok(PredictionView {
            ranking: resolved.ranking,
            source: resolved.source,
            access_mode,
            message,
            round,
            is_current_round,
            owner,
        })
    }

    fn access_message(
        &self,
        mode: PredictionAccessMode,
        cooldown: &SwapCooldown,
        round: RoundNumber,
        is_current_round: bool,
        now: DateTime<Utc>,
    ) -> String {
        match mode {
            PredictionAccessMode::Editable if !cooldown.initial_prediction_made => {
                "Arrange your teams freely, then submit your prediction.".to_string()
            }
            PredictionAccessMode::Editable if cooldown.is_bonus_available() => {
                "Your first swap is free: exchange any two teams now.".to_string()
            }
            PredictionAccessMode::Editable => "You can swap two teams.".to_string(),
            PredictionAccessMode::ReadonlyCooldown if !is_current_round => {
                format!("Round {round} is over; past rounds are read-only.")
            }
            PredictionAccessMode::ReadonlyCooldown => format!(
                "Next swap available in {}.",
                format_remaining(cooldown.remaining_secs(now, self.window))
            ),
            PredictionAccessMode::CanCreateEntry => {
                "Submit your prediction to enter the season contest.".to_string()
            }
            PredictionAccessMode::ReadonlyGuest => {
                "Log in to make your own prediction.".to_string()
            }
            PredictionAccessMode::ReadonlyViewingOther => {
                "You are viewing another user's prediction.".to_string()
            }
            PredictionAccessMode::ReadonlyUserNotFound => {
                "That user was not found; showing the default ranking.".to_string()
            }
        }
    }

    /// Validate a submitted top-to-bottom order against the league's teams.
    async fn ranking_from_order(&self, order: &[TeamId]) -> DomainResult<Ranking> {
        let ranking = Ranking::from_order(order)?;
        let league: HashSet<TeamId> = self
            .repos
            .teams
            .list()
            .await
            .into_iter()
            .map(|t| t.id)
            .collect();
        if let Some(unknown) = order.iter().find(|t| !league.contains(t)) {
            return Err(DomainError::Validation(format!("Unknown team {unknown}")));
        }
        Ok(ranking)
    }

    /// Submit a first prediction and join the season's main contest.
    pub async fn create(
        &self,
        user_id: UserId,
        season_id: SeasonId,
        order: &[TeamId],
    ) -> DomainResult<PredictionUpdate> {
        let season = self.load_season(season_id).await?;
        let ranking = self.ranking_from_order(order).await?;

        let _guard = self.repos.locks.acquire(user_id).await;
        let now = self.clock.now();

        let prediction =
            SeasonPrediction::new(user_id, season_id, season.current_round, ranking, now);
        if !self.repos.predictions.insert(prediction.clone()).await {
            return Err(DomainError::Conflict(
                "A prediction already exists for this season".into(),
            ));
        }

        let entry = MainContestEntry::new(user_id, season.main_contest_id, prediction.id, now);
        if !self.repos.entries.insert(entry).await {
            debug!(%user_id, "User already entered the main contest");
        }

        let cooldown = self
            .repos
            .cooldowns
            .find(user_id, season_id)
            .await
            .unwrap_or_default()
            .with_initial_submission(now);
        self.repos
            .cooldowns
            .save(user_id, season_id, cooldown.clone())
            .await;

        info!(%user_id, %season_id, prediction_id = %prediction.id, "Prediction created");
        Ok(PredictionUpdate {
            moved: prediction.rankings.order(),
            prediction,
            cooldown,
        })
    }

    /// Exchange the positions of two teams.
    pub async fn swap(
        &self,
        user_id: UserId,
        season_id: SeasonId,
        cmd: SwapTeams,
    ) -> DomainResult<PredictionUpdate> {
        if cmd.team_a == cmd.team_b {
            return Err(DomainError::Validation(
                "Cannot swap a team with itself".into(),
            ));
        }
        let season = self.load_season(season_id).await?;

        let _guard = self.repos.locks.acquire(user_id).await;
        let prediction = self.find_prediction(user_id, season_id).await?;

        for (team_id, claimed) in [(cmd.team_a, cmd.position_a), (cmd.team_b, cmd.position_b)] {
            let actual = prediction
                .rankings
                .position_of(team_id)
                .ok_or(BusinessRuleViolation::TeamNotFound(team_id))?;
            if let Some(claimed) = claimed
                && claimed != actual
            {
                debug!(%user_id, %team_id, %claimed, %actual, "Stale swap rejected");
                return Err(BusinessRuleViolation::PositionMismatch {
                    team_id,
                    claimed,
                    actual,
                }
                .into());
            }
        }

        let now = self.clock.now();
        let cooldown = self.current_cooldown(user_id, season_id, now).await?;

        let rankings = prediction.rankings.swap(cmd.team_a, cmd.team_b)?;
        self.apply(prediction, rankings, cooldown, season.current_round, now)
            .await
    }

    /// Replace the whole order. After the first submission at most one pair
    /// of teams may change places per request; the request is rejected as a
    /// whole otherwise.
    pub async fn reorder(
        &self,
        user_id: UserId,
        season_id: SeasonId,
        order: &[TeamId],
    ) -> DomainResult<PredictionUpdate> {
        let season = self.load_season(season_id).await?;
        let rankings = self.ranking_from_order(order).await?;

        let _guard = self.repos.locks.acquire(user_id).await;
        let prediction = self.find_prediction(user_id, season_id).await?;
        let stored = self
            .repos
            .cooldowns
            .find(user_id, season_id)
            .await
            .unwrap_or_default();

        let moved = prediction.rankings.changed_teams(&rankings);
        if moved.is_empty() {
            return Ok(PredictionUpdate {
                prediction,
                cooldown: stored,
                moved,
            });
        }

        let now = self.clock.now();
        if !stored.initial_prediction_made {
            let cooldown = stored.with_initial_submission(now);
            return self
                .persist(prediction.with_rankings(rankings, season.current_round), cooldown, moved)
                .await;
        }

        if moved.len() > 2 {
            warn!(%user_id, moved = moved.len(), "Reorder moved too many teams");
            return Err(BusinessRuleViolation::TooManyChanges { moved: moved.len() }.into());
        }
        let cooldown = self.current_cooldown(user_id, season_id, now).await?;
        self.apply(prediction, rankings, cooldown, season.current_round, now)
            .await
    }

    pub async fn swap_status(&self, user_id: UserId, season_id: SeasonId) -> DomainResult<SwapStatus> {
        self.load_season(season_id).await?;
        let cooldown = self
            .repos
            .cooldowns
            .find(user_id, season_id)
            .await
            .unwrap_or_default();
        let now = self.clock.now();
        let can_swap = cooldown.can_swap(now, self.window);

        let message = if !cooldown.initial_prediction_made {
            "Changes are unlimited until you submit your prediction.".to_string()
        } else if cooldown.is_bonus_available() {
            "Your first swap is free.".to_string()
        } else if can_swap {
            "You can swap two teams now.".to_string()
        } else {
            format!(
                "Next swap available in {}.",
                format_remaining(cooldown.remaining_secs(now, self.window))
            )
        };

        Ok(SwapStatus {
            can_swap,
            last_swap_at: cooldown.last_swap_at,
            next_eligible_at: cooldown.next_eligible_at(self.window),
            swap_count: cooldown.swap_count,
            first_swap_bonus_available: cooldown.is_bonus_available(),
            message,
        })
    }

    /// Put a user back to the start of the demo flow.
    pub async fn reset_demo(&self, user_id: UserId, season_id: SeasonId) -> DomainResult<ResetOutcome> {
        let season = self.load_season(season_id).await?;
        let _guard = self.repos.locks.acquire(user_id).await;

        let outcome = match self.repos.predictions.find_seed(user_id, season_id).await {
            Some(seed) => {
                let entry =
                    MainContestEntry::new(user_id, season.main_contest_id, seed.id, seed.created_at);
                self.repos.predictions.save(seed).await;
                self.repos.entries.insert(entry).await;
                ResetOutcome::Restored
            }
            None => {
                self.repos.predictions.delete(user_id, season_id).await;
                self.repos
                    .entries
                    .delete(user_id, season.main_contest_id)
                    .await;
                ResetOutcome::Cleared
            }
        };
        self.repos.cooldowns.delete(user_id, season_id).await;

        info!(%user_id, %season_id, ?outcome, "Demo state reset");
        Ok(outcome)
    }

    async fn find_prediction(
        &self,
        user_id: UserId,
        season_id: SeasonId,
    ) -> DomainResult<SeasonPrediction> {
        self.repos
            .predictions
            .find(user_id, season_id)
            .await
            .ok_or_else(|| DomainError::NotFound("No prediction found for this season".into()))
    }

    /// Stored cooldown, rejected unless a swap is allowed at `now`.
    async fn current_cooldown(
        &self,
        user_id: UserId,
        season_id: SeasonId,
        now: DateTime<Utc>,
    ) -> DomainResult<SwapCooldown> {
        let cooldown = self
            .repos
            .cooldowns
            .find(user_id, season_id)
            .await
            .unwrap_or_default();
        if let Err(violation) = cooldown.ensure_can_swap(now, self.window) {
            info!(%user_id, %violation, "Swap rejected by cooldown");
            return Err(violation.into());
        }
        Ok(cooldown)
    }

    async fn apply(
        &self,
        prediction: SeasonPrediction,
        rankings: Ranking,
        cooldown: SwapCooldown,
        round: RoundNumber,
        now: DateTime<Utc>,
    ) -> DomainResult<PredictionUpdate> {
        let moved = prediction.rankings.changed_teams(&rankings);
        let updated = prediction.with_rankings(rankings, round);
        let cooldown = cooldown.with_swap(now);
        info!(
            user_id = %updated.user_id,
            swap_count = cooldown.swap_count,
            "Swap applied"
        );
        self.persist(updated, cooldown, moved).await
    }

    async fn persist(
        &self,
        prediction: SeasonPrediction,
        cooldown: SwapCooldown,
        moved: Vec<TeamId>,
    ) -> DomainResult<PredictionUpdate> {
        self.repos.predictions.save(prediction.clone()).await;
        self.repos
            .cooldowns
            .save(prediction.user_id, prediction.season_id, cooldown.clone())
            .await;
        Ok(PredictionUpdate {
            prediction,
            cooldown,
            moved,
        })
    }
}
