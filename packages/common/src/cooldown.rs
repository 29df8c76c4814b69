use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BusinessRuleViolation;

/// Production waiting period between swaps once the bonus swap is spent.
pub const DEFAULT_SWAP_COOLDOWN: TimeDelta = TimeDelta::hours(24);

/// Per-user state gating how often a prediction may change.
///
/// Lifecycle:
/// 1. Composing (`initial_prediction_made == false`): unlimited changes.
/// 2. Submitted, bonus pending (`swap_count == 0`): one free swap, no waiting.
/// 3. Cooling down: each further swap needs `window` to have elapsed since
///    `last_swap_at`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCooldown {
    pub last_swap_at: Option<DateTime<Utc>>,
    pub initial_prediction_made: bool,
    pub swap_count: u32,
    pub first_swap_bonus_eligible: bool,
}

impl SwapCooldown {
    /// State of a user who has not submitted anything yet.
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn can_swap(&self, now: DateTime<Utc>, window: TimeDelta) -> bool {
        match self.next_eligible_at(window) {
            None => true,
            Some(at) => now >= at,
        }
    }

    /// When the next swap becomes allowed, or `None` if it is allowed right away
    /// regardless of the clock.
    pub fn next_eligible_at(&self, window: TimeDelta) -> Option<DateTime<Utc>> {
        if !self.initial_prediction_made || self.first_swap_bonus_eligible {
            return None;
        }
        self.last_swap_at.map(|at| at + window)
    }

    /// Seconds left until the next swap; zero when a swap is allowed now.
    pub fn remaining_secs(&self, now: DateTime<Utc>, window: TimeDelta) -> u64 {
        self.next_eligible_at(window)
            .map(|at| (at - now).num_seconds().max(0) as u64)
            .unwrap_or(0)
    }

    /// Rejects with `CooldownActive` unless a swap is allowed at `now`.
    pub fn ensure_can_swap(
        &self,
        now: DateTime<Utc>,
        window: TimeDelta,
    ) -> Result<(), BusinessRuleViolation> {
        match self.next_eligible_at(window) {
            Some(next_eligible_at) if now < next_eligible_at => {
                Err(BusinessRuleViolation::CooldownActive {
                    next_eligible_at,
                    retry_after_secs: self.remaining_secs(now, window),
                })
            }
            _ => Ok(()),
        }
    }

    /// Transition for the first submitted prediction.
    pub fn with_initial_submission(&self, now: DateTime<Utc>) -> Self {
        Self {
            last_swap_at: Some(now),
            initial_prediction_made: true,
            swap_count: 0,
            first_swap_bonus_eligible: true,
        }
    }

    /// Transition for an applied swap. The caller checks `can_swap` first.
    ///
    /// A change made while still composing submits the prediction instead:
    /// it does not count as a swap and leaves the bonus swap available.
    pub fn with_swap(&self, now: DateTime<Utc>) -> Self {
        if !self.initial_prediction_made {
            return self.with_initial_submission(now);
        }
        Self {
            last_swap_at: Some(now),
            initial_prediction_made: true,
            swap_count: self.swap_count + 1,
            first_swap_bonus_eligible: false,
        }
    }

    pub fn is_bonus_available(&self) -> bool {
        self.initial_prediction_made && self.first_swap_bonus_eligible
    }
}

/// Human-readable wait, rounded up to the minute ("3h 5m", "42m").
pub fn format_remaining(secs: u64) -> String {
    let minutes = secs.div_ceil(60);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
