use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::cooldown::SwapCooldown;

/// What the current viewer may do with the prediction on screen.
///
/// Derived per request, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictionAccessMode {
    Editable,
    ReadonlyCooldown,
    CanCreateEntry,
    ReadonlyGuest,
    ReadonlyViewingOther,
    ReadonlyUserNotFound,
}

impl PredictionAccessMode {
    /// Only `Editable` and `CanCreateEntry` allow changes.
    pub fn is_readonly(&self) -> bool {
        !matches!(self, Self::Editable | Self::CanCreateEntry)
    }

    pub fn can_swap(&self) -> bool {
        !self.is_readonly()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editable => "EDITABLE",
            Self::ReadonlyCooldown => "READONLY_COOLDOWN",
            Self::CanCreateEntry => "CAN_CREATE_ENTRY",
            Self::ReadonlyGuest => "READONLY_GUEST",
            Self::ReadonlyViewingOther => "READONLY_VIEWING_OTHER",
            Self::ReadonlyUserNotFound => "READONLY_USER_NOT_FOUND",
        }
    }

    /// Resolve the access mode for a viewer looking at a round.
    pub fn resolve(
        viewer: &Viewer<'_>,
        is_current_round: bool,
        now: DateTime<Utc>,
        window: TimeDelta,
    ) -> Self {
        match viewer {
            Viewer::Guest => Self::ReadonlyGuest,
            Viewer::ViewingOther => Self::ReadonlyViewingOther,
            Viewer::UserNotFound => Self::ReadonlyUserNotFound,
            Viewer::Authenticated {
                has_prediction: true,
                cooldown,
            } => {
                if is_current_round && cooldown.can_swap(now, window) {
                    Self::Editable
                } else {
                    Self::ReadonlyCooldown
                }
            }
            Viewer::Authenticated {
                has_prediction: false,
                ..
            } => {
                if is_current_round {
                    Self::CanCreateEntry
                } else {
                    Self::ReadonlyCooldown
                }
            }
        }
    }
}

impl fmt::Display for PredictionAccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is looking at a prediction page.
#[derive(Clone, Copy, Debug)]
pub enum Viewer<'a> {
    Guest,
    /// A signed-in user looking at their own prediction.
    Authenticated {
        has_prediction: bool,
        cooldown: &'a SwapCooldown,
    },
    /// Anyone looking at another existing user's prediction.
    ViewingOther,
    /// The requested user does not exist.
    UserNotFound,
}
