use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{BusinessRuleViolation, DomainError};
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `NOT_FOUND`, `CONFLICT`,
    /// `USERNAME_TAKEN`, `COOLDOWN_ACTIVE`, `TOO_MANY_CHANGES`,
    /// `POSITION_MISMATCH`, `TEAM_NOT_FOUND`, `INTERNAL_ERROR`.
    #[schema(example = "COOLDOWN_ACTIVE")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Swap cooldown active: next swap available in 23h 59m")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    NotFound(String),
    Conflict(String),
    UsernameTaken,
    /// A business rule rejected an otherwise valid request.
    BusinessRule(BusinessRuleViolation),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid username or password".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                },
            ),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "USERNAME_TAKEN",
                    message: "Username is already taken".into(),
                },
            ),
            AppError::BusinessRule(violation) => {
                let code = match violation {
                    BusinessRuleViolation::CooldownActive { .. } => "COOLDOWN_ACTIVE",
                    BusinessRuleViolation::TooManyChanges { .. } => "TOO_MANY_CHANGES",
                    BusinessRuleViolation::PositionMismatch { .. } => "POSITION_MISMATCH",
                    BusinessRuleViolation::TeamNotFound(_) => "TEAM_NOT_FOUND",
                    BusinessRuleViolation::MissingBaseline(_) => {
                        return AppError::Internal(violation.to_string()).status_and_body();
                    }
                };
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorBody {
                        code,
                        message: violation.to_string(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retry_after = match &self {
            AppError::BusinessRule(BusinessRuleViolation::CooldownActive {
                retry_after_secs,
                ..
            }) => Some(*retry_after_secs),
            _ => None,
        };

        let (status, body) = self.status_and_body();

        if let Some(seconds) = retry_after {
            (status, [("Retry-After", seconds.to_string())], Json(body)).into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::BusinessRule(violation) => AppError::BusinessRule(violation),
        }
    }
}
