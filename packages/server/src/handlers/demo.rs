use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::prediction::{DemoResetRequest, DemoResetResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/demo/reset",
    tag = "Demo",
    operation_id = "resetDemo",
    summary = "Reset your demo state",
    description = "Clears your swap cooldown. Seeded demo accounts get their original prediction back; other accounts lose their prediction and contest entry. Disabled unless `demo.enable_reset` is set.",
    request_body = DemoResetRequest,
    responses(
        (status = 200, description = "State reset", body = DemoResetResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Reset disabled or season not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn reset(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<DemoResetRequest>,
) -> Result<Json<DemoResetResponse>, AppError> {
    if !state.config.demo.enable_reset {
        return Err(AppError::NotFound("Demo reset is disabled".into()));
    }
    let season_id = match payload.season_id {
        Some(id) => id,
        None => state.league().current_season().await?.id,
    };
    let service = state.predictions();
    let outcome = service.reset_demo(auth_user.user_id, season_id).await?;
    let status = service.swap_status(auth_user.user_id, season_id).await?;
    Ok(Json(DemoResetResponse::new(outcome, status)))
}
