use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use common::SeasonId;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, MaybeAuthUser};
use crate::extractors::json::{AppJson, AppPath, AppQuery};
use crate::models::league::RoundQuery;
use crate::models::prediction::{
    PredictionResponse, PredictionUpdateResponse, SwapRequest, SwapStatusResponse,
    TeamOrderRequest,
};
use crate::models::shared::validate_team_order;
use crate::services::prediction::{PredictionUpdate, Subject};
use crate::state::AppState;

async fn update_response(
    state: &AppState,
    user: &AuthUser,
    update: PredictionUpdate,
) -> Result<PredictionUpdateResponse, AppError> {
    let season_id = update.prediction.season_id;
    let status = state.predictions().swap_status(user.user_id, season_id).await?;
    let ctx = state
        .league()
        .row_context(season_id, update.prediction.at_round)
        .await;
    Ok(PredictionUpdateResponse::new(update, status, &ctx))
}

#[utoipa::path(
    get,
    path = "/seasons/{id}/prediction",
    tag = "Predictions",
    operation_id = "getPrediction",
    summary = "View your prediction",
    description = "Signed-in users see their own prediction, or the fallback ranking if they have none yet. Guests see the fallback ranking read-only. The ranking comes from the first of: the user's prediction, the latest round table, the season baseline.",
    params(("id" = SeasonId, Path, description = "Season ID"), RoundQuery),
    responses(
        (status = 200, description = "Ranking with access mode", body = PredictionResponse),
        (status = 400, description = "Round not started (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Bad token (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, viewer, query), fields(season_id = %season_id, user_id))]
pub async fn get_prediction(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    AppPath(season_id): AppPath<SeasonId>,
    AppQuery(query): AppQuery<RoundQuery>,
) -> Result<Json<PredictionResponse>, AppError> {
    let subject = match viewer.user_id() {
        Some(id) => {
            tracing::Span::current().record("user_id", tracing::field::display(id));
            Subject::Own(id)
        }
        None => Subject::Guest,
    };
    let view = state
        .predictions()
        .view(subject, season_id, query.round)
        .await?;
    let ctx = state.league().row_context(season_id, view.round).await;
    Ok(Json(PredictionResponse::new(season_id, view, &ctx)))
}

#[utoipa::path(
    get,
    path = "/seasons/{id}/users/{username}/prediction",
    tag = "Predictions",
    operation_id = "getUserPrediction",
    summary = "View another user's prediction",
    description = "Always read-only, except when the username is your own. An unknown username shows the fallback ranking with `READONLY_USER_NOT_FOUND`.",
    params(
        ("id" = SeasonId, Path, description = "Season ID"),
        ("username" = String, Path, description = "Username"),
        RoundQuery,
    ),
    responses(
        (status = 200, description = "Ranking with access mode", body = PredictionResponse),
        (status = 400, description = "Round not started (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, viewer, query), fields(season_id = %season_id, username = %username))]
pub async fn get_user_prediction(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    AppPath((season_id, username)): AppPath<(SeasonId, String)>,
    AppQuery(query): AppQuery<RoundQuery>,
) -> Result<Json<PredictionResponse>, AppError> {
    let service = state.predictions();
    let subject = service
        .subject_for_username(viewer.user_id(), &username)
        .await;
    let view = service.view(subject, season_id, query.round).await?;
    let ctx = state.league().row_context(season_id, view.round).await;
    Ok(Json(PredictionResponse::new(season_id, view, &ctx)))
}

#[utoipa::path(
    post,
    path = "/seasons/{id}/prediction",
    tag = "Predictions",
    operation_id = "createPrediction",
    summary = "Submit your prediction",
    description = "Submits all 20 teams in predicted finishing order and enters the season's main contest. The first swap afterwards is free.",
    params(("id" = SeasonId, Path, description = "Season ID")),
    request_body = TeamOrderRequest,
    responses(
        (status = 201, description = "Prediction created", body = PredictionUpdateResponse),
        (status = 400, description = "Invalid ranking (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Prediction already exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(season_id = %season_id, user_id = %auth_user.user_id))]
pub async fn create_prediction(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(season_id): AppPath<SeasonId>,
    AppJson(payload): AppJson<TeamOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_team_order(&payload.teams)?;
    let update = state
        .predictions()
        .create(auth_user.user_id, season_id, &payload.teams)
        .await?;
    let body = update_response(&state, &auth_user, update).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    put,
    path = "/seasons/{id}/prediction",
    tag = "Predictions",
    operation_id = "reorderPrediction",
    summary = "Replace the predicted order",
    description = "Before the first submission any order is accepted. Afterwards at most one pair of teams may change places, and only when a swap is allowed.",
    params(("id" = SeasonId, Path, description = "Season ID")),
    request_body = TeamOrderRequest,
    responses(
        (status = 200, description = "Prediction updated", body = PredictionUpdateResponse),
        (status = 400, description = "Invalid ranking (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No prediction (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "Rule violated (TOO_MANY_CHANGES, COOLDOWN_ACTIVE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(season_id = %season_id, user_id = %auth_user.user_id))]
pub async fn reorder_prediction(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(season_id): AppPath<SeasonId>,
    AppJson(payload): AppJson<TeamOrderRequest>,
) -> Result<Json<PredictionUpdateResponse>, AppError> {
    validate_team_order(&payload.teams)?;
    let update = state
        .predictions()
        .reorder(auth_user.user_id, season_id, &payload.teams)
        .await?;
    Ok(Json(update_response(&state, &auth_user, update).await?))
}

#[utoipa::path(
    post,
    path = "/seasons/{id}/prediction/swap",
    tag = "Predictions",
    operation_id = "swapTeams",
    summary = "Swap two teams",
    description = "Exchanges the positions of two teams; every other team keeps its place. Optional claimed positions guard against stale clients.",
    params(("id" = SeasonId, Path, description = "Season ID")),
    request_body = SwapRequest,
    responses(
        (status = 200, description = "Swap applied", body = PredictionUpdateResponse),
        (status = 400, description = "Same team twice (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No prediction (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "Rule violated (COOLDOWN_ACTIVE, POSITION_MISMATCH, TEAM_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(season_id = %season_id, user_id = %auth_user.user_id))]
pub async fn swap_teams(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(season_id): AppPath<SeasonId>,
    AppJson(payload): AppJson<SwapRequest>,
) -> Result<Json<PredictionUpdateResponse>, AppError> {
    let update = state
        .predictions()
        .swap(auth_user.user_id, season_id, payload.into())
        .await?;
    Ok(Json(update_response(&state, &auth_user, update).await?))
}

#[utoipa::path(
    get,
    path = "/seasons/{id}/prediction/swap-status",
    tag = "Predictions",
    operation_id = "getSwapStatus",
    summary = "Whether a swap is allowed now",
    params(("id" = SeasonId, Path, description = "Season ID")),
    responses(
        (status = 200, description = "Cooldown state", body = SwapStatusResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(season_id = %season_id, user_id = %auth_user.user_id))]
pub async fn swap_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(season_id): AppPath<SeasonId>,
) -> Result<Json<SwapStatusResponse>, AppError> {
    let status = state
        .predictions()
        .swap_status(auth_user.user_id, season_id)
        .await?;
    Ok(Json(status.into()))
}
