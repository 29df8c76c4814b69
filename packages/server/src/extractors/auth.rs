use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use common::UserId;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
pub struct AuthUser {
    pub user_id: UserId,
    pub username: String,
}

/// Like [`AuthUser`], but a request without an `Authorization` header is a
/// guest instead of a rejection. A header carrying a bad token still fails.
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn user_id(&self) -> Option<UserId> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get("Authorization") else {
        return Ok(None);
    };
    let value = header.to_str().map_err(|_| AppError::TokenInvalid)?;
    value
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or(AppError::TokenInvalid)
}

/// Verify the token and check that its user still exists. A token issued
/// before the store was reset is rejected like a forged one.
async fn decode(token: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let claims = jwt::verify(token, &state.config.auth.jwt_secret)
        .map_err(|_| AppError::TokenInvalid)?;
    let user_id = UserId::from_uuid(claims.uid);
    let Some(user) = state.repos.users.find(user_id).await else {
        tracing::debug!(%user_id, "Token for unknown user rejected");
        return Err(AppError::TokenInvalid);
    };
    Ok(AuthUser {
        user_id: user.id,
        username: user.username,
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(parts)?.ok_or(AppError::TokenMissing)?;
        decode(token, &state).await
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        match bearer_token(parts)? {
            Some(token) => decode(token, &state).await.map(|user| MaybeAuthUser(Some(user))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}
