//! Bearer-token extractors for protected handlers.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::identity::{AuthError, Session};
use crate::AppState;

/// Caller with a live session, verified or not
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Session);

/// Caller with a live session and a verified email
#[derive(Debug, Clone)]
pub struct VerifiedUser(pub Session);

impl VerifiedUser {
    pub fn user_id(&self) -> Uuid {
        self.0.user_id
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            warn!("Missing or malformed Authorization header");
            AppError::Auth(AuthError::NotSignedIn)
        })?;

        let app_state = AppState::from_ref(state);
        let session = app_state
            .identity
            .current_session(token)
            .await
            .ok_or(AppError::Auth(AuthError::NotSignedIn))?;

        Ok(AuthenticatedUser(session))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for VerifiedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(session) = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !session.verified {
            warn!("Unverified user {} tried to reach the booking wizard", session.user_id);
            return Err(AppError::Auth(AuthError::Unverified));
        }
        Ok(VerifiedUser(session))
    }
}
