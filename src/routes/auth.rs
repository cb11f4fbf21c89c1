//! Sign-up, sign-in and sign-out handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::auth_middleware::AuthenticatedUser;
use crate::error::Result;
use crate::identity::{Session, SignUpProfile};
use crate::AppState;

use super::requests::{SignInRequest, VerifyEmailRequest};
use super::responses::SignUpResponse;

pub async fn sign_up(
    State(state): State<AppState>,
    Json(profile): Json<SignUpProfile>,
) -> Result<(StatusCode, Json<SignUpResponse>)> {
    let email = profile.email.trim().to_lowercase();
    state.identity.sign_up(profile).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            email,
            message: "Account created. Please verify your email before booking.",
        }),
    ))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<Session>> {
    let session = state.identity.sign_in(&req.email, &req.password).await?;
    Ok(Json(session))
}

/// Current session, verified or not
pub async fn current_session(AuthenticatedUser(session): AuthenticatedUser) -> Json<Session> {
    Json(session)
}

pub async fn sign_out(
    State(state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
) -> StatusCode {
    state.identity.sign_out(session.token).await;
    StatusCode::NO_CONTENT
}

pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<StatusCode> {
    state.identity.verify_email(&req.token).await?;
    Ok(StatusCode::NO_CONTENT)
}
