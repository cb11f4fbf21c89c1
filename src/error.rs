//! Error handling for the HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::booking::BookingError;
use crate::catalog::UnknownFilterValue;
use crate::identity::AuthError;

/// Everything a handler can fail with, mapped to a status and JSON body
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Booking session not found")]
    SessionNotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UnknownFilterValue> for AppError {
    fn from(e: UnknownFilterValue) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error_type: &'static str,
    pub message: String,
}

fn auth_status(e: &AuthError) -> StatusCode {
    match e {
        AuthError::InvalidCredentials | AuthError::NotSignedIn => StatusCode::UNAUTHORIZED,
        AuthError::Unverified => StatusCode::FORBIDDEN,
        AuthError::EmailTaken => StatusCode::CONFLICT,
        AuthError::InvalidProfile(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::InvalidVerification => StatusCode::BAD_REQUEST,
        AuthError::Provider(_) => StatusCode::BAD_GATEWAY,
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Booking(e) => match e {
                BookingError::NotFound { .. } => StatusCode::NOT_FOUND,
                BookingError::Precondition(_) | BookingError::Busy | BookingError::Cancelled => {
                    StatusCode::CONFLICT
                }
                BookingError::InvalidRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                BookingError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
                BookingError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                BookingError::Sink(_) => StatusCode::BAD_GATEWAY,
                BookingError::Auth(e) => auth_status(e),
            },
            AppError::Auth(e) => auth_status(e),
            AppError::SessionNotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            AppError::Booking(e) => ErrorBody {
                error_type: e.error_type(),
                message: e.user_message(),
            },
            AppError::Auth(e) => ErrorBody {
                error_type: "auth",
                message: e.to_string(),
            },
            AppError::SessionNotFound => ErrorBody {
                error_type: "not_found",
                message: self.to_string(),
            },
            AppError::BadRequest(msg) => ErrorBody {
                error_type: "bad_request",
                message: msg.clone(),
            },
            AppError::Internal(_) => ErrorBody {
                error_type: "internal",
                message: "Internal error".to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{} ({})", self, status);
        } else {
            tracing::debug!("Request rejected: {} ({})", self, status);
        }

        (status, Json(self.body())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
