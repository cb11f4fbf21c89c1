//! Booking wizard error taxonomy.
//!
//! Every variant is recoverable: the wizard leaves the draft as it was and the
//! host shows [`BookingError::user_message`].

use std::time::Duration;

use chrono::NaiveDate;

use crate::identity::AuthError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Cannot continue: {0}")]
    Precondition(String),

    #[error("End date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("A payment is already being processed for this booking")]
    Busy,

    #[error("Payment did not complete within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Payment declined: {0}")]
    Payment(String),

    #[error("Booking could not be saved: {0}")]
    Sink(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Booking was abandoned before the payment completed")]
    Cancelled,
}

impl BookingError {
    pub fn vehicle_not_found(id: &str) -> Self {
        BookingError::NotFound {
            kind: "Vehicle",
            id: id.to_string(),
        }
    }

    pub fn facility_not_found(id: &str) -> Self {
        BookingError::NotFound {
            kind: "Facility",
            id: id.to_string(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        BookingError::Precondition(message.into())
    }

    /// Short machine-readable name for API clients
    pub fn error_type(&self) -> &'static str {
        match self {
            BookingError::NotFound { .. } => "not_found",
            BookingError::Precondition(_) => "precondition",
            BookingError::InvalidRange { .. } => "invalid_range",
            BookingError::Busy => "busy",
            BookingError::Timeout(_) => "timeout",
            BookingError::Payment(_) => "payment",
            BookingError::Sink(_) => "sink",
            BookingError::Auth(_) => "auth",
            BookingError::Cancelled => "cancelled",
        }
    }

    /// Message safe to show the customer
    pub fn user_message(&self) -> String {
        match self {
            BookingError::Timeout(_) => {
                "The payment provider did not respond in time. You have not been charged; please try again.".to_string()
            }
            BookingError::Sink(_) => {
                "Your payment went through but we could not save the booking yet. Please retry confirmation.".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_error_display() {
        let err = BookingError::vehicle_not_found("42");
        assert_eq!(err.to_string(), "Vehicle not found: 42");

        let err = BookingError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert!(err.to_string().contains("2024-03-01"));

        let err = BookingError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Payment did not complete within 30s");
    }

    #[test]
    fn test_auth_errors_surface_verbatim() {
        let err: BookingError = AuthError::Unverified.into();
        assert_eq!(err.to_string(), AuthError::Unverified.to_string());
        assert_eq!(err.error_type(), "auth");
    }

    #[test]
    fn test_user_message_hides_internal_sink_detail() {
        let err = BookingError::Sink("connection reset".to_string());
        assert!(!err.user_message().contains("connection reset"));
    }
}
