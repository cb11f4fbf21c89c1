//! Request DTOs for the JSON API.

use chrono::NaiveDate;
use serde::Deserialize;

/// Catalog browsing query string
#[derive(Debug, Default, Deserialize)]
pub struct VehicleQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// One-time token from the verification email
#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

/// Start a booking for a vehicle
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBookingRequest {
    pub vehicle_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsRequest {
    pub pickup_city: String,
    pub pickup_address: String,
    pub drop_address: String,
}

/// Inclusive rental range
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatesRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
