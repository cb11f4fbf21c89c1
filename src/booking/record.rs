//! Finalized bookings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment state of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "Paid",
            PaymentStatus::Pending | PaymentStatus::Failed => "Pending",
        }
    }
}

/// Lifecycle of a booked trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Ongoing,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "Upcoming Trip",
            BookingStatus::Ongoing => "Ongoing Trip",
            BookingStatus::Completed => "Trip Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    /// Status of a non-cancelled trip as seen on `today`
    pub fn for_trip(today: NaiveDate, start: NaiveDate, end: NaiveDate) -> Self {
        if today < start {
            BookingStatus::Confirmed
        } else if today <= end {
            BookingStatus::Ongoing
        } else {
            BookingStatus::Completed
        }
    }
}

/// A paid booking handed to the booking sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: Uuid,
    /// Short customer-facing reference, e.g. "LB482913"
    pub reference: String,
    pub user_id: Uuid,
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub pickup_city: String,
    pub pickup_address: String,
    pub drop_address: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: u64,
    pub total_amount: u64,
    /// Names of the add-ons, in catalog order
    pub facilities: Vec<String>,
    pub payment_status: PaymentStatus,
    pub booking_status: BookingStatus,
    pub payment_reference: String,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    /// Status to display on `today`; cancellation always wins
    pub fn status_on(&self, today: NaiveDate) -> BookingStatus {
        match self.booking_status {
            BookingStatus::Cancelled => BookingStatus::Cancelled,
            _ => BookingStatus::for_trip(today, self.start_date, self.end_date),
        }
    }
}

/// Customer-facing booking reference: "LB" and the last six digits of the
/// creation time in milliseconds. Not unique on its own; the record's `id`
/// is the identifier.
pub fn booking_reference(created_at: DateTime<Utc>) -> String {
    format!("LB{:06}", created_at.timestamp_millis().rem_euclid(1_000_000))
}
