//! Response DTOs for the JSON API.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::booking::{BookingRecord, BookingWizard, WizardStep};
use crate::cache::CacheStats;
use crate::catalog::Vehicle;
use crate::pricing::PriceBreakdown;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: CacheStats,
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub email: String,
    pub message: &'static str,
}

/// Current state of a wizard session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub session_id: Uuid,
    pub step: WizardStep,
    pub step_number: u8,
    pub step_title: &'static str,
    pub total_steps: u8,
    pub vehicle: Vehicle,
    pub pickup_city: String,
    pub pickup_address: String,
    pub drop_address: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub selected_facilities: Vec<String>,
    pub price: PriceBreakdown,
    pub payment_in_flight: bool,
    pub booking: Option<BookingRecord>,
}

impl BookingView {
    /// Snapshot the wizard; `None` once its draft has been abandoned
    pub fn from_wizard(session_id: Uuid, wizard: &BookingWizard) -> Option<Self> {
        let draft = wizard.draft()?;
        let price = wizard.quote().ok()?;
        let step = draft.step();

        Some(Self {
            session_id,
            step,
            step_number: step.number(),
            step_title: step.title(),
            total_steps: WizardStep::total_steps(),
            vehicle: draft.vehicle().clone(),
            pickup_city: draft.pickup_city().to_string(),
            pickup_address: draft.pickup_address().to_string(),
            drop_address: draft.drop_address().to_string(),
            start_date: draft.start_date(),
            end_date: draft.end_date(),
            selected_facilities: draft.selected_facilities().iter().cloned().collect(),
            price,
            payment_in_flight: wizard.payment_in_flight(),
            booking: wizard.record().cloned(),
        })
    }
}

/// A past booking as shown in the history list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: BookingRecord,
    pub status_label: &'static str,
    pub payment_label: &'static str,
}

impl HistoryEntry {
    pub fn new(record: BookingRecord, today: NaiveDate) -> Self {
        Self {
            status_label: record.status_on(today).label(),
            payment_label: record.payment_status.label(),
            record,
        }
    }
}
