//! Booking wizard state machine.
//!
//! ## Architecture
//!
//! ```text
//! BookingWizard
//!   ├── BookingDraft (vehicle, step, locations, dates, add-ons)
//!   ├── PaymentState (idle / one attempt in flight)
//!   └── BookingRecord (set once payment succeeds)
//! ```
//!
//! The wizard is synchronous. Payment is split into [`BookingWizard::begin_payment`]
//! and [`BookingWizard::complete_payment`] so the caller can await the gateway
//! without holding the wizard. Every draft replacement or abandon bumps the
//! wizard's generation; a completion carrying an older generation is discarded.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::CatalogProvider;
use crate::pricing::{calculate_price, PriceBreakdown};

use super::draft::BookingDraft;
use super::error::BookingError;
use super::payment::{PaymentDetails, PaymentReceipt, PaymentRequest};
use super::record::{booking_reference, BookingRecord, BookingStatus, PaymentStatus};
use super::step::WizardStep;

type Result<T> = std::result::Result<T, BookingError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaymentState {
    Idle,
    InFlight { attempt: u64 },
}

/// Handle for one payment attempt, returned by
/// [`BookingWizard::begin_payment`] and consumed by
/// [`BookingWizard::complete_payment`].
#[derive(Debug)]
pub struct PaymentTicket {
    generation: u64,
    attempt: u64,
    request: PaymentRequest,
}

impl PaymentTicket {
    pub fn request(&self) -> &PaymentRequest {
        &self.request
    }
}

/// Owns one booking draft and gates its progress through the steps
pub struct BookingWizard {
    catalog: Arc<dyn CatalogProvider>,
    user_id: Uuid,
    draft: Option<BookingDraft>,
    draft_id: Uuid,
    generation: u64,
    next_attempt: u64,
    payment: PaymentState,
    record: Option<BookingRecord>,
    acknowledged: bool,
}

impl BookingWizard {
    pub fn new(catalog: Arc<dyn CatalogProvider>, user_id: Uuid) -> Self {
        Self {
            catalog,
            user_id,
            draft: None,
            draft_id: Uuid::nil(),
            generation: 0,
            next_attempt: 1,
            payment: PaymentState::Idle,
            record: None,
            acknowledged: false,
        }
    }

    /// Start a fresh draft for a vehicle, discarding any previous one
    pub fn select_vehicle(&mut self, vehicle_id: &str) -> Result<&BookingDraft> {
        let vehicle = self
            .catalog
            .get_vehicle(vehicle_id)
            .ok_or_else(|| BookingError::vehicle_not_found(vehicle_id))?;
        if !vehicle.available {
            return Err(BookingError::precondition(format!(
                "{} is not available for booking",
                vehicle.name
            )));
        }
        let vehicle = vehicle.clone();

        self.reset();
        self.draft_id = Uuid::new_v4();
        info!(
            "Draft {} started for {} by user {}",
            self.draft_id, vehicle.name, self.user_id
        );
        Ok(&*self.draft.insert(BookingDraft::new(vehicle)))
    }

    /// Drop the draft. Any payment still in flight will be discarded when it
    /// completes.
    pub fn abandon(&mut self) {
        if self.draft.is_some() {
            info!("Draft {} abandoned", self.draft_id);
        }
        self.reset();
    }

    fn reset(&mut self) {
        if let PaymentState::InFlight { attempt } = self.payment {
            warn!(
                "Invalidating in-flight payment attempt {} for draft {}",
                attempt, self.draft_id
            );
        }
        self.draft = None;
        self.draft_id = Uuid::nil();
        self.generation += 1;
        self.payment = PaymentState::Idle;
        self.record = None;
        self.acknowledged = false;
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn draft(&self) -> Option<&BookingDraft> {
        self.draft.as_ref()
    }

    pub fn draft_id(&self) -> Option<Uuid> {
        self.draft.as_ref().map(|_| self.draft_id)
    }

    pub fn step(&self) -> Option<WizardStep> {
        self.draft.as_ref().map(BookingDraft::step)
    }

    pub fn payment_in_flight(&self) -> bool {
        matches!(self.payment, PaymentState::InFlight { .. })
    }

    /// The finalized booking, once payment has succeeded
    pub fn record(&self) -> Option<&BookingRecord> {
        self.record.as_ref()
    }

    /// Whether the booking sink has accepted the record
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    /// Note that the sink stored the record with this id
    pub fn mark_acknowledged(&mut self, booking_id: Uuid) {
        if self.record.as_ref().map(|r| r.id) == Some(booking_id) {
            self.acknowledged = true;
        }
    }

    fn current_draft(&self) -> Result<&BookingDraft> {
        self.draft
            .as_ref()
            .ok_or_else(|| BookingError::precondition("select a vehicle first"))
    }

    /// Draft for a mutating operation
    fn editable_draft(&mut self) -> Result<&mut BookingDraft> {
        if self.payment_in_flight() {
            return Err(BookingError::Busy);
        }
        let draft = self
            .draft
            .as_mut()
            .ok_or_else(|| BookingError::precondition("select a vehicle first"))?;
        if draft.step == WizardStep::Confirmation {
            return Err(BookingError::precondition("booking is already confirmed"));
        }
        Ok(draft)
    }

    pub fn set_locations(&mut self, city: &str, pickup_address: &str, drop_address: &str) -> Result<()> {
        let draft = self.editable_draft()?;
        draft.pickup_city = city.trim().to_string();
        draft.pickup_address = pickup_address.trim().to_string();
        draft.drop_address = drop_address.trim().to_string();
        Ok(())
    }

    /// Set the inclusive rental range; rejected without change if `end < start`
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<()> {
        if end < start {
            return Err(BookingError::InvalidRange { start, end });
        }
        let draft = self.editable_draft()?;
        draft.start_date = Some(start);
        draft.end_date = Some(end);
        Ok(())
    }

    /// Add the facility if absent, remove it if present. Returns whether it is
    /// now selected.
    pub fn toggle_facility(&mut self, facility_id: &str) -> Result<bool> {
        if self.catalog.get_add_on_facility(facility_id).is_none() {
            return Err(BookingError::facility_not_found(facility_id));
        }
        let draft = self.editable_draft()?;
        if draft.selected_facilities.remove(facility_id) {
            Ok(false)
        } else {
            draft.selected_facilities.insert(facility_id.to_string());
            Ok(true)
        }
    }

    /// Move forward one step. A no-op on the confirmation step.
    pub fn advance(&mut self) -> Result<WizardStep> {
        if self.payment_in_flight() {
            return Err(BookingError::Busy);
        }
        let draft = self
            .draft
            .as_mut()
            .ok_or_else(|| BookingError::precondition("select a vehicle first"))?;

        // Locations stay editable after step 1, so Schedule rechecks them
        match draft.step {
            WizardStep::Locations | WizardStep::Schedule if !draft.has_locations() => {
                return Err(BookingError::precondition(format!(
                    "please enter the {}",
                    draft.missing_locations().join(", ")
                )));
            }
            WizardStep::Locations => {}
            WizardStep::Schedule => {
                if !draft.has_dates() {
                    return Err(BookingError::precondition(
                        "please choose a start and end date",
                    ));
                }
            }
            WizardStep::Payment => {
                return Err(BookingError::precondition(
                    "payment is required to confirm the booking",
                ));
            }
            WizardStep::Confirmation => return Ok(draft.step),
        }

        if let Some(next) = draft.step.next() {
            debug!("Draft {} advanced to {:?}", self.draft_id, next);
            draft.step = next;
        }
        Ok(draft.step)
    }

    /// Move back one step. A no-op on the first step, and once the booking
    /// is confirmed.
    pub fn retreat(&mut self) -> Result<WizardStep> {
        if self.payment_in_flight() {
            return Err(BookingError::Busy);
        }
        let draft = self
            .draft
            .as_mut()
            .ok_or_else(|| BookingError::precondition("select a vehicle first"))?;

        if draft.step != WizardStep::Confirmation {
            if let Some(previous) = draft.step.previous() {
                debug!("Draft {} moved back to {:?}", self.draft_id, previous);
                draft.step = previous;
            }
        }
        Ok(draft.step)
    }

    /// Current price of the draft
    pub fn quote(&self) -> Result<PriceBreakdown> {
        let draft = self.current_draft()?;
        Ok(calculate_price(
            draft.vehicle.price_per_day,
            draft.start_date,
            draft.end_date,
            draft.selected_facilities.iter().map(String::as_str),
            self.catalog.list_add_on_facilities(),
        ))
    }

    /// Claim the single payment slot for this draft.
    pub fn begin_payment(&mut self, details: PaymentDetails) -> Result<PaymentTicket> {
        if self.payment_in_flight() {
            return Err(BookingError::Busy);
        }
        let draft = self.current_draft()?;
        if draft.step != WizardStep::Payment {
            return Err(BookingError::precondition(match draft.step {
                WizardStep::Confirmation => "booking is already confirmed",
                _ => "complete the earlier steps before paying",
            }));
        }
        if !draft.has_locations() || !draft.has_dates() {
            return Err(BookingError::precondition(
                "locations and dates are required before paying",
            ));
        }

        let amount = self.quote()?.total;
        let attempt = self.next_attempt;
        self.next_attempt += 1;
        self.payment = PaymentState::InFlight { attempt };
        info!(
            "Payment attempt {} started for draft {} (amount {})",
            attempt, self.draft_id, amount
        );

        Ok(PaymentTicket {
            generation: self.generation,
            attempt,
            request: PaymentRequest {
                draft_id: self.draft_id,
                amount,
                details,
            },
        })
    }

    /// Apply the outcome of a payment attempt.
    ///
    /// On success the draft moves to the confirmation step and the booking
    /// record is created. On failure the draft stays on the payment step and
    /// the error is returned. A ticket from an abandoned or replaced draft is
    /// discarded with [`BookingError::Cancelled`].
    pub fn complete_payment(
        &mut self,
        ticket: PaymentTicket,
        outcome: std::result::Result<PaymentReceipt, BookingError>,
    ) -> Result<BookingRecord> {
        let current = self.generation == ticket.generation
            && self.payment == (PaymentState::InFlight { attempt: ticket.attempt });
        if !current {
            warn!(
                "Discarding stale payment attempt {} for draft {}",
                ticket.attempt, ticket.request.draft_id
            );
            return Err(BookingError::Cancelled);
        }
        self.payment = PaymentState::Idle;

        let receipt = match outcome {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(
                    "Payment attempt {} for draft {} failed: {}",
                    ticket.attempt, self.draft_id, e
                );
                return Err(e);
            }
        };

        let record = self.build_record(&receipt)?;
        if let Some(draft) = self.draft.as_mut() {
            draft.step = WizardStep::Confirmation;
        }
        info!(
            "Booking {} confirmed for draft {} (payment {})",
            record.reference, self.draft_id, receipt.reference
        );
        self.record = Some(record.clone());
        Ok(record)
    }

    fn build_record(&self, receipt: &PaymentReceipt) -> Result<BookingRecord> {
        let draft = self.current_draft()?;
        let (start_date, end_date) = match (draft.start_date, draft.end_date) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(BookingError::precondition("dates are required")),
        };
        let breakdown = self.quote()?;
        let facilities = self
            .catalog
            .list_add_on_facilities()
            .iter()
            .filter(|f| draft.selected_facilities.contains(&f.id))
            .map(|f| f.name.clone())
            .collect();
        let created_at = Utc::now();

        Ok(BookingRecord {
            id: Uuid::new_v4(),
            reference: booking_reference(created_at),
            user_id: self.user_id,
            vehicle_id: draft.vehicle.id.clone(),
            vehicle_name: draft.vehicle.name.clone(),
            pickup_city: draft.pickup_city.clone(),
            pickup_address: draft.pickup_address.clone(),
            drop_address: draft.drop_address.clone(),
            start_date,
            end_date,
            days: breakdown.days,
            total_amount: receipt.amount,
            facilities,
            payment_status: PaymentStatus::Completed,
            booking_status: BookingStatus::Confirmed,
            payment_reference: receipt.reference.clone(),
            created_at,
        })
    }
}
