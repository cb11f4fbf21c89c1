//! In-progress booking state owned by the wizard.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::catalog::Vehicle;

use super::step::WizardStep;

/// A booking that has not been paid for yet.
///
/// Fields are only written by [`BookingWizard`](super::BookingWizard); the
/// price is never stored and is recomputed from these inputs on demand.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub(super) vehicle: Vehicle,
    pub(super) step: WizardStep,
    pub(super) pickup_city: String,
    pub(super) pickup_address: String,
    pub(super) drop_address: String,
    pub(super) start_date: Option<NaiveDate>,
    pub(super) end_date: Option<NaiveDate>,
    pub(super) selected_facilities: BTreeSet<String>,
}

impl BookingDraft {
    pub(super) fn new(vehicle: Vehicle) -> Self {
        Self {
            vehicle,
            step: WizardStep::Locations,
            pickup_city: String::new(),
            pickup_address: String::new(),
            drop_address: String::new(),
            start_date: None,
            end_date: None,
            selected_facilities: BTreeSet::new(),
        }
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn pickup_city(&self) -> &str {
        &self.pickup_city
    }

    pub fn pickup_address(&self) -> &str {
        &self.pickup_address
    }

    pub fn drop_address(&self) -> &str {
        &self.drop_address
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn selected_facilities(&self) -> &BTreeSet<String> {
        &self.selected_facilities
    }

    /// Names of the location fields that are still blank
    pub fn missing_locations(&self) -> Vec<&'static str> {
        [
            ("pickup city", &self.pickup_city),
            ("pickup address", &self.pickup_address),
            ("drop address", &self.drop_address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn has_locations(&self) -> bool {
        self.missing_locations().is_empty()
    }

    /// Both dates set and in order
    pub fn has_dates(&self) -> bool {
        matches!((self.start_date, self.end_date), (Some(start), Some(end)) if end >= start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;

    fn draft() -> BookingDraft {
        BookingDraft::new(fixtures::vehicles().remove(0))
    }

    #[test]
    fn test_new_draft_starts_at_locations() {
        let draft = draft();
        assert_eq!(draft.step(), WizardStep::Locations);
        assert_eq!(draft.vehicle().name, "Maruti Swift");
        assert!(!draft.has_locations());
        assert!(!draft.has_dates());
        assert!(draft.selected_facilities().is_empty());
    }

    #[test]
    fn test_missing_locations_treats_whitespace_as_blank() {
        let mut draft = draft();
        draft.pickup_city = "Guntur".to_string();
        draft.pickup_address = "   ".to_string();
        assert_eq!(
            draft.missing_locations(),
            vec!["pickup address", "drop address"]
        );
    }
}
