//! Booking wizard steps.

use serde::Serialize;

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Pickup city and pickup/drop addresses
    Locations,

    /// Rental dates and optional facilities
    Schedule,

    /// Card details and payment
    Payment,

    /// Booking confirmed
    Confirmation,
}

impl WizardStep {
    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Locations => "Select Locations",
            WizardStep::Schedule => "Choose Dates & Facilities",
            WizardStep::Payment => "Payment",
            WizardStep::Confirmation => "Confirmation",
        }
    }

    /// Get step number (1-indexed)
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Locations => 1,
            WizardStep::Schedule => 2,
            WizardStep::Payment => 3,
            WizardStep::Confirmation => 4,
        }
    }

    pub fn total_steps() -> u8 {
        4
    }

    pub fn is_first(&self) -> bool {
        matches!(self, WizardStep::Locations)
    }

    pub fn is_last(&self) -> bool {
        matches!(self, WizardStep::Confirmation)
    }

    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Locations => Some(WizardStep::Schedule),
            WizardStep::Schedule => Some(WizardStep::Payment),
            WizardStep::Payment => Some(WizardStep::Confirmation),
            WizardStep::Confirmation => None,
        }
    }

    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Locations => None,
            WizardStep::Schedule => Some(WizardStep::Locations),
            WizardStep::Payment => Some(WizardStep::Schedule),
            WizardStep::Confirmation => Some(WizardStep::Payment),
        }
    }
}
