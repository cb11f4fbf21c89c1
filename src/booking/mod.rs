//! Multi-step booking wizard, payment orchestration and booking persistence.

pub mod draft;
pub mod error;
pub mod payment;
pub mod record;
pub mod session;
pub mod sink;
pub mod step;
pub mod wizard;

pub use draft::BookingDraft;
pub use error::BookingError;
pub use payment::{
    PaymentDeclined, PaymentDetails, PaymentGateway, PaymentReceipt, PaymentRequest,
    SimulatedGateway,
};
pub use record::{booking_reference, BookingRecord, BookingStatus, PaymentStatus};
pub use session::{BookingServices, BookingSession};
pub use sink::{Acknowledgement, BookingSink, InMemoryBookingStore, SinkError};
pub use step::WizardStep;
pub use wizard::{BookingWizard, PaymentTicket};
