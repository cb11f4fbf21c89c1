//! Pricing engine module.
//!
//! Turns a vehicle's daily rate, a date range and selected add-ons into an
//! itemized [`PriceBreakdown`]. Recomputed on demand, never stored.

pub mod calculators;

// Re-export commonly used items
pub use calculators::{billable_days, calculate_price, facilities_cost, PriceBreakdown};
