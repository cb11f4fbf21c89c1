//! Core pricing calculation functions.
//!
//! Pure functions for booking pricing - no catalog lookups beyond the slice
//! passed in, no hidden state.

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::AddOnFacility;

/// Itemized cost of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub days: u64,
    pub vehicle_cost: u64,
    pub facilities_cost: u64,
    pub total: u64,
}

/// Number of billable days in a rental.
///
/// A missing start or end date bills a single day. A same-day rental also
/// bills one day. Dates are whole calendar days, so the difference is
/// already the ceiling of the elapsed time.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use rental_web::pricing::billable_days;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 18).unwrap();
/// assert_eq!(billable_days(Some(start), Some(end)), 3);
/// assert_eq!(billable_days(Some(start), Some(start)), 1);
/// assert_eq!(billable_days(Some(start), None), 1);
/// ```
pub fn billable_days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> u64 {
    match (start, end) {
        (Some(start), Some(end)) => {
            let elapsed = end.signed_duration_since(start).num_days();
            u64::try_from(elapsed).unwrap_or(0).max(1)
        }
        _ => 1,
    }
}

/// Sum the flat prices of the selected add-ons.
///
/// Ids missing from `catalog` contribute nothing.
pub fn facilities_cost<'a, I>(selected: I, catalog: &[AddOnFacility]) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    selected
        .into_iter()
        .filter_map(|id| catalog.iter().find(|f| f.id == id))
        .fold(0u64, |total, f| total.saturating_add(f.price))
}

/// Price a booking.
///
/// Callable at any wizard step; before dates are chosen the figures are
/// for a single day.
pub fn calculate_price<'a, I>(
    price_per_day: u64,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    selected: I,
    catalog: &[AddOnFacility],
) -> PriceBreakdown
where
    I: IntoIterator<Item = &'a str>,
{
    let days = billable_days(start, end);
    let vehicle_cost = price_per_day.saturating_mul(days);
    let facilities_cost = facilities_cost(selected, catalog);

    PriceBreakdown {
        days,
        vehicle_cost,
        facilities_cost,
        total: vehicle_cost.saturating_add(facilities_cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ==================== billable_days tests ====================

    #[test]
    fn test_billable_days_range() {
        assert_eq!(billable_days(Some(date(2024, 1, 15)), Some(date(2024, 1, 17))), 2);
        assert_eq!(billable_days(Some(date(2024, 2, 27)), Some(date(2024, 3, 2))), 4);
    }

    #[test]
    fn test_billable_days_same_day_is_one() {
        assert_eq!(billable_days(Some(date(2024, 3, 1)), Some(date(2024, 3, 1))), 1);
    }

    #[test]
    fn test_billable_days_missing_dates() {
        assert_eq!(billable_days(None, None), 1);
        assert_eq!(billable_days(Some(date(2024, 3, 1)), None), 1);
        assert_eq!(billable_days(None, Some(date(2024, 3, 1))), 1);
    }

    #[test]
    fn test_billable_days_reversed_range_floors_at_one() {
        assert_eq!(billable_days(Some(date(2024, 3, 5)), Some(date(2024, 3, 1))), 1);
    }

    // ==================== facilities_cost tests ====================

    #[test]
    fn test_facilities_cost_sums_known_ids() {
        let add_ons = fixtures::add_on_facilities();
        assert_eq!(facilities_cost(["1", "3"], &add_ons), 600);
        assert_eq!(facilities_cost(Vec::<&str>::new(), &add_ons), 0);
    }

    #[test]
    fn test_facilities_cost_ignores_unknown_ids() {
        let add_ons = fixtures::add_on_facilities();
        assert_eq!(facilities_cost(["2", "missing"], &add_ons), 200);
    }

    // ==================== calculate_price tests ====================

    #[test]
    fn test_three_days_with_driver() {
        let add_ons = fixtures::add_on_facilities();
        let breakdown = calculate_price(
            1200,
            Some(date(2024, 1, 15)),
            Some(date(2024, 1, 18)),
            ["1"],
            &add_ons,
        );

        assert_eq!(
            breakdown,
            PriceBreakdown {
                days: 3,
                vehicle_cost: 3600,
                facilities_cost: 500,
                total: 4100,
            }
        );
    }

    #[test]
    fn test_partial_inputs_price_one_day() {
        let add_ons = fixtures::add_on_facilities();
        let breakdown = calculate_price(1800, None, None, Vec::<&str>::new(), &add_ons);
        assert_eq!(breakdown.days, 1);
        assert_eq!(breakdown.total, 1800);
    }

    #[test]
    fn test_price_is_idempotent() {
        let add_ons = fixtures::add_on_facilities();
        let start = Some(date(2024, 5, 1));
        let end = Some(date(2024, 5, 4));
        let first = calculate_price(2200, start, end, ["2", "4"], &add_ons);
        let second = calculate_price(2200, start, end, ["2", "4"], &add_ons);
        assert_eq!(first, second);
    }

    #[test]
    fn test_price_is_monotonic() {
        let add_ons = fixtures::add_on_facilities();
        let start = Some(date(2024, 5, 1));

        let mut previous = 0;
        for offset in 0..10 {
            let end = start.map(|s| s + chrono::Days::new(offset));
            let total = calculate_price(1600, start, end, ["5"], &add_ons).total;
            assert!(total >= previous);
            previous = total;
        }

        let end = Some(date(2024, 5, 3));
        let fewer = calculate_price(1600, start, end, ["1"], &add_ons).total;
        let more = calculate_price(1600, start, end, ["1", "2"], &add_ons).total;
        assert!(more >= fewer);
    }

    #[test]
    fn test_total_saturates_instead_of_overflowing() {
        let add_ons = fixtures::add_on_facilities();
        let breakdown = calculate_price(
            u64::MAX,
            Some(date(2024, 1, 1)),
            Some(date(2024, 1, 3)),
            ["1"],
            &add_ons,
        );
        assert_eq!(breakdown.total, u64::MAX);
    }
}
