//! Catalog filtering for the browsing view.

use std::str::FromStr;

use serde::Serialize;

use super::models::{UnknownFilterValue, Vehicle, VehicleCategory};

/// Upper bound (inclusive) of the budget tier
pub const BUDGET_MAX: u64 = 1500;
/// Upper bound (inclusive) of the mid-range tier
pub const MID_MAX: u64 = 2500;

/// Coarse price bucket used only for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    /// price <= 1500
    Budget,
    /// 1500 < price <= 2500
    Mid,
    /// price > 2500
    Premium,
}

impl PriceTier {
    pub fn of(price_per_day: u64) -> Self {
        if price_per_day <= BUDGET_MAX {
            PriceTier::Budget
        } else if price_per_day <= MID_MAX {
            PriceTier::Mid
        } else {
            PriceTier::Premium
        }
    }

    pub fn contains(&self, price_per_day: u64) -> bool {
        PriceTier::of(price_per_day) == *self
    }
}

impl FromStr for PriceTier {
    type Err = UnknownFilterValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "budget" => Ok(PriceTier::Budget),
            "mid" => Ok(PriceTier::Mid),
            "premium" => Ok(PriceTier::Premium),
            _ => Err(UnknownFilterValue(s.to_string())),
        }
    }
}

/// Browsing filter. `None` for category or tier means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub text: String,
    pub category: Option<VehicleCategory>,
    pub tier: Option<PriceTier>,
}

impl CatalogQuery {
    /// Build a query from raw query-string values, where "all" (or an empty
    /// value) disables that filter.
    pub fn parse(
        text: Option<&str>,
        category: Option<&str>,
        tier: Option<&str>,
    ) -> Result<Self, UnknownFilterValue> {
        Ok(Self {
            text: text.unwrap_or_default().to_string(),
            category: parse_or_all(category)?,
            tier: parse_or_all(tier)?,
        })
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        let needle = self.text.to_lowercase();
        let matches_text = vehicle.name.to_lowercase().contains(&needle)
            || vehicle.model.to_lowercase().contains(&needle);
        let matches_category = self.category.map_or(true, |c| vehicle.category == c);
        let matches_tier = self.tier.map_or(true, |t| t.contains(vehicle.price_per_day));

        matches_text && matches_category && matches_tier
    }
}

fn parse_or_all<T: FromStr<Err = UnknownFilterValue>>(
    value: Option<&str>,
) -> Result<Option<T>, UnknownFilterValue> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => v.parse().map(Some),
    }
}

/// Stable filter: returns matching vehicles in catalog order.
pub fn filter_vehicles<'a>(vehicles: &'a [Vehicle], query: &CatalogQuery) -> Vec<&'a Vehicle> {
    vehicles.iter().filter(|v| query.matches(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;

    fn names(vehicles: &[&Vehicle]) -> Vec<String> {
        vehicles.iter().map(|v| v.name.clone()).collect()
    }

    #[test]
    fn test_query_swift_returns_only_swift() {
        let fleet = fixtures::vehicles();
        let query = CatalogQuery::parse(Some("swift"), Some("all"), Some("all")).unwrap();
        assert_eq!(names(&filter_vehicles(&fleet, &query)), vec!["Maruti Swift"]);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let fleet = fixtures::vehicles();
        let query = CatalogQuery::parse(Some("HONDA"), None, None).unwrap();
        assert_eq!(names(&filter_vehicles(&fleet, &query)), vec!["Honda City"]);
    }

    #[test]
    fn test_query_matches_model_year() {
        let fleet = fixtures::vehicles();
        let query = CatalogQuery::parse(Some("2023"), None, None).unwrap();
        assert_eq!(filter_vehicles(&fleet, &query).len(), fleet.len());
    }

    #[test]
    fn test_empty_filter_keeps_catalog_order() {
        let fleet = fixtures::vehicles();
        let all = filter_vehicles(&fleet, &CatalogQuery::default());
        let ids: Vec<&str> = all.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_category_filter() {
        let fleet = fixtures::vehicles();
        let query = CatalogQuery::parse(None, Some("SUV"), None).unwrap();
        assert_eq!(
            names(&filter_vehicles(&fleet, &query)),
            vec!["Toyota Innova", "Hyundai Creta", "Mahindra XUV700"]
        );
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(PriceTier::of(1500), PriceTier::Budget);
        assert_eq!(PriceTier::of(1501), PriceTier::Mid);
        assert_eq!(PriceTier::of(2500), PriceTier::Mid);
        assert_eq!(PriceTier::of(2501), PriceTier::Premium);
    }

    #[test]
    fn test_tier_filter() {
        let fleet = fixtures::vehicles();

        let budget = CatalogQuery::parse(None, None, Some("budget")).unwrap();
        assert_eq!(names(&filter_vehicles(&fleet, &budget)), vec!["Maruti Swift"]);

        let mid = CatalogQuery::parse(None, None, Some("mid")).unwrap();
        assert_eq!(
            names(&filter_vehicles(&fleet, &mid)),
            vec!["Honda City", "Toyota Innova", "Hyundai Creta", "Tata Nexon"]
        );

        let premium = CatalogQuery::parse(None, None, Some("premium")).unwrap();
        assert_eq!(names(&filter_vehicles(&fleet, &premium)), vec!["Mahindra XUV700"]);
    }

    #[test]
    fn test_filters_compose() {
        let fleet = fixtures::vehicles();
        let query = CatalogQuery::parse(Some("a"), Some("suv"), Some("mid")).unwrap();
        assert_eq!(
            names(&filter_vehicles(&fleet, &query)),
            vec!["Toyota Innova", "Hyundai Creta"]
        );
    }

    #[test]
    fn test_unknown_filter_values_are_rejected() {
        assert!(CatalogQuery::parse(None, Some("truck"), None).is_err());
        assert!(CatalogQuery::parse(None, None, Some("luxury")).is_err());
    }
}
