//! Catalog reference data.
//!
//! Vehicles, cities and add-on facilities are immutable once loaded and are
//! shared read-only between wizard sessions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A rentable vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    /// Model year as displayed, e.g. "2023"
    pub model: String,
    pub image_url: String,
    pub price_per_day: u64,
    /// Facilities bundled into the daily price
    pub facilities: Vec<String>,
    pub category: VehicleCategory,
    pub available: bool,
}

/// Body style used for catalog filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleCategory {
    Hatchback,
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    #[serde(rename = "Compact SUV")]
    CompactSuv,
}

impl VehicleCategory {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleCategory::Hatchback => "Hatchback",
            VehicleCategory::Sedan => "Sedan",
            VehicleCategory::Suv => "SUV",
            VehicleCategory::CompactSuv => "Compact SUV",
        }
    }

    pub fn all() -> [VehicleCategory; 4] {
        [
            VehicleCategory::Hatchback,
            VehicleCategory::Sedan,
            VehicleCategory::Suv,
            VehicleCategory::CompactSuv,
        ]
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VehicleCategory {
    type Err = UnknownFilterValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        VehicleCategory::all()
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownFilterValue(s.to_string()))
    }
}

/// A pickup city
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub region: String,
}

/// Optional paid add-on, charged once per booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddOnFacility {
    pub id: String,
    pub name: String,
    pub price: u64,
}

/// Filter value that does not name a known category or tier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter value: {0}")]
pub struct UnknownFilterValue(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parses_labels_case_insensitively() {
        assert_eq!("suv".parse::<VehicleCategory>(), Ok(VehicleCategory::Suv));
        assert_eq!(
            "Compact SUV".parse::<VehicleCategory>(),
            Ok(VehicleCategory::CompactSuv)
        );
        assert_eq!(
            " hatchback ".parse::<VehicleCategory>(),
            Ok(VehicleCategory::Hatchback)
        );
        assert!("truck".parse::<VehicleCategory>().is_err());
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&VehicleCategory::CompactSuv).unwrap();
        assert_eq!(json, "\"Compact SUV\"");
    }
}
