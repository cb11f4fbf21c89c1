//! Vehicle catalog.
//!
//! The wizard only sees the catalog through [`CatalogProvider`], so the
//! compiled-in [`StaticCatalog`] can be swapped for a real backing store.

pub mod filter;
pub mod fixtures;
pub mod models;

pub use filter::{filter_vehicles, CatalogQuery, PriceTier};
pub use models::{AddOnFacility, City, UnknownFilterValue, Vehicle, VehicleCategory};

/// Read-only access to catalog reference data
pub trait CatalogProvider: Send + Sync {
    /// Vehicles in catalog order
    fn list_vehicles(&self) -> &[Vehicle];

    /// Cities in catalog order
    fn list_cities(&self) -> &[City];

    /// Optional add-ons in catalog order
    fn list_add_on_facilities(&self) -> &[AddOnFacility];

    fn get_vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.list_vehicles().iter().find(|v| v.id == id)
    }

    fn get_add_on_facility(&self, id: &str) -> Option<&AddOnFacility> {
        self.list_add_on_facilities().iter().find(|f| f.id == id)
    }
}

/// Catalog held entirely in memory
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    vehicles: Vec<Vehicle>,
    cities: Vec<City>,
    add_ons: Vec<AddOnFacility>,
}

impl StaticCatalog {
    pub fn new(vehicles: Vec<Vehicle>, cities: Vec<City>, add_ons: Vec<AddOnFacility>) -> Self {
        Self {
            vehicles,
            cities,
            add_ons,
        }
    }

    /// Catalog seeded with the storefront fleet
    pub fn with_fixtures() -> Self {
        Self::new(
            fixtures::vehicles(),
            fixtures::cities(),
            fixtures::add_on_facilities(),
        )
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::with_fixtures()
    }
}

impl CatalogProvider for StaticCatalog {
    fn list_vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    fn list_cities(&self) -> &[City] {
        &self.cities
    }

    fn list_add_on_facilities(&self) -> &[AddOnFacility] {
        &self.add_ons
    }
}
