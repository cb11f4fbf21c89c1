//! Catalog route handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::booking::BookingError;
use crate::catalog::{filter_vehicles, AddOnFacility, CatalogQuery, City, Vehicle};
use crate::error::Result;
use crate::AppState;

use super::requests::VehicleQuery;

/// Browse vehicles, optionally filtered by text, category and price tier
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(params): Query<VehicleQuery>,
) -> Result<Json<Vec<Vehicle>>> {
    let query = CatalogQuery::parse(
        params.q.as_deref(),
        params.category.as_deref(),
        params.tier.as_deref(),
    )?;
    let vehicles = filter_vehicles(state.catalog.list_vehicles(), &query)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    tracing::debug!("Catalog query {:?} matched {} vehicles", query, vehicles.len());
    Ok(Json(vehicles))
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>> {
    let vehicle = state
        .catalog
        .get_vehicle(&id)
        .cloned()
        .ok_or_else(|| BookingError::vehicle_not_found(&id))?;
    Ok(Json(vehicle))
}

pub async fn list_cities(State(state): State<AppState>) -> Json<Vec<City>> {
    Json(state.catalog.list_cities().to_vec())
}

pub async fn list_facilities(State(state): State<AppState>) -> Json<Vec<AddOnFacility>> {
    Json(state.catalog.list_add_on_facilities().to_vec())
}
