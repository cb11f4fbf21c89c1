//! Car rental storefront: vehicle catalog, pricing and the booking wizard,
//! served as a JSON API.

pub mod auth_middleware;
pub mod booking;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod pricing;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::booking::{BookingServices, InMemoryBookingStore, PaymentGateway, SimulatedGateway};
use crate::cache::SessionCache;
use crate::catalog::{CatalogProvider, StaticCatalog};
use crate::config::Config;
use crate::identity::{IdentityProvider, InMemoryIdentityProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub identity: Arc<dyn IdentityProvider>,
    /// Finalized bookings; also the sink wizard sessions deliver to
    pub bookings: Arc<InMemoryBookingStore>,
    pub services: BookingServices,
    pub sessions: SessionCache,
}

impl AppState {
    /// State backed by the in-memory catalog, identity provider, simulated
    /// gateway and booking store
    pub fn new(config: &Config) -> Self {
        Self::from_parts(
            Arc::new(StaticCatalog::with_fixtures()),
            Arc::new(InMemoryIdentityProvider::new(config.auto_verify_signups)),
            Arc::new(SimulatedGateway::new(config.payment_delay)),
            Arc::new(InMemoryBookingStore::new()),
            config,
        )
    }

    pub fn from_parts(
        catalog: Arc<dyn CatalogProvider>,
        identity: Arc<dyn IdentityProvider>,
        gateway: Arc<dyn PaymentGateway>,
        bookings: Arc<InMemoryBookingStore>,
        config: &Config,
    ) -> Self {
        let services = BookingServices {
            catalog: catalog.clone(),
            gateway,
            sink: bookings.clone(),
            payment_timeout: config.payment_timeout,
        };
        Self {
            catalog,
            identity,
            bookings,
            services,
            sessions: SessionCache::new(config.session_capacity, config.session_idle),
        }
    }
}

/// Build the application router with request tracing and CORS
pub fn app(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
