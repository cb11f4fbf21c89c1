//! Route definitions

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};

use crate::AppState;

mod auth;
mod booking;
mod catalog;
pub mod requests;
pub mod responses;

use responses::HealthResponse;

pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        // Auth
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signin", post(auth::sign_in))
        .route("/auth/signout", post(auth::sign_out))
        .route("/auth/verify", post(auth::verify_email))
        .route("/auth/session", get(auth::current_session))
        // Catalog
        .route("/vehicles", get(catalog::list_vehicles))
        .route("/vehicles/:id", get(catalog::get_vehicle))
        .route("/cities", get(catalog::list_cities))
        .route("/facilities", get(catalog::list_facilities))
        // Booking wizard (verified users only)
        .route("/bookings", post(booking::start))
        .route("/bookings/:session", get(booking::get).delete(booking::abandon))
        .route("/bookings/:session/locations", put(booking::set_locations))
        .route("/bookings/:session/dates", put(booking::set_dates))
        .route(
            "/bookings/:session/facilities/:facility_id",
            post(booking::toggle_facility),
        )
        .route("/bookings/:session/advance", post(booking::advance))
        .route("/bookings/:session/retreat", post(booking::retreat))
        .route("/bookings/:session/payment", post(booking::submit_payment))
        .route("/bookings/:session/confirm", post(booking::confirm))
        .route("/history", get(booking::history));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router)
        .with_state(app_state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.sessions.stats(),
    })
}
