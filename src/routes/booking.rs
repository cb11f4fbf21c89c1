//! Booking wizard route handlers
//!
//! Each wizard session is owned by the user that opened it; other users get
//! the same 404 as for an unknown session.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth_middleware::VerifiedUser;
use crate::booking::{BookingRecord, BookingSession, PaymentDetails};
use crate::error::{AppError, Result};
use crate::AppState;

use super::requests::{DatesRequest, LocationsRequest, StartBookingRequest};
use super::responses::{BookingView, HistoryEntry};

async fn owned_session(
    state: &AppState,
    id: Uuid,
    user: &VerifiedUser,
) -> Result<Arc<BookingSession>> {
    match state.sessions.get(&id).await {
        Some(session) if session.owner() == user.user_id() => Ok(session),
        Some(_) => {
            tracing::warn!("User {} requested session {} they do not own", user.user_id(), id);
            Err(AppError::SessionNotFound)
        }
        None => Err(AppError::SessionNotFound),
    }
}

async fn view(session: &BookingSession) -> Result<Json<BookingView>> {
    let wizard = session.wizard().await;
    BookingView::from_wizard(session.id(), &wizard)
        .map(Json)
        .ok_or(AppError::SessionNotFound)
}

/// Open a wizard session for a vehicle
pub async fn start(
    State(state): State<AppState>,
    user: VerifiedUser,
    Json(req): Json<StartBookingRequest>,
) -> Result<(StatusCode, Json<BookingView>)> {
    let session = BookingSession::start(&state.services, user.user_id(), &req.vehicle_id)?;
    state.sessions.insert(session.clone()).await;
    Ok((StatusCode::CREATED, view(&session).await?))
}

pub async fn get(
    State(state): State<AppState>,
    user: VerifiedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>> {
    let session = owned_session(&state, id, &user).await?;
    view(&session).await
}

/// Abandon the draft and close the session
pub async fn abandon(
    State(state): State<AppState>,
    user: VerifiedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let session = owned_session(&state, id, &user).await?;
    session.wizard().await.abandon();
    state.sessions.remove(&id).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_locations(
    State(state): State<AppState>,
    user: VerifiedUser,
    Path(id): Path<Uuid>,
    Json(req): Json<LocationsRequest>,
) -> Result<Json<BookingView>> {
    let session = owned_session(&state, id, &user).await?;
    session
        .wizard()
        .await
        .set_locations(&req.pickup_city, &req.pickup_address, &req.drop_address)?;
    view(&session).await
}

pub async fn set_dates(
    State(state): State<AppState>,
    user: VerifiedUser,
    Path(id): Path<Uuid>,
    Json(req): Json<DatesRequest>,
) -> Result<Json<BookingView>> {
    let session = owned_session(&state, id, &user).await?;
    session
        .wizard()
        .await
        .set_date_range(req.start_date, req.end_date)?;
    view(&session).await
}

pub async fn toggle_facility(
    State(state): State<AppState>,
    user: VerifiedUser,
    Path((id, facility_id)): Path<(Uuid, String)>,
) -> Result<Json<BookingView>> {
    let session = owned_session(&state, id, &user).await?;
    session.wizard().await.toggle_facility(&facility_id)?;
    view(&session).await
}

pub async fn advance(
    State(state): State<AppState>,
    user: VerifiedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>> {
    let session = owned_session(&state, id, &user).await?;
    session.wizard().await.advance()?;
    view(&session).await
}

pub async fn retreat(
    State(state): State<AppState>,
    user: VerifiedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>> {
    let session = owned_session(&state, id, &user).await?;
    session.wizard().await.retreat()?;
    view(&session).await
}

/// Pay for the draft; returns the confirmed booking
pub async fn submit_payment(
    State(state): State<AppState>,
    user: VerifiedUser,
    Path(id): Path<Uuid>,
    Json(details): Json<PaymentDetails>,
) -> Result<Json<BookingRecord>> {
    let session = owned_session(&state, id, &user).await?;
    let record = session.submit_payment(details).await?;
    Ok(Json(record))
}

/// Retry delivery of a confirmed booking whose first save failed
pub async fn confirm(
    State(state): State<AppState>,
    user: VerifiedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingRecord>> {
    let session = owned_session(&state, id, &user).await?;
    let record = session.confirm().await?;
    Ok(Json(record))
}

/// The caller's bookings, newest first
pub async fn history(
    State(state): State<AppState>,
    user: VerifiedUser,
) -> Json<Vec<HistoryEntry>> {
    let today = Utc::now().date_naive();
    let entries = state
        .bookings
        .list_for_user(user.user_id())
        .await
        .into_iter()
        .map(|record| HistoryEntry::new(record, today))
        .collect();
    Json(entries)
}
