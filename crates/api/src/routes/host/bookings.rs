use axum::{
    extract::{Path, Query, State},
    Json,
};
use db::{Booking, BookingRepository, HostRepository, MeetingTemplateRepository};
use domain::booking::{validate_approve, validate_cancel, validate_reject};
use serde::Deserialize;
use shared::types::{BookingId, BookingStatus, CancelledBy};
use shared::{AppError, DomainError};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::metrics::record_cancellation;
use crate::routes::bookings::{
    audit, best_effort_delete_remote_event, materialize_booking, notify_booking_cancelled,
    notify_booking_rejected,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<BookingStatus>,
}

/// GET /api/host/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListBookingsQuery>,
) -> ApiResult<Json<Vec<Booking>>> {
    let bookings = BookingRepository::list_by_host(&state.pool, session.host_id, query.status).await?;
    Ok(Json(bookings))
}

async fn load_owned_booking(state: &AppState, session: &Session, id: &str) -> ApiResult<Booking> {
    let id: BookingId = id
        .parse()
        .map_err(|_| AppError::InvalidInput("invalid booking id".into()))?;
    let booking = BookingRepository::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::BookingNotFound(id.to_string())))?;
    if booking.host_id != session.host_id {
        return Err(AppError::Unauthorized.into());
    }
    Ok(booking)
}

/// POST /api/host/bookings/:id/approve
pub async fn approve_booking(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<Booking>> {
    let booking = load_owned_booking(&state, &session, &id).await?;
    let new_status = validate_approve(booking.status)
        .map_err(|_| AppError::Domain(DomainError::BookingNotPending))?;

    let updated = BookingRepository::set_status(&state.pool, booking.id, new_status)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::BookingNotFound(booking.id.to_string())))?;

    let template = MeetingTemplateRepository::find_by_id(&state.pool, updated.template_id)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::TemplateNotFound(updated.template_id.to_string())))?;

    let host = HostRepository::find_by_id(&state.pool, session.host_id).await?;
    if let Some(host) = &host {
        audit(&state, host.tenant_id, Some(host.id), "booking.approved", &updated.id.to_string()).await;
    }

    let updated = materialize_booking(&state, updated, &template).await?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

/// POST /api/host/bookings/:id/reject
pub async fn reject_booking(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<RejectRequest>,
) -> ApiResult<Json<Booking>> {
    let booking = load_owned_booking(&state, &session, &id).await?;
    validate_reject(booking.status).map_err(|_| AppError::Domain(DomainError::BookingNotPending))?;

    let updated = BookingRepository::reject(&state.pool, booking.id, body.reason.as_deref())
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::BookingNotFound(booking.id.to_string())))?;

    let host = HostRepository::find_by_id(&state.pool, session.host_id).await?;
    if let Some(host) = &host {
        audit(&state, host.tenant_id, Some(host.id), "booking.rejected", &updated.id.to_string()).await;
    }
    notify_booking_rejected(&state, &updated).await;

    Ok(Json(updated))
}

#[derive(Debug, Deserialize, Default)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

/// POST /api/host/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<CancelRequest>,
) -> ApiResult<Json<Booking>> {
    let booking = load_owned_booking(&state, &session, &id).await?;
    validate_cancel(booking.status).map_err(|_| AppError::Domain(DomainError::BookingAlreadyCancelled))?;

    if let Some(event_id) = &booking.calendar_event_id {
        let template = MeetingTemplateRepository::find_by_id(&state.pool, booking.template_id).await?;
        best_effort_delete_remote_event(&state, booking.host_id, template.and_then(|t| t.calendar_id), event_id)
            .await;
    }

    let updated = BookingRepository::cancel(
        &state.pool,
        booking.id,
        CancelledBy::Host,
        body.reason.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::Domain(DomainError::BookingNotFound(booking.id.to_string())))?;

    let host = HostRepository::find_by_id(&state.pool, session.host_id).await?;
    if let Some(host) = &host {
        record_cancellation(&host.tenant_id.to_string());
        audit(&state, host.tenant_id, Some(host.id), "booking.cancelled", &updated.id.to_string()).await;
    }
    notify_booking_cancelled(&state, &updated, &updated.invitee_email).await;

    Ok(Json(updated))
}
