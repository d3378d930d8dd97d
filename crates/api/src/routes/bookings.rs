use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use db::{
    AuditLogRepository, Booking, BookingRepository, CalendarConnectionRepository, CreateAuditLog,
    CreateBooking, Host, HostRepository, MeetingTemplate, MeetingTemplateRepository,
};
use domain::booking::{
    compose_description, create_status, is_valid_guest_email, validate_cancel,
    validate_create_time, validate_reschedule,
};
use domain::ics::{encode_booking_ics, IcsBookingEvent};
use domain::token::generate_booking_token;
use integrations::calendar::BookingEventDetails;
use serde::Deserialize;
use shared::types::{CancelledBy, LocationType};
use shared::{AppError, DomainError};

use crate::error::ApiResult;
use crate::metrics::{record_booking_created, record_cancellation, record_conflict, record_reschedule};
use crate::routes::host::calendar_connections::to_connection_info;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub host_email: String,
    pub template_slug: String,
    pub start_utc: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub invitee_name: String,
    pub invitee_email: String,
    pub invitee_timezone: String,
    #[serde(default)]
    pub additional_guests: Vec<String>,
    pub answers: Option<serde_json::Value>,
}

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    Json(body): Json<CreateBookingRequest>,
) -> ApiResult<Json<Booking>> {
    let template = MeetingTemplateRepository::find_by_host_email_and_template_slug(
        &state.pool,
        &body.host_email,
        &body.template_slug,
    )
    .await?
    .ok_or_else(|| AppError::Domain(DomainError::TemplateNotFound(body.template_slug.clone())))?;

    if !template.is_active {
        return Err(AppError::Domain(DomainError::TemplateInactive).into());
    }

    if !is_valid_guest_email(&body.invitee_email) {
        return Err(AppError::InvalidInput("invalid invitee email".into()).into());
    }
    for guest in &body.additional_guests {
        if !is_valid_guest_email(guest) {
            return Err(AppError::InvalidInput(format!("invalid guest email: {guest}")).into());
        }
    }

    let duration_minutes = body
        .duration_minutes
        .filter(|d| template.durations_minutes.contains(d))
        .or_else(|| template.durations_minutes.first().copied())
        .ok_or_else(|| AppError::InvalidInput("template has no durations configured".into()))?;
    let end_utc = body.start_utc + chrono::Duration::minutes(duration_minutes as i64);

    let now = Utc::now();
    validate_create_time(body.start_utc, now, template.min_notice_minutes).map_err(|_| {
        AppError::Domain(DomainError::InvalidBookingTime(
            "start is before the minimum notice period".into(),
        ))
    })?;

    let overlapping = BookingRepository::busy_intervals_for_host(
        &state.pool,
        template.host_id,
        body.start_utc,
        end_utc,
    )
    .await?;
    if overlapping
        .iter()
        .any(|slot| body.start_utc < slot.end && slot.start < end_utc)
    {
        let host = HostRepository::find_by_id(&state.pool, template.host_id).await?;
        if let Some(host) = host {
            record_conflict(&host.tenant_id.to_string());
        }
        return Err(AppError::Domain(DomainError::BookingNotPending).into());
    }

    let status = create_status(template.requires_approval);
    let token = generate_booking_token();

    let booking = BookingRepository::create(
        &state.pool,
        CreateBooking {
            template_id: template.id,
            host_id: template.host_id,
            token,
            status,
            start_utc: body.start_utc,
            end_utc,
            duration_minutes,
            invitee_name: body.invitee_name,
            invitee_email: body.invitee_email,
            invitee_timezone: body.invitee_timezone,
            additional_guests: body.additional_guests,
            answers: body.answers,
        },
    )
    .await?;

    let host = HostRepository::find_by_id(&state.pool, template.host_id).await?;
    if let Some(host) = &host {
        record_booking_created(&host.tenant_id.to_string());
        audit(&state, host.tenant_id, Some(host.id), "booking.created", &booking.id.to_string()).await;
    }

    let booking = if booking.status == shared::types::BookingStatus::Confirmed {
        materialize_booking(&state, booking, &template).await?
    } else {
        if let Some(host) = &host {
            notify_booking_requested(&state, &booking, host).await;
        }
        booking
    };

    Ok(Json(booking))
}

/// GET /api/bookings/:token
pub async fn get_booking(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<Booking>> {
    let booking = BookingRepository::find_by_token(&state.pool, &token)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::BookingNotFound(token)))?;
    Ok(Json(booking))
}

/// GET /api/bookings/:token/ics — downloadable calendar invite,
/// regenerated on demand rather than stored (spec §6: the booking row
/// is the source of truth; the ICS body is a pure function of it).
pub async fn get_booking_ics(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<(axum::http::HeaderMap, String)> {
    let booking = BookingRepository::find_by_token(&state.pool, &token)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::BookingNotFound(token)))?;
    let template = MeetingTemplateRepository::find_by_id(&state.pool, booking.template_id)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::TemplateNotFound(booking.template_id.to_string())))?;

    let mut attendees = vec![booking.invitee_email.clone()];
    attendees.extend(
        booking
            .additional_guests
            .iter()
            .filter(|g| is_valid_guest_email(g))
            .cloned(),
    );

    let ics = encode_booking_ics(&IcsBookingEvent {
        booking_id: booking.id.to_string(),
        start: booking.start_utc,
        end: booking.end_utc,
        summary: format!("Meeting with {}", booking.invitee_name),
        description: compose_description(template.description.as_deref(), booking.answers.as_ref()),
        location: booking.conference_link.clone().or_else(|| template.custom_location.clone()),
        organizer_email: state.public_base_url.clone(),
        attendee_emails: attendees,
    });

    let mut headers = axum::http::HeaderMap::new();
    headers.insert(axum::http::header::CONTENT_TYPE, "text/calendar; charset=utf-8".parse().unwrap());
    Ok((headers, ics))
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

/// POST /api/bookings/:token/cancel
pub async fn cancel_booking_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(body): Json<CancelRequest>,
) -> ApiResult<Json<Booking>> {
    let booking = BookingRepository::find_by_token(&state.pool, &token)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::BookingNotFound(token)))?;

    validate_cancel(booking.status).map_err(|_| AppError::Domain(DomainError::BookingAlreadyCancelled))?;

    if let Some(event_id) = &booking.calendar_event_id {
        let template = MeetingTemplateRepository::find_by_id(&state.pool, booking.template_id).await?;
        best_effort_delete_remote_event(&state, booking.host_id, template.and_then(|t| t.calendar_id), event_id)
            .await;
    }

    let updated = BookingRepository::cancel(
        &state.pool,
        booking.id,
        CancelledBy::Invitee,
        body.reason.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::Domain(DomainError::BookingNotFound(booking.id.to_string())))?;

    let host = HostRepository::find_by_id(&state.pool, booking.host_id).await?;
    if let Some(host) = &host {
        record_cancellation(&host.tenant_id.to_string());
        audit(&state, host.tenant_id, Some(host.id), "booking.cancelled", &updated.id.to_string()).await;
        notify_booking_cancelled(&state, &updated, &host.email).await;
    }

    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    pub start_utc: DateTime<Utc>,
}

/// POST /api/bookings/:token/reschedule
pub async fn reschedule_booking_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(body): Json<RescheduleRequest>,
) -> ApiResult<Json<Booking>> {
    let booking = BookingRepository::find_by_token(&state.pool, &token)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::BookingNotFound(token)))?;

    validate_reschedule(booking.status)
        .map_err(|_| AppError::Domain(DomainError::BookingNotReschedulable))?;

    let template = MeetingTemplateRepository::find_by_id(&state.pool, booking.template_id)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::TemplateNotFound(booking.template_id.to_string())))?;

    let now = Utc::now();
    validate_create_time(body.start_utc, now, template.min_notice_minutes).map_err(|_| {
        AppError::Domain(DomainError::InvalidBookingTime(
            "start is before the minimum notice period".into(),
        ))
    })?;
    let new_end = body.start_utc + chrono::Duration::minutes(booking.duration_minutes as i64);

    if let Some(event_id) = &booking.calendar_event_id {
        best_effort_delete_remote_event(&state, booking.host_id, template.calendar_id, event_id).await;
    }
    BookingRepository::set_conference_link(&state.pool, booking.id, None, None).await?;

    let was_confirmed = booking.status == shared::types::BookingStatus::Confirmed;
    let previous_start = booking.start_utc;
    let updated = BookingRepository::reschedule(&state.pool, booking.id, body.start_utc, new_end)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::BookingNotFound(booking.id.to_string())))?;

    let host = HostRepository::find_by_id(&state.pool, booking.host_id).await?;
    if let Some(host) = &host {
        record_reschedule(&host.tenant_id.to_string());
        audit(&state, host.tenant_id, Some(host.id), "booking.rescheduled", &updated.id.to_string()).await;
        notify_booking_rescheduled(&state, &updated, host, previous_start).await;
    }

    let updated = if was_confirmed {
        materialize_booking(&state, updated, &template).await?
    } else {
        updated
    };

    Ok(Json(updated))
}

/// Materialization (spec §4.3): create a conference link and a
/// calendar event for a confirmed booking. Failures are logged but
/// never fail the surrounding request — the booking stays the source
/// of truth and the sync loop reconciles the external side.
pub(crate) async fn materialize_booking(
    state: &AppState,
    booking: Booking,
    template: &MeetingTemplate,
) -> ApiResult<Booking> {
    let mut conference_link = booking.conference_link.clone();
    let mut calendar_event_id = booking.calendar_event_id.clone();

    if conference_link.is_none() {
        if let LocationType::Zoom = template.location_type {
            if let Some(conn) = db::ConferencingConnectionRepository::find_by_host_and_provider(
                &state.pool,
                booking.host_id,
                shared::types::ConferencingProvider::Zoom,
            )
            .await?
            {
                let info = integrations::conferencing::ZoomConnectionInfo {
                    access_token: conn.access_token.clone(),
                    refresh_token: conn.refresh_token.clone(),
                    token_expiry: conn.token_expiry,
                };
                match integrations::conferencing::zoom::create_meeting(
                    &state.http,
                    &info,
                    &format!("Meeting with {}", booking.invitee_name),
                    compose_description(template.description.as_deref(), booking.answers.as_ref())
                        .as_deref(),
                    booking.start_utc,
                    booking.end_utc,
                )
                .await
                {
                    Ok(meeting) => conference_link = Some(meeting.join_url),
                    Err(err) => tracing::warn!("zoom meeting creation failed: {err}"),
                }
            }
        }
    }

    if let Some(calendar_id) = template.calendar_id {
        if let Some(conn) = CalendarConnectionRepository::find_by_id(&state.pool, calendar_id).await? {
            let mut attendees = vec![booking.invitee_email.clone()];
            attendees.extend(
                booking
                    .additional_guests
                    .iter()
                    .filter(|g| is_valid_guest_email(g))
                    .cloned(),
            );

            let description = compose_description(template.description.as_deref(), booking.answers.as_ref());
            let event = BookingEventDetails {
                summary: &format!("Meeting with {}", booking.invitee_name),
                description: description.as_deref(),
                location: template.custom_location.as_deref(),
                start: booking.start_utc,
                end: booking.end_utc,
                attendee_emails: attendees,
                want_google_meet_link: matches!(template.location_type, LocationType::GoogleMeet),
            };

            let info = to_connection_info(&conn);
            match state.calendar.create_event(&info, &event).await {
                Ok(created) => {
                    calendar_event_id = Some(created.event_id);
                    if conference_link.is_none() {
                        conference_link = created.conference_link;
                    }
                }
                Err(err) => tracing::warn!("calendar event creation failed: {err}"),
            }
        }
    }

    BookingRepository::set_conference_link(
        &state.pool,
        booking.id,
        conference_link.as_deref(),
        calendar_event_id.as_deref(),
    )
    .await?;

    let booking = Booking {
        conference_link,
        calendar_event_id,
        ..booking
    };

    if let Some(host) = HostRepository::find_by_id(&state.pool, booking.host_id).await? {
        notify_booking_confirmed(&state, &booking, template, &host).await;
    }

    Ok(booking)
}

/// Best-effort delete of a materialized event on the connection the
/// template actually targets (spec §4.3: the remote side is
/// best-effort and never blocks the local transition). Falls back to
/// every one of the host's connections when the template's
/// `calendar_id` is gone (deleted since the event was created).
pub(crate) async fn best_effort_delete_remote_event(
    state: &AppState,
    host_id: shared::types::HostId,
    calendar_id: Option<shared::types::CalendarConnectionId>,
    event_id: &str,
) {
    let target = match calendar_id {
        Some(id) => CalendarConnectionRepository::find_by_id(&state.pool, id).await.ok().flatten(),
        None => None,
    };

    let connections = match target {
        Some(conn) => vec![conn],
        None => match CalendarConnectionRepository::list_by_host(&state.pool, host_id).await {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!("failed to load calendar connections for host {host_id}: {err}");
                return;
            }
        },
    };
    for conn in connections {
        let info = to_connection_info(&conn);
        if let Err(err) = state.calendar.delete_event(&info, event_id).await {
            tracing::warn!("failed to delete remote calendar event {event_id}: {err}");
        }
    }
}

/// Dispatch through the email port (spec §6: `send(to, subject,
/// text_body, optional_ics)`), logging but never failing the
/// surrounding request on a transport error.
async fn dispatch_email(state: &AppState, to: &str, subject: &str, text_body: &str, ics: Option<&str>) {
    if let Err(err) = state.email.send(to, subject, text_body, ics).await {
        tracing::warn!("failed to send email to {to}: {err}");
    }
}

fn format_when(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!("{} to {}", start.to_rfc3339(), end.to_rfc3339())
}

/// `booking_requested` (spec §4.3): sent to the host when a booking is
/// created pending their approval.
pub(crate) async fn notify_booking_requested(state: &AppState, booking: &Booking, host: &Host) {
    dispatch_email(
        state,
        &host.email,
        "New meeting request",
        &format!(
            "{} requested a meeting with you from {}. Approve or reject it from your dashboard.",
            booking.invitee_name,
            format_when(booking.start_utc, booking.end_utc),
        ),
        None,
    )
    .await;
}

/// `booking_confirmed` (spec §4.3): sent on materialization, to the
/// invitee with an RFC-5545 ICS attachment and to the host without one.
async fn notify_booking_confirmed(state: &AppState, booking: &Booking, template: &MeetingTemplate, host: &Host) {
    let mut attendees = vec![booking.invitee_email.clone()];
    attendees.extend(
        booking
            .additional_guests
            .iter()
            .filter(|g| is_valid_guest_email(g))
            .cloned(),
    );

    let ics = encode_booking_ics(&IcsBookingEvent {
        booking_id: booking.id.to_string(),
        start: booking.start_utc,
        end: booking.end_utc,
        summary: format!("Meeting with {}", booking.invitee_name),
        description: compose_description(template.description.as_deref(), booking.answers.as_ref()),
        location: booking.conference_link.clone().or_else(|| template.custom_location.clone()),
        organizer_email: host.email.clone(),
        attendee_emails: attendees,
    });

    let body = format!("Your meeting is confirmed for {}.", format_when(booking.start_utc, booking.end_utc));

    dispatch_email(state, &booking.invitee_email, "Meeting confirmed", &body, Some(&ics)).await;
    dispatch_email(state, &host.email, "Meeting confirmed", &body, None).await;
}

/// `booking_rejected` (spec §4.3): sent to the invitee when the host
/// rejects a pending request.
pub(crate) async fn notify_booking_rejected(state: &AppState, booking: &Booking) {
    let reason_suffix = booking
        .cancel_reason
        .as_deref()
        .map(|r| format!(" Reason: {r}"))
        .unwrap_or_default();
    dispatch_email(
        state,
        &booking.invitee_email,
        "Meeting request declined",
        &format!(
            "Your meeting request for {} was declined.{reason_suffix}",
            format_when(booking.start_utc, booking.end_utc),
        ),
        None,
    )
    .await;
}

/// `booking_cancelled` (spec §4.3): sent to the counter-party of
/// whoever cancelled.
pub(crate) async fn notify_booking_cancelled(state: &AppState, booking: &Booking, counterparty_email: &str) {
    let reason_suffix = booking
        .cancel_reason
        .as_deref()
        .map(|r| format!(" Reason: {r}"))
        .unwrap_or_default();
    dispatch_email(
        state,
        counterparty_email,
        "Meeting cancelled",
        &format!(
            "The meeting scheduled for {} was cancelled.{reason_suffix}",
            format_when(booking.start_utc, booking.end_utc),
        ),
        None,
    )
    .await;
}

/// `booking_rescheduled` (spec §4.3): sent to both sides with the
/// previous start time included.
pub(crate) async fn notify_booking_rescheduled(
    state: &AppState,
    booking: &Booking,
    host: &Host,
    previous_start: DateTime<Utc>,
) {
    let body = format!(
        "The meeting originally scheduled to start at {} has moved to {}.",
        previous_start.to_rfc3339(),
        format_when(booking.start_utc, booking.end_utc),
    );
    dispatch_email(state, &booking.invitee_email, "Meeting rescheduled", &body, None).await;
    dispatch_email(state, &host.email, "Meeting rescheduled", &body, None).await;
}

pub(crate) async fn audit(
    state: &AppState,
    tenant_id: shared::types::TenantId,
    host_id: Option<shared::types::HostId>,
    action: &str,
    entity_id: &str,
) {
    let result = AuditLogRepository::create(
        &state.pool,
        CreateAuditLog {
            tenant_id,
            host_id,
            action: action.to_string(),
            entity_type: "booking".to_string(),
            entity_id: entity_id.to_string(),
            details: None,
            ip: None,
        },
    )
    .await;
    if let Err(err) = result {
        tracing::warn!("audit log write failed: {err}");
    }
}
