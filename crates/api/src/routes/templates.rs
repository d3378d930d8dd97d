use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use db::{CalendarConnectionRepository, HostRepository, MeetingTemplateRepository, TemplateHostRepository, WorkingHoursRepository};
use domain::availability::{clamp_window, AvailabilityEngine, AvailabilityRules};
use serde::{Deserialize, Serialize};
use shared::types::{DurationMinutes, HostId, TemplateId, TimeSlot};
use shared::{AppError, DomainError};
use std::str::FromStr;

use crate::error::ApiResult;
use crate::metrics::Timer;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PublicTemplateResponse {
    pub id: TemplateId,
    pub host_email: String,
    pub host_timezone: String,
    pub slug: String,
    pub durations_minutes: Vec<i32>,
    pub location_type: shared::types::LocationType,
    pub requires_approval: bool,
    pub description: Option<String>,
}

/// GET /api/templates/:host_email/:template_slug
pub async fn get_template(
    State(state): State<AppState>,
    Path((host_email, template_slug)): Path<(String, String)>,
) -> ApiResult<Json<PublicTemplateResponse>> {
    let template = MeetingTemplateRepository::find_by_host_email_and_template_slug(
        &state.pool,
        &host_email,
        &template_slug,
    )
    .await?
    .ok_or_else(|| AppError::Domain(DomainError::TemplateNotFound(template_slug.clone())))?;

    if !template.is_active {
        return Err(AppError::Domain(DomainError::TemplateInactive).into());
    }

    let host = HostRepository::find_by_id(&state.pool, template.host_id)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::HostNotFound(template.host_id.to_string())))?;

    Ok(Json(PublicTemplateResponse {
        id: template.id,
        host_email: host.email,
        host_timezone: host.timezone,
        slug: template.slug,
        durations_minutes: template.durations_minutes,
        location_type: template.location_type,
        requires_approval: template.requires_approval,
        description: template.description,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration: Option<i32>,
    pub tz: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub duration_minutes: i32,
    pub slots: Vec<SlotResponse>,
}

/// GET /api/templates/:host_email/:template_slug/availability
pub async fn get_availability(
    State(state): State<AppState>,
    Path((host_email, template_slug)): Path<(String, String)>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Json<AvailabilityResponse>> {
    let timer = Timer::start();

    let template = MeetingTemplateRepository::find_by_host_email_and_template_slug(
        &state.pool,
        &host_email,
        &template_slug,
    )
    .await?
    .ok_or_else(|| AppError::Domain(DomainError::TemplateNotFound(template_slug.clone())))?;

    if !template.is_active {
        return Err(AppError::Domain(DomainError::TemplateInactive).into());
    }

    let duration_minutes = query
        .duration
        .filter(|d| template.durations_minutes.contains(d))
        .or_else(|| template.durations_minutes.first().copied())
        .unwrap_or(0);
    let duration = DurationMinutes::new(duration_minutes);

    let invitee_tz: Tz = query
        .tz
        .as_deref()
        .and_then(|tz| Tz::from_str(tz).ok())
        .unwrap_or(Tz::UTC);

    let now = Utc::now();
    let window = clamp_window(
        query.start,
        query.end,
        now,
        template.min_notice_minutes,
        template.max_schedule_days,
    );

    let rules = template
        .availability_rules
        .as_ref()
        .map(|value| AvailabilityRules::parse(value));

    let pool_hosts = TemplateHostRepository::list_by_template(&state.pool, template.id).await?;
    let required_host_ids: Vec<HostId> = pool_hosts
        .iter()
        .filter(|th| !th.is_optional)
        .map(|th| th.host_id)
        .collect();
    let required_host_ids = if required_host_ids.is_empty() {
        vec![template.host_id]
    } else {
        required_host_ids
    };

    let mut per_host_slots = Vec::with_capacity(required_host_ids.len());
    for host_id in &required_host_ids {
        let slots = single_host_slots(
            &state,
            *host_id,
            window,
            rules.as_ref(),
            duration,
            template.pre_buffer_minutes,
            template.post_buffer_minutes,
        )
        .await?;
        per_host_slots.push(slots);
    }

    let slots = if per_host_slots.len() <= 1 {
        per_host_slots.pop().unwrap_or_default()
    } else {
        AvailabilityEngine::pool_intersection(per_host_slots)
    };

    timer.record();

    // Final rendering (spec.md §4.1): convert each UTC slot into the
    // invitee's timezone before returning it.
    Ok(Json(AvailabilityResponse {
        duration_minutes,
        slots: slots
            .into_iter()
            .map(|s| SlotResponse {
                start: s.start.with_timezone(&invitee_tz).to_rfc3339(),
                end: s.end.with_timezone(&invitee_tz).to_rfc3339(),
            })
            .collect(),
    }))
}

/// Single-host slot computation (spec.md §4.1 steps 1-4): loads
/// working hours, host-local busy bookings, and external calendar busy
/// times, buffer-expands the bookings, and runs the pure engine.
async fn single_host_slots(
    state: &AppState,
    host_id: HostId,
    window: (DateTime<Utc>, DateTime<Utc>),
    rules: Option<&AvailabilityRules>,
    duration: DurationMinutes,
    pre_buffer_minutes: i32,
    post_buffer_minutes: i32,
) -> ApiResult<Vec<TimeSlot>> {
    let host = HostRepository::find_by_id(&state.pool, host_id)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::HostNotFound(host_id.to_string())))?;
    let host_tz = Tz::from_str(&host.timezone).unwrap_or(Tz::UTC);

    let rows = WorkingHoursRepository::find_by_host(&state.pool, host_id).await?;
    let working_hours: Vec<shared::types::WorkingHours> = rows
        .into_iter()
        .map(|row| shared::types::WorkingHours {
            day_of_week: row.day_of_week as u8,
            start_time: row.start_time,
            end_time: row.end_time,
            is_active: row.enabled,
        })
        .collect();

    let booking_busy = db::BookingRepository::busy_intervals_for_host(
        &state.pool,
        host_id,
        window.0,
        window.1,
    )
    .await?;
    let pre = chrono::Duration::minutes(pre_buffer_minutes as i64);
    let post = chrono::Duration::minutes(post_buffer_minutes as i64);
    let mut busy: Vec<TimeSlot> = booking_busy
        .into_iter()
        .filter_map(|slot| TimeSlot::new(slot.start - pre, slot.end + post).ok())
        .collect();

    let connections = CalendarConnectionRepository::list_by_host(&state.pool, host_id).await?;
    for conn in connections {
        let info = super::host::calendar_connections::to_connection_info(&conn);
        match state.calendar.busy_times(&info, window.0, window.1).await {
            Ok(mut external) => busy.append(&mut external),
            Err(err) => {
                // Absorbed per spec §7: the affected calendar
                // contributes no busy intervals and its sync_status
                // flips to failed with a message; the invitee still
                // sees slots computed from the remaining sources.
                tracing::warn!("calendar busy_times failed for host {host_id}: {err}");
                let message = match &err {
                    integrations::ProviderError::Auth => {
                        "Authentication failed. Please reconnect your calendar.".to_string()
                    }
                    _ => err.to_string(),
                };
                if let Err(db_err) = CalendarConnectionRepository::record_sync_result(
                    &state.pool,
                    conn.id,
                    shared::types::SyncStatus::Failed,
                    Some(&message),
                )
                .await
                {
                    tracing::warn!("failed to record sync failure for connection {}: {db_err}", conn.id);
                }
            }
        }
    }

    let busy = shared::types::merge_intervals(&busy);

    Ok(AvailabilityEngine::single_host_slots(
        window,
        host_tz,
        &working_hours,
        rules,
        duration,
        &busy,
    ))
}
