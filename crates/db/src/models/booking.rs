use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::types::{BookingId, BookingStatus, CancelledBy, HostId, TemplateId};
use sqlx::FromRow;

/// A scheduled meeting between a host and an invitee (spec §3). `token`
/// is the 64-hex-char opaque lookup/cancel/reschedule credential handed
/// to the invitee; it is never a database primary key lookup surface
/// for anyone else.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub template_id: TemplateId,
    pub host_id: HostId,
    pub token: String,
    pub status: BookingStatus,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub duration_minutes: i32,
    pub invitee_name: String,
    pub invitee_email: String,
    pub invitee_timezone: String,
    pub additional_guests: Vec<String>,
    pub answers: Option<serde_json::Value>,
    pub conference_link: Option<String>,
    pub calendar_event_id: Option<String>,
    pub cancelled_by: Option<CancelledBy>,
    pub cancel_reason: Option<String>,
    pub reminder_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub template_id: TemplateId,
    pub host_id: HostId,
    pub token: String,
    pub status: BookingStatus,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub duration_minutes: i32,
    pub invitee_name: String,
    pub invitee_email: String,
    pub invitee_timezone: String,
    pub additional_guests: Vec<String>,
    pub answers: Option<serde_json::Value>,
}
