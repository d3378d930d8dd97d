use serde::{Deserialize, Serialize};
use sqlx::Type;

/// `BookingStatus ∈ {pending, confirmed, cancelled, rejected}` (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Rejected,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// Who cancelled or rejected a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "cancelled_by", rename_all = "snake_case")]
pub enum CancelledBy {
    Host,
    Invitee,
}

/// Template-level meeting location policy (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "location_type", rename_all = "snake_case")]
pub enum LocationType {
    None,
    GoogleMeet,
    Zoom,
    Phone,
    Custom,
}

/// Calendar provider behind a `CalendarConnection` (spec §3, §4.4).
/// `Icloud` is a CalDAV specialization distinguished only for display
/// purposes; both are driven by the same CalDAV adapter code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "calendar_provider", rename_all = "snake_case")]
pub enum CalendarProvider {
    Google,
    Caldav,
    Icloud,
}

impl CalendarProvider {
    pub fn is_caldav(&self) -> bool {
        matches!(self, CalendarProvider::Caldav | CalendarProvider::Icloud)
    }

    pub fn is_oauth(&self) -> bool {
        matches!(self, CalendarProvider::Google)
    }
}

/// Conferencing provider behind a `ConferencingConnection` (spec §3).
/// Google Meet has no standalone connection: its link is a calendar
/// event side-effect (spec §4.3), so only Zoom needs a stored
/// connection with its own OAuth tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "conferencing_provider", rename_all = "snake_case")]
pub enum ConferencingProvider {
    Zoom,
}

/// Per-connection sync health (spec §3, §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "sync_status", rename_all = "snake_case")]
pub enum SyncStatus {
    Unknown,
    Synced,
    Failed,
}

/// Role of a host within a template's pool (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "template_host_role", rename_all = "snake_case")]
pub enum TemplateHostRole {
    Owner,
    Sibling,
}
