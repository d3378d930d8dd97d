use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::types::{CalendarConnectionId, CalendarProvider, HostId, SyncStatus};
use sqlx::FromRow;

/// A host's link to an external calendar, either OAuth (Google) or
/// Basic-auth CalDAV/iCloud (spec §3, §4.4).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CalendarConnection {
    pub id: CalendarConnectionId,
    pub host_id: HostId,
    pub provider: CalendarProvider,
    pub calendar_id: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<DateTime<Utc>>,
    pub caldav_url: Option<String>,
    pub caldav_username: Option<String>,
    pub caldav_password: Option<String>,
    pub is_default: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub sync_status: SyncStatus,
    pub sync_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCalendarConnection {
    pub host_id: HostId,
    pub provider: CalendarProvider,
    pub calendar_id: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<DateTime<Utc>>,
    pub caldav_url: Option<String>,
    pub caldav_username: Option<String>,
    pub caldav_password: Option<String>,
    pub is_default: bool,
}
