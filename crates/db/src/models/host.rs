use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::types::{CalendarConnectionId, HostId, TenantId};
use sqlx::FromRow;

/// A host is the person whose availability is being scheduled against
/// (spec §3). `timezone` is an IANA name (e.g. `"America/New_York"`),
/// parsed into a `chrono_tz::Tz` by the availability engine caller.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Host {
    pub id: HostId,
    pub tenant_id: TenantId,
    pub email: String,
    pub timezone: String,
    pub default_calendar_id: Option<CalendarConnectionId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateHost {
    pub tenant_id: TenantId,
    pub email: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateHost {
    pub timezone: Option<String>,
    pub default_calendar_id: Option<CalendarConnectionId>,
}
