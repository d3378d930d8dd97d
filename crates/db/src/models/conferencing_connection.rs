use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::types::{ConferencingConnectionId, ConferencingProvider, HostId};
use sqlx::FromRow;

/// A host's OAuth link to a conferencing provider (spec §3, §4.4).
/// Google Meet has no row here: its link is produced as a calendar
/// event side-effect, not a standalone connection.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ConferencingConnection {
    pub id: ConferencingConnectionId,
    pub host_id: HostId,
    pub provider: ConferencingProvider,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConferencingConnection {
    pub host_id: HostId,
    pub provider: ConferencingProvider,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<DateTime<Utc>>,
}
