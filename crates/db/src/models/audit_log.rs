use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::types::{AuditLogId, HostId, TenantId};
use sqlx::FromRow;

/// Append-only record of a state-changing action (spec §3).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: AuditLogId,
    pub tenant_id: TenantId,
    pub host_id: Option<HostId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub details: Option<serde_json::Value>,
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuditLog {
    pub tenant_id: TenantId,
    pub host_id: Option<HostId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub details: Option<serde_json::Value>,
    pub ip: Option<String>,
}
