use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::types::TenantId;
use sqlx::FromRow;

/// A tenant groups hosts that share a signup/branding context (spec §3).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTenant {
    pub slug: String,
}
