use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::types::{SignupConversionId, TenantId};
use sqlx::FromRow;

/// Write-only analytics-adjacent record of a tenant signup's referral
/// source (spec §6). Never read back by the kernel itself.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SignupConversion {
    pub id: SignupConversionId,
    pub tenant_id: TenantId,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSignupConversion {
    pub tenant_id: TenantId,
    pub source: String,
}
