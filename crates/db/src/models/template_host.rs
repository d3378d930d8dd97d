use serde::{Deserialize, Serialize};
use shared::types::{HostId, TemplateHostId, TemplateHostRole, TemplateId};
use sqlx::FromRow;

/// One host's membership in a meeting template's pool (spec §3, §4.2).
/// A template with more than one row is a pooled/round-robin template;
/// `role = owner` marks the host who cannot be removed
/// (`DomainError::OwnerRemovalForbidden`).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TemplateHost {
    pub id: TemplateHostId,
    pub template_id: TemplateId,
    pub host_id: HostId,
    pub role: TemplateHostRole,
    pub is_optional: bool,
    pub display_order: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateHost {
    pub template_id: TemplateId,
    pub host_id: HostId,
    pub role: TemplateHostRole,
    pub is_optional: bool,
    pub display_order: i32,
}
