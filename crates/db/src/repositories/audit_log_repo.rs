use shared::types::{AuditLogId, TenantId};
use sqlx::PgPool;

use crate::models::{AuditLog, CreateAuditLog};

pub struct AuditLogRepository;

impl AuditLogRepository {
    /// Append-only write. Callers are expected to log and swallow the
    /// error rather than fail the surrounding operation (spec.md §3:
    /// "write failures are logged but never block the caller").
    pub async fn create(pool: &PgPool, input: CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let id = AuditLogId::new();

        sqlx::query_as::<_, AuditLog>(
            r#"
            INSERT INTO audit_logs (id, tenant_id, host_id, action, entity_type, entity_id, details, ip)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, tenant_id, host_id, action, entity_type, entity_id, details, ip, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(input.tenant_id.as_uuid())
        .bind(input.host_id.map(|id| *id.as_uuid()))
        .bind(&input.action)
        .bind(&input.entity_type)
        .bind(&input.entity_id)
        .bind(&input.details)
        .bind(&input.ip)
        .fetch_one(pool)
        .await
    }

    pub async fn list_by_tenant(
        pool: &PgPool,
        tenant_id: TenantId,
        limit: i64,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT id, tenant_id, host_id, action, entity_type, entity_id, details, ip, created_at
            FROM audit_logs
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
