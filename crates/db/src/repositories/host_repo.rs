use shared::types::{HostId, TenantId};
use sqlx::PgPool;

use crate::models::{CreateHost, Host, UpdateHost};

pub struct HostRepository;

impl HostRepository {
    pub async fn create(pool: &PgPool, input: CreateHost) -> Result<Host, sqlx::Error> {
        let id = HostId::new();

        sqlx::query_as::<_, Host>(
            r#"
            INSERT INTO hosts (id, tenant_id, email, timezone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, tenant_id, email, timezone, default_calendar_id, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(input.tenant_id.as_uuid())
        .bind(&input.email)
        .bind(&input.timezone)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: HostId) -> Result<Option<Host>, sqlx::Error> {
        sqlx::query_as::<_, Host>(
            r#"
            SELECT id, tenant_id, email, timezone, default_calendar_id, created_at, updated_at
            FROM hosts
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_tenant_and_email(
        pool: &PgPool,
        tenant_id: TenantId,
        email: &str,
    ) -> Result<Option<Host>, sqlx::Error> {
        sqlx::query_as::<_, Host>(
            r#"
            SELECT id, tenant_id, email, timezone, default_calendar_id, created_at, updated_at
            FROM hosts
            WHERE tenant_id = $1 AND email = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_tenant(pool: &PgPool, tenant_id: TenantId) -> Result<Vec<Host>, sqlx::Error> {
        sqlx::query_as::<_, Host>(
            r#"
            SELECT id, tenant_id, email, timezone, default_calendar_id, created_at, updated_at
            FROM hosts
            WHERE tenant_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: HostId,
        input: UpdateHost,
    ) -> Result<Option<Host>, sqlx::Error> {
        sqlx::query_as::<_, Host>(
            r#"
            UPDATE hosts
            SET
                timezone = COALESCE($2, timezone),
                default_calendar_id = COALESCE($3, default_calendar_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, tenant_id, email, timezone, default_calendar_id, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(&input.timezone)
        .bind(input.default_calendar_id.map(|id| *id.as_uuid()))
        .fetch_optional(pool)
        .await
    }
}
