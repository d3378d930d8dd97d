use shared::types::TenantId;
use sqlx::PgPool;

use crate::models::{CreateTenant, Tenant};

pub struct TenantRepository;

impl TenantRepository {
    pub async fn create(pool: &PgPool, input: CreateTenant) -> Result<Tenant, sqlx::Error> {
        let id = TenantId::new();

        sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (id, slug)
            VALUES ($1, $2)
            RETURNING id, slug, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(&input.slug)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: TenantId) -> Result<Option<Tenant>, sqlx::Error> {
        sqlx::query_as::<_, Tenant>("SELECT id, slug, created_at FROM tenants WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tenant>, sqlx::Error> {
        sqlx::query_as::<_, Tenant>("SELECT id, slug, created_at FROM tenants WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await
    }
}
