use shared::types::{HostId, TemplateHostId, TemplateId};
use sqlx::PgPool;

use crate::models::{CreateTemplateHost, TemplateHost};

pub struct TemplateHostRepository;

impl TemplateHostRepository {
    pub async fn create(
        pool: &PgPool,
        input: CreateTemplateHost,
    ) -> Result<TemplateHost, sqlx::Error> {
        let id = TemplateHostId::new();

        sqlx::query_as::<_, TemplateHost>(
            r#"
            INSERT INTO template_hosts (id, template_id, host_id, role, is_optional, display_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, template_id, host_id, role, is_optional, display_order
            "#,
        )
        .bind(id.as_uuid())
        .bind(input.template_id.as_uuid())
        .bind(input.host_id.as_uuid())
        .bind(input.role)
        .bind(input.is_optional)
        .bind(input.display_order)
        .fetch_one(pool)
        .await
    }

    /// All pool members for a template, ordered for round-robin/pool
    /// iteration (spec §4.2).
    pub async fn list_by_template(
        pool: &PgPool,
        template_id: TemplateId,
    ) -> Result<Vec<TemplateHost>, sqlx::Error> {
        sqlx::query_as::<_, TemplateHost>(
            r#"
            SELECT id, template_id, host_id, role, is_optional, display_order
            FROM template_hosts
            WHERE template_id = $1
            ORDER BY display_order
            "#,
        )
        .bind(template_id.as_uuid())
        .fetch_all(pool)
        .await
    }

    /// Removes a pool member. Callers must check `role != owner`
    /// first (`DomainError::OwnerRemovalForbidden`); this method does
    /// not re-derive that invariant from SQL.
    pub async fn delete(
        pool: &PgPool,
        template_id: TemplateId,
        host_id: HostId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM template_hosts WHERE template_id = $1 AND host_id = $2")
            .bind(template_id.as_uuid())
            .bind(host_id.as_uuid())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
