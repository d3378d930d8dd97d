use chrono::{DateTime, Utc};
use shared::types::{ConferencingConnectionId, ConferencingProvider, HostId};
use sqlx::PgPool;

use crate::models::{ConferencingConnection, CreateConferencingConnection};

pub struct ConferencingConnectionRepository;

const COLUMNS: &str =
    "id, host_id, provider, access_token, refresh_token, token_expiry, created_at, updated_at";

impl ConferencingConnectionRepository {
    pub async fn create(
        pool: &PgPool,
        input: CreateConferencingConnection,
    ) -> Result<ConferencingConnection, sqlx::Error> {
        let id = ConferencingConnectionId::new();

        sqlx::query_as::<_, ConferencingConnection>(&format!(
            r#"
            INSERT INTO conferencing_connections (id, host_id, provider, access_token, refresh_token, token_expiry)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(input.host_id.as_uuid())
        .bind(input.provider)
        .bind(&input.access_token)
        .bind(&input.refresh_token)
        .bind(input.token_expiry)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: ConferencingConnectionId,
    ) -> Result<Option<ConferencingConnection>, sqlx::Error> {
        sqlx::query_as::<_, ConferencingConnection>(&format!(
            "SELECT {COLUMNS} FROM conferencing_connections WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_host_and_provider(
        pool: &PgPool,
        host_id: HostId,
        provider: ConferencingProvider,
    ) -> Result<Option<ConferencingConnection>, sqlx::Error> {
        sqlx::query_as::<_, ConferencingConnection>(&format!(
            "SELECT {COLUMNS} FROM conferencing_connections WHERE host_id = $1 AND provider = $2"
        ))
        .bind(host_id.as_uuid())
        .bind(provider)
        .fetch_optional(pool)
        .await
    }

    pub async fn update_tokens(
        pool: &PgPool,
        id: ConferencingConnectionId,
        access_token: &str,
        refresh_token: Option<&str>,
        token_expiry: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE conferencing_connections
            SET access_token = $2,
                refresh_token = COALESCE($3, refresh_token),
                token_expiry = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(access_token)
        .bind(refresh_token)
        .bind(token_expiry)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn delete(pool: &PgPool, id: ConferencingConnectionId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM conferencing_connections WHERE id = $1")
            .bind(id.as_uuid())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
