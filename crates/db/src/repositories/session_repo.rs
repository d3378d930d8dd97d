use chrono::{DateTime, Utc};
use shared::types::HostId;
use sqlx::PgPool;

use crate::models::Session;

pub struct SessionRepository;

impl SessionRepository {
    pub async fn create(
        pool: &PgPool,
        token: &str,
        host_id: HostId,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token, host_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token, host_id, expires_at
            "#,
        )
        .bind(token)
        .bind(host_id.as_uuid())
        .bind(expires_at)
        .fetch_one(pool)
        .await
    }

    /// Looks up a session and filters out expired rows, the single
    /// query the `auth::Session` extractor runs per authenticated
    /// request.
    pub async fn find_valid(pool: &PgPool, token: &str) -> Result<Option<Session>, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            "SELECT token, host_id, expires_at FROM sessions WHERE token = $1 AND expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
