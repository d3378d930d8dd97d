use chrono::{DateTime, Utc};
use shared::types::{CalendarConnectionId, HostId, SyncStatus};
use sqlx::PgPool;

use crate::models::{CalendarConnection, CreateCalendarConnection};

pub struct CalendarConnectionRepository;

const COLUMNS: &str = "id, host_id, provider, calendar_id, access_token, refresh_token, \
    token_expiry, caldav_url, caldav_username, caldav_password, is_default, last_synced_at, \
    sync_status, sync_error, created_at, updated_at";

impl CalendarConnectionRepository {
    pub async fn create(
        pool: &PgPool,
        input: CreateCalendarConnection,
    ) -> Result<CalendarConnection, sqlx::Error> {
        let id = CalendarConnectionId::new();

        sqlx::query_as::<_, CalendarConnection>(&format!(
            r#"
            INSERT INTO calendar_connections (
                id, host_id, provider, calendar_id, access_token, refresh_token,
                token_expiry, caldav_url, caldav_username, caldav_password, is_default,
                sync_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'unknown')
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(input.host_id.as_uuid())
        .bind(input.provider)
        .bind(&input.calendar_id)
        .bind(&input.access_token)
        .bind(&input.refresh_token)
        .bind(input.token_expiry)
        .bind(&input.caldav_url)
        .bind(&input.caldav_username)
        .bind(&input.caldav_password)
        .bind(input.is_default)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: CalendarConnectionId,
    ) -> Result<Option<CalendarConnection>, sqlx::Error> {
        sqlx::query_as::<_, CalendarConnection>(&format!(
            "SELECT {COLUMNS} FROM calendar_connections WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_host(
        pool: &PgPool,
        host_id: HostId,
    ) -> Result<Vec<CalendarConnection>, sqlx::Error> {
        sqlx::query_as::<_, CalendarConnection>(&format!(
            "SELECT {COLUMNS} FROM calendar_connections WHERE host_id = $1 ORDER BY created_at"
        ))
        .bind(host_id.as_uuid())
        .fetch_all(pool)
        .await
    }

    /// All connections across all hosts, for the periodic sync loop
    /// (spec §4.6) to iterate without per-host dispatch.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<CalendarConnection>, sqlx::Error> {
        sqlx::query_as::<_, CalendarConnection>(&format!("SELECT {COLUMNS} FROM calendar_connections"))
            .fetch_all(pool)
            .await
    }

    pub async fn update_tokens(
        pool: &PgPool,
        id: CalendarConnectionId,
        access_token: &str,
        refresh_token: Option<&str>,
        token_expiry: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE calendar_connections
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

    /// Records the outcome of a sync-loop probe (spec §4.6): success
    /// clears `sync_error` and stamps `last_synced_at`; failure leaves
    /// `last_synced_at` untouched and records the error message.
    pub async fn record_sync_result(
        pool: &PgPool,
        id: CalendarConnectionId,
        status: SyncStatus,
        error: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        match status {
            SyncStatus::Synced => {
                sqlx::query(
                    r#"
                    UPDATE calendar_connections
                    SET sync_status = $2, sync_error = NULL, last_synced_at = NOW(), updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(id.as_uuid())
                .bind(status)
                .execute(pool)
                .await?;
            }
            SyncStatus::Failed | SyncStatus::Unknown => {
                sqlx::query(
                    r#"
                    UPDATE calendar_connections
                    SET sync_status = $2, sync_error = $3, updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(id.as_uuid())
                .bind(status)
                .bind(error)
                .execute(pool)
                .await?;
            }
        }
        Ok(())
    }

    pub async fn delete(pool: &PgPool, id: CalendarConnectionId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calendar_connections WHERE id = $1")
            .bind(id.as_uuid())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
