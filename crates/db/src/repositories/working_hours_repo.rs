use chrono::NaiveTime;
use shared::types::{HostId, WorkingHoursId};
use sqlx::PgPool;

use crate::models::{CreateWorkingHours, UpdateWorkingHours, WorkingHours};

pub struct WorkingHoursRepository;

impl WorkingHoursRepository {
    pub async fn create(
        pool: &PgPool,
        input: CreateWorkingHours,
    ) -> Result<WorkingHours, sqlx::Error> {
        let id = WorkingHoursId::new();

        sqlx::query_as::<_, WorkingHours>(
            r#"
            INSERT INTO working_hours (id, host_id, day_of_week, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, host_id, day_of_week, start_time, end_time, enabled
            "#,
        )
        .bind(id.as_uuid())
        .bind(input.host_id.as_uuid())
        .bind(input.day_of_week)
        .bind(input.start_time)
        .bind(input.end_time)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: WorkingHoursId,
    ) -> Result<Option<WorkingHours>, sqlx::Error> {
        sqlx::query_as::<_, WorkingHours>(
            "SELECT id, host_id, day_of_week, start_time, end_time, enabled FROM working_hours WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
    }

    /// All rows for a host, ordered by day, for the availability engine
    /// to consume directly as `&[shared::types::WorkingHours]`-shaped input.
    pub async fn find_by_host(
        pool: &PgPool,
        host_id: HostId,
    ) -> Result<Vec<WorkingHours>, sqlx::Error> {
        sqlx::query_as::<_, WorkingHours>(
            r#"
            SELECT id, host_id, day_of_week, start_time, end_time, enabled
            FROM working_hours
            WHERE host_id = $1
            ORDER BY day_of_week
            "#,
        )
        .bind(host_id.as_uuid())
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: WorkingHoursId,
        input: UpdateWorkingHours,
    ) -> Result<Option<WorkingHours>, sqlx::Error> {
        sqlx::query_as::<_, WorkingHours>(
            r#"
            UPDATE working_hours
            SET
                start_time = COALESCE($2, start_time),
                end_time = COALESCE($3, end_time),
                enabled = COALESCE($4, enabled)
            WHERE id = $1
            RETURNING id, host_id, day_of_week, start_time, end_time, enabled
            "#,
        )
        .bind(id.as_uuid())
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.enabled)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: WorkingHoursId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM working_hours WHERE id = $1")
            .bind(id.as_uuid())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replaces a host's entire weekly schedule in one transaction:
    /// multiple rows per day are permitted and form a union (spec.md
    /// §3), so there is no natural per-day conflict key to upsert on.
    pub async fn replace_schedule(
        pool: &PgPool,
        host_id: HostId,
        rows: Vec<CreateWorkingHours>,
    ) -> Result<Vec<WorkingHours>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM working_hours WHERE host_id = $1")
            .bind(host_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let id = WorkingHoursId::new();
            let inserted = sqlx::query_as::<_, WorkingHours>(
                r#"
                INSERT INTO working_hours (id, host_id, day_of_week, start_time, end_time)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, host_id, day_of_week, start_time, end_time, enabled
                "#,
            )
            .bind(id.as_uuid())
            .bind(host_id.as_uuid())
            .bind(row.day_of_week)
            .bind(row.start_time)
            .bind(row.end_time)
            .fetch_one(&mut *tx)
            .await?;
            out.push(inserted);
        }

        tx.commit().await?;
        Ok(out)
    }
}
