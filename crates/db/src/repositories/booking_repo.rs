use chrono::{DateTime, Utc};
use shared::types::{BookingId, BookingStatus, CancelledBy, HostId, TimeSlot};
use sqlx::PgPool;

use crate::models::{Booking, CreateBooking};

pub struct BookingRepository;

impl BookingRepository {
    /// Plain `INSERT`, no advisory lock and no pre-insert conflict
    /// check (spec.md §9 Open Question 2): the availability engine is
    /// the sole conflict-prevention mechanism, and a race between two
    /// concurrent bookings for the same slot is accepted as out of
    /// scope.
    pub async fn create(pool: &PgPool, input: CreateBooking) -> Result<Booking, sqlx::Error> {
        let id = BookingId::new();

        sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, template_id, host_id, token, status, start_utc, end_utc,
                duration_minutes, invitee_name, invitee_email, invitee_timezone,
                additional_guests, answers
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, template_id, host_id, token, status, start_utc, end_utc,
                duration_minutes, invitee_name, invitee_email, invitee_timezone,
                additional_guests, answers, conference_link, calendar_event_id,
                cancelled_by, cancel_reason, reminder_sent, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(input.template_id.as_uuid())
        .bind(input.host_id.as_uuid())
        .bind(&input.token)
        .bind(input.status)
        .bind(input.start_utc)
        .bind(input.end_utc)
        .bind(input.duration_minutes)
        .bind(&input.invitee_name)
        .bind(&input.invitee_email)
        .bind(&input.invitee_timezone)
        .bind(&input.additional_guests)
        .bind(&input.answers)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: BookingId) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, template_id, host_id, token, status, start_utc, end_utc,
                duration_minutes, invitee_name, invitee_email, invitee_timezone,
                additional_guests, answers, conference_link, calendar_event_id,
                cancelled_by, cancel_reason, reminder_sent, created_at, updated_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
    }

    /// Invitee self-service lookup (spec §6): the token is the only
    /// credential, so this is deliberately not scoped to a host or
    /// tenant.
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, template_id, host_id, token, status, start_utc, end_utc,
                duration_minutes, invitee_name, invitee_email, invitee_timezone,
                additional_guests, answers, conference_link, calendar_event_id,
                cancelled_by, cancel_reason, reminder_sent, created_at, updated_at
            FROM bookings
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_host(
        pool: &PgPool,
        host_id: HostId,
        status_filter: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        match status_filter {
            Some(status) => {
                sqlx::query_as::<_, Booking>(
                    r#"
                    SELECT id, template_id, host_id, token, status, start_utc, end_utc,
                        duration_minutes, invitee_name, invitee_email, invitee_timezone,
                        additional_guests, answers, conference_link, calendar_event_id,
                        cancelled_by, cancel_reason, reminder_sent, created_at, updated_at
                    FROM bookings
                    WHERE host_id = $1 AND status = $2
                    ORDER BY start_utc DESC
                    "#,
                )
                .bind(host_id.as_uuid())
                .bind(status)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Booking>(
                    r#"
                    SELECT id, template_id, host_id, token, status, start_utc, end_utc,
                        duration_minutes, invitee_name, invitee_email, invitee_timezone,
                        additional_guests, answers, conference_link, calendar_event_id,
                        cancelled_by, cancel_reason, reminder_sent, created_at, updated_at
                    FROM bookings
                    WHERE host_id = $1
                    ORDER BY start_utc DESC
                    "#,
                )
                .bind(host_id.as_uuid())
                .fetch_all(pool)
                .await
            }
        }
    }

    /// Busy intervals for the availability engine (spec §9 Open
    /// Question 3): `pending` counts as busy so a second invitee can't
    /// double-book a slot someone else is waiting on approval for.
    pub async fn busy_intervals_for_host(
        pool: &PgPool,
        host_id: HostId,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<TimeSlot>, sqlx::Error> {
        let rows: Vec<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT start_utc, end_utc
            FROM bookings
            WHERE host_id = $1
              AND status IN ('pending', 'confirmed')
              AND start_utc < $3
              AND end_utc > $2
            "#,
        )
        .bind(host_id.as_uuid())
        .bind(window_start)
        .bind(window_end)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(start, end)| TimeSlot::new(start, end).ok())
            .collect())
    }

    pub async fn set_status(
        pool: &PgPool,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, template_id, host_id, token, status, start_utc, end_utc,
                duration_minutes, invitee_name, invitee_email, invitee_timezone,
                additional_guests, answers, conference_link, calendar_event_id,
                cancelled_by, cancel_reason, reminder_sent, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    pub async fn cancel(
        pool: &PgPool,
        id: BookingId,
        cancelled_by: CancelledBy,
        reason: Option<&str>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'cancelled', cancelled_by = $2, cancel_reason = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, template_id, host_id, token, status, start_utc, end_utc,
                duration_minutes, invitee_name, invitee_email, invitee_timezone,
                additional_guests, answers, conference_link, calendar_event_id,
                cancelled_by, cancel_reason, reminder_sent, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(cancelled_by)
        .bind(reason)
        .fetch_optional(pool)
        .await
    }

    /// Host-only rejection of a pending booking (spec.md §4.3): unlike
    /// `cancel`, the terminal status is `rejected`, not `cancelled`.
    pub async fn reject(
        pool: &PgPool,
        id: BookingId,
        reason: Option<&str>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'rejected', cancelled_by = 'host', cancel_reason = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, template_id, host_id, token, status, start_utc, end_utc,
                duration_minutes, invitee_name, invitee_email, invitee_timezone,
                additional_guests, answers, conference_link, calendar_event_id,
                cancelled_by, cancel_reason, reminder_sent, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(reason)
        .fetch_optional(pool)
        .await
    }

    pub async fn reschedule(
        pool: &PgPool,
        id: BookingId,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET start_utc = $2, end_utc = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, template_id, host_id, token, status, start_utc, end_utc,
                duration_minutes, invitee_name, invitee_email, invitee_timezone,
                additional_guests, answers, conference_link, calendar_event_id,
                cancelled_by, cancel_reason, reminder_sent, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(new_start)
        .bind(new_end)
        .fetch_optional(pool)
        .await
    }

    pub async fn set_conference_link(
        pool: &PgPool,
        id: BookingId,
        conference_link: Option<&str>,
        calendar_event_id: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE bookings
            SET conference_link = $2, calendar_event_id = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(conference_link)
        .bind(calendar_event_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn count_pending(pool: &PgPool, host_id: HostId) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM bookings WHERE host_id = $1 AND status = 'pending'",
        )
        .bind(host_id.as_uuid())
        .fetch_one(pool)
        .await?;
        Ok(result.0)
    }

    /// Candidates for the reminder loop (spec §4.7): confirmed,
    /// not yet reminded, starting 23-25 hours from now.
    pub async fn find_due_for_reminder(
        pool: &PgPool,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, template_id, host_id, token, status, start_utc, end_utc,
                duration_minutes, invitee_name, invitee_email, invitee_timezone,
                additional_guests, answers, conference_link, calendar_event_id,
                cancelled_by, cancel_reason, reminder_sent, created_at, updated_at
            FROM bookings
            WHERE status = 'confirmed'
              AND reminder_sent = false
              AND start_utc >= $1
              AND start_utc < $2
            "#,
        )
        .bind(window_start)
        .bind(window_end)
        .fetch_all(pool)
        .await
    }

    /// Sets the idempotent flag so the next tick doesn't re-send.
    pub async fn mark_reminder_sent(pool: &PgPool, id: BookingId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE bookings SET reminder_sent = true WHERE id = $1")
            .bind(id.as_uuid())
            .execute(pool)
            .await?;
        Ok(())
    }
}
