use shared::types::{HostId, TemplateId};
use sqlx::PgPool;

use crate::models::{CreateMeetingTemplate, MeetingTemplate, UpdateMeetingTemplate};

pub struct MeetingTemplateRepository;

const COLUMNS: &str = "id, host_id, slug, durations_minutes, location_type, custom_location, \
    calendar_id, requires_approval, min_notice_minutes, max_schedule_days, pre_buffer_minutes, \
    post_buffer_minutes, availability_rules, is_active, is_private, description, created_at, updated_at";

impl MeetingTemplateRepository {
    pub async fn create(
        pool: &PgPool,
        input: CreateMeetingTemplate,
    ) -> Result<MeetingTemplate, sqlx::Error> {
        let id = TemplateId::new();

        sqlx::query_as::<_, MeetingTemplate>(&format!(
            r#"
            INSERT INTO meeting_templates (
                id, host_id, slug, durations_minutes, location_type, custom_location,
                calendar_id, requires_approval, min_notice_minutes, max_schedule_days,
                pre_buffer_minutes, post_buffer_minutes, availability_rules, is_active,
                is_private, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, true, $14, $15)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(input.host_id.as_uuid())
        .bind(&input.slug)
        .bind(&input.durations_minutes)
        .bind(input.location_type)
        .bind(&input.custom_location)
        .bind(input.calendar_id.map(|id| *id.as_uuid()))
        .bind(input.requires_approval)
        .bind(input.min_notice_minutes)
        .bind(input.max_schedule_days)
        .bind(input.pre_buffer_minutes)
        .bind(input.post_buffer_minutes)
        .bind(&input.availability_rules)
        .bind(input.is_private)
        .bind(&input.description)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: TemplateId,
    ) -> Result<Option<MeetingTemplate>, sqlx::Error> {
        sqlx::query_as::<_, MeetingTemplate>(&format!(
            "SELECT {COLUMNS} FROM meeting_templates WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
    }

    /// Public template lookup for invitee-facing booking pages (spec
    /// §6.1): hosts have no slug of their own (spec.md §3), so the
    /// public path addresses the host by its unique email instead of
    /// an internal id.
    pub async fn find_by_host_email_and_template_slug(
        pool: &PgPool,
        host_email: &str,
        template_slug: &str,
    ) -> Result<Option<MeetingTemplate>, sqlx::Error> {
        sqlx::query_as::<_, MeetingTemplate>(&format!(
            r#"
            SELECT mt.id, mt.host_id, mt.slug, mt.durations_minutes, mt.location_type,
                mt.custom_location, mt.calendar_id, mt.requires_approval, mt.min_notice_minutes,
                mt.max_schedule_days, mt.pre_buffer_minutes, mt.post_buffer_minutes,
                mt.availability_rules, mt.is_active, mt.is_private, mt.description,
                mt.created_at, mt.updated_at
            FROM meeting_templates mt
            JOIN hosts h ON h.id = mt.host_id
            WHERE h.email = $1 AND mt.slug = $2
            "#
        ))
        .bind(host_email)
        .bind(template_slug)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_host(
        pool: &PgPool,
        host_id: HostId,
    ) -> Result<Vec<MeetingTemplate>, sqlx::Error> {
        sqlx::query_as::<_, MeetingTemplate>(&format!(
            "SELECT {COLUMNS} FROM meeting_templates WHERE host_id = $1 ORDER BY created_at"
        ))
        .bind(host_id.as_uuid())
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: TemplateId,
        input: UpdateMeetingTemplate,
    ) -> Result<Option<MeetingTemplate>, sqlx::Error> {
        sqlx::query_as::<_, MeetingTemplate>(&format!(
            r#"
            UPDATE meeting_templates
            SET
                durations_minutes = COALESCE($2, durations_minutes),
                location_type = COALESCE($3, location_type),
                custom_location = COALESCE($4, custom_location),
                calendar_id = COALESCE($5, calendar_id),
                requires_approval = COALESCE($6, requires_approval),
                min_notice_minutes = COALESCE($7, min_notice_minutes),
                max_schedule_days = COALESCE($8, max_schedule_days),
                pre_buffer_minutes = COALESCE($9, pre_buffer_minutes),
                post_buffer_minutes = COALESCE($10, post_buffer_minutes),
                availability_rules = COALESCE($11, availability_rules),
                is_active = COALESCE($12, is_active),
                is_private = COALESCE($13, is_private),
                description = COALESCE($14, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(input.durations_minutes)
        .bind(input.location_type)
        .bind(input.custom_location)
        .bind(input.calendar_id.map(|id| *id.as_uuid()))
        .bind(input.requires_approval)
        .bind(input.min_notice_minutes)
        .bind(input.max_schedule_days)
        .bind(input.pre_buffer_minutes)
        .bind(input.post_buffer_minutes)
        .bind(input.availability_rules)
        .bind(input.is_active)
        .bind(input.is_private)
        .bind(input.description)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: TemplateId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM meeting_templates WHERE id = $1")
            .bind(id.as_uuid())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
