use axum::{
    extract::{Path, State},
    Json,
};
use db::{
    CreateMeetingTemplate, CreateTemplateHost, MeetingTemplate, MeetingTemplateRepository,
    TemplateHost, TemplateHostRepository, UpdateMeetingTemplate,
};
use serde::Deserialize;
use shared::types::{HostId, LocationType, TemplateHostRole, TemplateId};
use shared::{AppError, DomainError};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::state::AppState;

const MAX_POOL_SIZE: usize = 5;

#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub slug: String,
    pub durations_minutes: Vec<i32>,
    pub location_type: LocationType,
    pub custom_location: Option<String>,
    pub calendar_id: Option<shared::types::CalendarConnectionId>,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub min_notice_minutes: i32,
    #[serde(default = "default_max_schedule_days")]
    pub max_schedule_days: i32,
    #[serde(default)]
    pub pre_buffer_minutes: i32,
    #[serde(default)]
    pub post_buffer_minutes: i32,
    pub availability_rules: Option<serde_json::Value>,
    #[serde(default)]
    pub is_private: bool,
    pub description: Option<String>,
}

fn default_max_schedule_days() -> i32 {
    90
}

/// POST /api/host/templates
pub async fn create_template(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CreateTemplateRequest>,
) -> ApiResult<Json<MeetingTemplate>> {
    let template = MeetingTemplateRepository::create(
        &state.pool,
        CreateMeetingTemplate {
            host_id: session.host_id,
            slug: body.slug,
            durations_minutes: body.durations_minutes,
            location_type: body.location_type,
            custom_location: body.custom_location,
            calendar_id: body.calendar_id,
            requires_approval: body.requires_approval,
            min_notice_minutes: body.min_notice_minutes,
            max_schedule_days: body.max_schedule_days,
            pre_buffer_minutes: body.pre_buffer_minutes,
            post_buffer_minutes: body.post_buffer_minutes,
            availability_rules: body.availability_rules,
            is_private: body.is_private,
            description: body.description,
        },
    )
    .await?;

    TemplateHostRepository::create(
        &state.pool,
        CreateTemplateHost {
            template_id: template.id,
            host_id: session.host_id,
            role: TemplateHostRole::Owner,
            is_optional: false,
            display_order: 0,
        },
    )
    .await?;

    Ok(Json(template))
}

/// GET /api/host/templates
pub async fn list_templates(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<MeetingTemplate>>> {
    let templates = MeetingTemplateRepository::list_by_host(&state.pool, session.host_id).await?;
    Ok(Json(templates))
}

async fn load_owned_template(
    state: &AppState,
    session: &Session,
    id: &str,
) -> ApiResult<MeetingTemplate> {
    let id: TemplateId = id
        .parse()
        .map_err(|_| AppError::InvalidInput("invalid template id".into()))?;
    let template = MeetingTemplateRepository::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::TemplateNotFound(id.to_string())))?;
    if template.host_id != session.host_id {
        return Err(AppError::Unauthorized.into());
    }
    Ok(template)
}

/// GET /api/host/templates/:id
pub async fn get_template(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<MeetingTemplate>> {
    let template = load_owned_template(&state, &session, &id).await?;
    Ok(Json(template))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateTemplateRequest {
    pub durations_minutes: Option<Vec<i32>>,
    pub location_type: Option<LocationType>,
    pub custom_location: Option<String>,
    pub calendar_id: Option<shared::types::CalendarConnectionId>,
    pub requires_approval: Option<bool>,
    pub min_notice_minutes: Option<i32>,
    pub max_schedule_days: Option<i32>,
    pub pre_buffer_minutes: Option<i32>,
    pub post_buffer_minutes: Option<i32>,
    pub availability_rules: Option<serde_json::Value>,
    pub is_active: Option<bool>,
    pub is_private: Option<bool>,
    pub description: Option<String>,
}

/// PATCH /api/host/templates/:id
pub async fn update_template(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<UpdateTemplateRequest>,
) -> ApiResult<Json<MeetingTemplate>> {
    let existing = load_owned_template(&state, &session, &id).await?;

    let updated = MeetingTemplateRepository::update(
        &state.pool,
        existing.id,
        UpdateMeetingTemplate {
            durations_minutes: body.durations_minutes,
            location_type: body.location_type,
            custom_location: body.custom_location,
            calendar_id: body.calendar_id,
            requires_approval: body.requires_approval,
            min_notice_minutes: body.min_notice_minutes,
            max_schedule_days: body.max_schedule_days,
            pre_buffer_minutes: body.pre_buffer_minutes,
            post_buffer_minutes: body.post_buffer_minutes,
            availability_rules: body.availability_rules,
            is_active: body.is_active,
            is_private: body.is_private,
            description: body.description,
        },
    )
    .await?
    .ok_or_else(|| AppError::Domain(DomainError::TemplateNotFound(existing.id.to_string())))?;

    Ok(Json(updated))
}

/// DELETE /api/host/templates/:id — soft-deactivates rather than
/// deleting the row (spec.md §3: templates are soft-deactivatable via
/// `is_active`).
pub async fn deactivate_template(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<MeetingTemplate>> {
    let existing = load_owned_template(&state, &session, &id).await?;
    let updated = MeetingTemplateRepository::update(
        &state.pool,
        existing.id,
        UpdateMeetingTemplate {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| AppError::Domain(DomainError::TemplateNotFound(existing.id.to_string())))?;

    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct AddPoolMemberRequest {
    pub host_id: HostId,
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default)]
    pub display_order: i32,
}

/// POST /api/host/templates/:id/pool — adds a host to a pooled
/// template (spec §3: a pool has at most 5 members).
pub async fn add_pool_member(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<AddPoolMemberRequest>,
) -> ApiResult<Json<TemplateHost>> {
    let template = load_owned_template(&state, &session, &id).await?;

    let existing = TemplateHostRepository::list_by_template(&state.pool, template.id).await?;
    if existing.len() >= MAX_POOL_SIZE {
        return Err(AppError::Domain(DomainError::PoolFull).into());
    }

    let member = TemplateHostRepository::create(
        &state.pool,
        CreateTemplateHost {
            template_id: template.id,
            host_id: body.host_id,
            role: TemplateHostRole::Sibling,
            is_optional: body.is_optional,
            display_order: body.display_order,
        },
    )
    .await?;

    Ok(Json(member))
}

/// GET /api/host/templates/:id/pool
pub async fn list_pool_members(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<TemplateHost>>> {
    let template = load_owned_template(&state, &session, &id).await?;
    let members = TemplateHostRepository::list_by_template(&state.pool, template.id).await?;
    Ok(Json(members))
}

/// DELETE /api/host/templates/:id/pool/:host_id — the owner cannot be
/// removed from their own template's pool.
pub async fn remove_pool_member(
    State(state): State<AppState>,
    session: Session,
    Path((id, member_host_id)): Path<(String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    let template = load_owned_template(&state, &session, &id).await?;
    let member_host_id: HostId = member_host_id
        .parse()
        .map_err(|_| AppError::InvalidInput("invalid host id".into()))?;

    let members = TemplateHostRepository::list_by_template(&state.pool, template.id).await?;
    let member = members
        .iter()
        .find(|m| m.host_id == member_host_id)
        .ok_or_else(|| AppError::Domain(DomainError::HostNotInTenant))?;
    if member.role == TemplateHostRole::Owner {
        return Err(AppError::Domain(DomainError::OwnerRemovalForbidden).into());
    }

    TemplateHostRepository::delete(&state.pool, template.id, member_host_id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
