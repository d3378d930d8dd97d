use axum::{
    extract::{Path, State},
    Json,
};
use db::{CalendarConnection, CalendarConnectionRepository, CreateCalendarConnection};
use integrations::calendar::CalendarConnectionInfo;
use serde::Deserialize;
use shared::types::CalendarConnectionId;
use shared::{AppError, DomainError};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::state::AppState;

/// Converts a persisted row into the adapter's connection-info DTO.
/// The `integrations` crate never depends on `db`, so this conversion
/// lives at the API boundary.
pub fn to_connection_info(conn: &CalendarConnection) -> CalendarConnectionInfo {
    CalendarConnectionInfo {
        provider: conn.provider,
        calendar_id: conn.calendar_id.clone(),
        access_token: conn.access_token.clone(),
        refresh_token: conn.refresh_token.clone(),
        token_expiry: conn.token_expiry,
        caldav_url: conn.caldav_url.clone(),
        caldav_username: conn.caldav_username.clone(),
        caldav_password: conn.caldav_password.clone(),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCalendarConnectionRequest {
    pub provider: shared::types::CalendarProvider,
    pub calendar_id: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<chrono::DateTime<chrono::Utc>>,
    pub caldav_url: Option<String>,
    pub caldav_username: Option<String>,
    pub caldav_password: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// POST /api/host/calendar-connections
pub async fn create_calendar_connection(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CreateCalendarConnectionRequest>,
) -> ApiResult<Json<CalendarConnection>> {
    let connection = CalendarConnectionRepository::create(
        &state.pool,
        CreateCalendarConnection {
            host_id: session.host_id,
            provider: body.provider,
            calendar_id: body.calendar_id,
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            token_expiry: body.token_expiry,
            caldav_url: body.caldav_url,
            caldav_username: body.caldav_username,
            caldav_password: body.caldav_password,
            is_default: body.is_default,
        },
    )
    .await?;

    if let Err(err) = state.calendar.validate(&to_connection_info(&connection)).await {
        tracing::warn!("calendar connection validation failed: {err}");
    }

    Ok(Json(connection))
}

/// GET /api/host/calendar-connections
pub async fn list_calendar_connections(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<CalendarConnection>>> {
    let connections = CalendarConnectionRepository::list_by_host(&state.pool, session.host_id).await?;
    Ok(Json(connections))
}

/// DELETE /api/host/calendar-connections/:id
pub async fn delete_calendar_connection(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id: CalendarConnectionId = id
        .parse()
        .map_err(|_| AppError::InvalidInput("invalid calendar connection id".into()))?;

    let connection = CalendarConnectionRepository::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::CalendarConnectionNotFound(id.to_string())))?;
    if connection.host_id != session.host_id {
        return Err(AppError::Unauthorized.into());
    }

    CalendarConnectionRepository::delete(&state.pool, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
