use axum::{
    extract::{Path, State},
    Json,
};
use db::{ConferencingConnection, ConferencingConnectionRepository, CreateConferencingConnection};
use serde::Deserialize;
use shared::types::ConferencingConnectionId;
use shared::{AppError, DomainError};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateConferencingConnectionRequest {
    pub provider: shared::types::ConferencingProvider,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<chrono::DateTime<chrono::Utc>>,
}

/// POST /api/host/conferencing-connections
pub async fn create_conferencing_connection(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CreateConferencingConnectionRequest>,
) -> ApiResult<Json<ConferencingConnection>> {
    let connection = ConferencingConnectionRepository::create(
        &state.pool,
        CreateConferencingConnection {
            host_id: session.host_id,
            provider: body.provider,
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            token_expiry: body.token_expiry,
        },
    )
    .await?;

    Ok(Json(connection))
}

/// GET /api/host/conferencing-connections/:provider
pub async fn get_conferencing_connection(
    State(state): State<AppState>,
    session: Session,
    Path(provider_name): Path<String>,
) -> ApiResult<Json<ConferencingConnection>> {
    let provider = match provider_name.as_str() {
        "zoom" => shared::types::ConferencingProvider::Zoom,
        _ => return Err(AppError::InvalidInput("unsupported conferencing provider".into()).into()),
    };

    let connection = ConferencingConnectionRepository::find_by_host_and_provider(
        &state.pool,
        session.host_id,
        provider,
    )
    .await?
    .ok_or_else(|| AppError::Domain(DomainError::ConferencingConnectionNotFound(provider_name)))?;

    Ok(Json(connection))
}

/// DELETE /api/host/conferencing-connections/:id
pub async fn delete_conferencing_connection(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id: ConferencingConnectionId = id
        .parse()
        .map_err(|_| AppError::InvalidInput("invalid conferencing connection id".into()))?;

    let connection = ConferencingConnectionRepository::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Domain(DomainError::ConferencingConnectionNotFound(id.to_string())))?;
    if connection.host_id != session.host_id {
        return Err(AppError::Unauthorized.into());
    }

    ConferencingConnectionRepository::delete(&state.pool, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
