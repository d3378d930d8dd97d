use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use db::{Session as SessionRow, SessionRepository};
use domain::token::{generate_booking_token, verify_selection_token};
use serde::Deserialize;
use shared::types::HostId;
use shared::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    pub selection_token: String,
}

/// POST /api/host/sessions/exchange — turns a verified selection token
/// into a bearer `Session` row (spec §6.3). Session issuance/login UI
/// is out of scope; this is the minimal persistence-port plumbing a
/// future login flow would call into.
pub async fn exchange_session(
    State(state): State<AppState>,
    Json(body): Json<ExchangeRequest>,
) -> ApiResult<Json<SessionRow>> {
    let now = Utc::now();
    let host_id_str = verify_selection_token(&body.selection_token, &state.selection_token_secret, now)
        .map_err(|_| AppError::Unauthorized)?;
    let host_id: HostId = host_id_str
        .parse()
        .map_err(|_| AppError::InvalidInput("selection token did not carry a valid host id".into()))?;

    let token = generate_booking_token();
    let expires_at = now + Duration::hours(state.session_duration_hours);

    let session = SessionRepository::create(&state.pool, &token, host_id, expires_at).await?;
    Ok(Json(session))
}
