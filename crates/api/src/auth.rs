use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use db::SessionRepository;
use shared::types::HostId;
use std::future::Future;

use crate::state::AppState;

/// Extractor for an authenticated host, backed by the `sessions` table
/// (spec §6.3). Not a JWT: every request costs one `find_valid` query
/// against the bearer token in the `Authorization` header.
pub struct Session {
    pub token: String,
    pub host_id: HostId,
}

impl FromRequestParts<AppState> for Session {
    type Rejection = (StatusCode, &'static str);

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 AppState,
    ) -> std::pin::Pin<Box<dyn Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        let pool = state.pool.clone();

        Box::pin(async move {
            let auth_header = parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .ok_or((StatusCode::UNAUTHORIZED, "Missing authorization header"))?;

            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or((StatusCode::UNAUTHORIZED, "Invalid authorization header"))?;

            let session = SessionRepository::find_valid(&pool, token)
                .await
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Session lookup failed"))?
                .ok_or((StatusCode::UNAUTHORIZED, "Invalid or expired session"))?;

            Ok(Session {
                token: session.token,
                host_id: session.host_id,
            })
        })
    }
}
