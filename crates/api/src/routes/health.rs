use axum::http::StatusCode;

/// GET /healthz - liveness probe, no dependencies checked.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
