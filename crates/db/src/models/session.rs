use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::types::HostId;
use sqlx::FromRow;

/// Opaque DB-backed bearer session (spec §6): `(token, host_id,
/// expires_at)`. Not a JWT — the `auth::Session` extractor looks this
/// row up on every request instead of decoding a claim.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub host_id: HostId,
    pub expires_at: DateTime<Utc>,
}
