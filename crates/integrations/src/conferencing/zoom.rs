use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};

const API_BASE: &str = "https://api.zoom.us/v2";
const TOKEN_ENDPOINT: &str = "https://zoom.us/oauth/token";

/// Bearer/refresh material for one `ConferencingConnection` row,
/// passed in by the caller so this crate never depends on `db`.
#[derive(Debug, Clone)]
pub struct ZoomConnectionInfo {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<DateTime<Utc>>,
}

pub struct ZoomConfig {
    pub client_id: String,
    pub client_secret: String,
}

pub struct ZoomMeeting {
    pub meeting_id: String,
    pub join_url: String,
}

pub struct ZoomRefreshedTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

fn bearer_token(conn: &ZoomConnectionInfo) -> ProviderResult<&str> {
    conn.access_token.as_deref().ok_or(ProviderError::Auth)
}

#[derive(Serialize)]
struct CreateMeetingRequest<'a> {
    topic: &'a str,
    #[serde(rename = "type")]
    meeting_type: u8,
    start_time: String,
    duration: i64,
    timezone: &'static str,
    agenda: Option<&'a str>,
}

#[derive(Deserialize)]
struct CreateMeetingResponse {
    id: serde_json::Value,
    join_url: String,
}

/// Creates a scheduled (type 2) Zoom meeting spanning `[start, end)`.
pub async fn create_meeting(
    http: &reqwest::Client,
    conn: &ZoomConnectionInfo,
    topic: &str,
    agenda: Option<&str>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ProviderResult<ZoomMeeting> {
    let token = bearer_token(conn)?;
    let duration_minutes = (end - start).num_minutes().max(1);

    let body = CreateMeetingRequest {
        topic,
        meeting_type: 2,
        start_time: start.to_rfc3339(),
        duration: duration_minutes,
        timezone: "UTC",
        agenda,
    };

    let response = http
        .post(format!("{API_BASE}/users/me/meetings"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;

    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ProviderError::Auth);
    }
    if !response.status().is_success() {
        return Err(ProviderError::Provider(response.text().await.unwrap_or_default()));
    }

    let parsed: CreateMeetingResponse = response
        .json()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))?;

    Ok(ZoomMeeting {
        meeting_id: parsed.id.to_string(),
        join_url: parsed.join_url,
    })
}

pub async fn delete_meeting(
    http: &reqwest::Client,
    conn: &ZoomConnectionInfo,
    meeting_id: &str,
) -> ProviderResult<()> {
    let token = bearer_token(conn)?;
    let response = http
        .delete(format!("{API_BASE}/meetings/{meeting_id}"))
        .bearer_auth(token)
        .send()
        .await?;

    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ProviderError::Auth);
    }
    if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
        return Err(ProviderError::Provider(response.text().await.unwrap_or_default()));
    }
    Ok(())
}

#[derive(Serialize)]
struct RefreshTokenRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshTokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

/// Zoom uses HTTP Basic auth with `client_id:client_secret` on the
/// token endpoint itself, unlike Google's body-embedded credentials.
pub async fn refresh_tokens(
    http: &reqwest::Client,
    conn: &ZoomConnectionInfo,
    config: &ZoomConfig,
    now: DateTime<Utc>,
) -> ProviderResult<Option<ZoomRefreshedTokens>> {
    if !crate::calendar::needs_refresh(conn.token_expiry, now) {
        return Ok(None);
    }
    let refresh_token = conn.refresh_token.as_deref().ok_or(ProviderError::Auth)?;

    let body = RefreshTokenRequest {
        grant_type: "refresh_token",
        refresh_token,
    };

    let response = http
        .post(TOKEN_ENDPOINT)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ProviderError::Auth);
    }

    let parsed: RefreshTokenResponse = response
        .json()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))?;

    Ok(Some(ZoomRefreshedTokens {
        access_token: parsed.access_token,
        refresh_token: parsed.refresh_token,
        expires_at: now + chrono::Duration::seconds(parsed.expires_in),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_requires_access_token() {
        let conn = ZoomConnectionInfo {
            access_token: None,
            refresh_token: None,
            token_expiry: None,
        };
        assert!(matches!(bearer_token(&conn), Err(ProviderError::Auth)));
    }

    #[test]
    fn bearer_token_returns_stored_value() {
        let conn = ZoomConnectionInfo {
            access_token: Some("tok".to_string()),
            refresh_token: None,
            token_expiry: None,
        };
        assert_eq!(bearer_token(&conn).unwrap(), "tok");
    }
}
