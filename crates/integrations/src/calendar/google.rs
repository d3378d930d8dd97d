use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{BookingEventDetails, CalendarConnectionInfo, CreatedEvent, GoogleOAuthConfig, RefreshedTokens};
use crate::error::{ProviderError, ProviderResult};

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

fn bearer_token(conn: &CalendarConnectionInfo) -> ProviderResult<&str> {
    conn.access_token.as_deref().ok_or(ProviderError::Auth)
}

#[derive(Serialize)]
struct FreeBusyRequest<'a> {
    #[serde(rename = "timeMin")]
    time_min: String,
    #[serde(rename = "timeMax")]
    time_max: String,
    items: Vec<FreeBusyItem<'a>>,
}

#[derive(Serialize)]
struct FreeBusyItem<'a> {
    id: &'a str,
}

#[derive(Deserialize)]
struct FreeBusyResponse {
    calendars: std::collections::HashMap<String, FreeBusyCalendar>,
}

#[derive(Deserialize)]
struct FreeBusyCalendar {
    busy: Vec<FreeBusyInterval>,
}

#[derive(Deserialize)]
struct FreeBusyInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

pub async fn free_busy(
    http: &reqwest::Client,
    conn: &CalendarConnectionInfo,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ProviderResult<Vec<shared::types::TimeSlot>> {
    let token = bearer_token(conn)?;
    let body = FreeBusyRequest {
        time_min: start.to_rfc3339(),
        time_max: end.to_rfc3339(),
        items: vec![FreeBusyItem { id: &conn.calendar_id }],
    };

    let response = http
        .post(format!("{CALENDAR_API_BASE}/freeBusy"))
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

    let parsed: FreeBusyResponse = response
        .json()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))?;

    let busy = parsed
        .calendars
        .get(&conn.calendar_id)
        .map(|c| {
            c.busy
                .iter()
                .filter_map(|b| shared::types::TimeSlot::new(b.start, b.end).ok())
                .collect()
        })
        .unwrap_or_default();

    Ok(busy)
}

#[derive(Deserialize)]
struct InsertedEvent {
    id: String,
    #[serde(rename = "conferenceData")]
    conference_data: Option<ConferenceData>,
}

#[derive(Deserialize)]
struct ConferenceData {
    #[serde(rename = "entryPoints")]
    entry_points: Option<Vec<EntryPoint>>,
}

#[derive(Deserialize)]
struct EntryPoint {
    uri: String,
}

pub async fn create_event(
    http: &reqwest::Client,
    conn: &CalendarConnectionInfo,
    event: &BookingEventDetails<'_>,
) -> ProviderResult<CreatedEvent> {
    let token = bearer_token(conn)?;

    let mut body = json!({
        "summary": event.summary,
        "description": event.description,
        "location": event.location,
        "start": {"dateTime": event.start.to_rfc3339()},
        "end": {"dateTime": event.end.to_rfc3339()},
        "attendees": event.attendee_emails.iter().map(|e| json!({"email": e})).collect::<Vec<_>>(),
    });

    if event.want_google_meet_link {
        body["conferenceData"] = json!({
            "createRequest": {
                "requestId": uuid::Uuid::new_v4().to_string(),
                "conferenceSolutionKey": {"type": "hangoutsMeet"}
            }
        });
    }

    let calendar_id = urlencoding_encode(&conn.calendar_id);
    let mut url = format!("{CALENDAR_API_BASE}/calendars/{calendar_id}/events?sendUpdates=all");
    if event.want_google_meet_link {
        url.push_str("&conferenceDataVersion=1");
    }

    let response = http.post(&url).bearer_auth(token).json(&body).send().await?;

    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ProviderError::Auth);
    }
    if !response.status().is_success() {
        return Err(ProviderError::Provider(response.text().await.unwrap_or_default()));
    }

    let inserted: InsertedEvent = response
        .json()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))?;

    let conference_link = inserted
        .conference_data
        .and_then(|cd| cd.entry_points)
        .and_then(|eps| eps.into_iter().next())
        .map(|ep| ep.uri);

    Ok(CreatedEvent {
        event_id: inserted.id,
        conference_link,
    })
}

pub async fn delete_event(
    http: &reqwest::Client,
    conn: &CalendarConnectionInfo,
    event_id: &str,
) -> ProviderResult<()> {
    let token = bearer_token(conn)?;
    let calendar_id = urlencoding_encode(&conn.calendar_id);
    let url = format!("{CALENDAR_API_BASE}/calendars/{calendar_id}/events/{event_id}?sendUpdates=all");

    let response = http.delete(&url).bearer_auth(token).send().await?;

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
    client_id: &'a str,
    client_secret: &'a str,
    refresh_token: &'a str,
    grant_type: &'static str,
}

#[derive(Deserialize)]
struct RefreshTokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

pub async fn refresh_tokens(
    http: &reqwest::Client,
    conn: &CalendarConnectionInfo,
    oauth: &GoogleOAuthConfig,
    now: DateTime<Utc>,
) -> ProviderResult<Option<RefreshedTokens>> {
    if !super::needs_refresh(conn.token_expiry, now) {
        return Ok(None);
    }
    let refresh_token = conn.refresh_token.as_deref().ok_or(ProviderError::Auth)?;

    let body = RefreshTokenRequest {
        client_id: &oauth.client_id,
        client_secret: &oauth.client_secret,
        refresh_token,
        grant_type: "refresh_token",
    };

    let response = http.post(TOKEN_ENDPOINT).form(&body).send().await?;

    if !response.status().is_success() {
        return Err(ProviderError::Auth);
    }

    let parsed: RefreshTokenResponse = response
        .json()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))?;

    Ok(Some(RefreshedTokens {
        access_token: parsed.access_token,
        refresh_token: parsed.refresh_token,
        expires_at: now + chrono::Duration::seconds(parsed.expires_in),
    }))
}

fn urlencoding_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_at_sign_in_calendar_id() {
        assert_eq!(urlencoding_encode("host@example.com"), "host%40example.com");
    }
}
