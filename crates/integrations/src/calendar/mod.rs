pub mod caldav;
pub mod google;

use chrono::{DateTime, Utc};
use shared::types::CalendarProvider;

use crate::error::{ProviderError, ProviderResult};

/// Bearer/basic-auth material and addressing info for one
/// `CalendarConnection` row, passed in by the caller so this crate
/// never depends on the `db` crate.
#[derive(Debug, Clone)]
pub struct CalendarConnectionInfo {
    pub provider: CalendarProvider,
    pub calendar_id: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<DateTime<Utc>>,
    pub caldav_url: Option<String>,
    pub caldav_username: Option<String>,
    pub caldav_password: Option<String>,
}

/// Details needed to materialize a booking as a remote calendar event.
pub struct BookingEventDetails<'a> {
    pub summary: &'a str,
    pub description: Option<&'a str>,
    pub location: Option<&'a str>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendee_emails: Vec<String>,
    pub want_google_meet_link: bool,
}

/// Result of creating a remote event: its opaque id, plus a
/// conference link if the provider produced one as a side-effect.
pub struct CreatedEvent {
    pub event_id: String,
    pub conference_link: Option<String>,
}

/// Refreshed OAuth material to persist back onto the connection row.
/// `refresh_token` is `None` when the provider did not rotate it.
pub struct RefreshedTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// Unified calendar provider adapter (spec §4.4). `google` requests
/// freeBusy/events.insert with OAuth bearer auth; `caldav`/`icloud`
/// issue raw `REPORT`/`PUT`/`DELETE`/`OPTIONS` over HTTP Basic.
pub struct CalendarAdapter {
    http: reqwest::Client,
    google_oauth: Option<GoogleOAuthConfig>,
}

impl CalendarAdapter {
    pub fn new(google_oauth: Option<GoogleOAuthConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            google_oauth,
        }
    }

    pub async fn busy_times(
        &self,
        conn: &CalendarConnectionInfo,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ProviderResult<Vec<shared::types::TimeSlot>> {
        match conn.provider {
            CalendarProvider::Google => {
                google::free_busy(&self.http, conn, start, end).await
            }
            CalendarProvider::Caldav | CalendarProvider::Icloud => {
                caldav::busy_times(&self.http, conn, start, end).await
            }
        }
    }

    pub async fn create_event(
        &self,
        conn: &CalendarConnectionInfo,
        event: &BookingEventDetails<'_>,
    ) -> ProviderResult<CreatedEvent> {
        match conn.provider {
            CalendarProvider::Google => google::create_event(&self.http, conn, event).await,
            CalendarProvider::Caldav | CalendarProvider::Icloud => {
                caldav::create_event(&self.http, conn, event).await
            }
        }
    }

    pub async fn delete_event(
        &self,
        conn: &CalendarConnectionInfo,
        event_id: &str,
    ) -> ProviderResult<()> {
        match conn.provider {
            CalendarProvider::Google => google::delete_event(&self.http, conn, event_id).await,
            CalendarProvider::Caldav | CalendarProvider::Icloud => {
                caldav::delete_event(&self.http, conn, event_id).await
            }
        }
    }

    /// No-op if `token_expiry - 5min` is still in the future. OAuth
    /// variants only.
    pub async fn refresh_tokens(
        &self,
        conn: &CalendarConnectionInfo,
        now: DateTime<Utc>,
    ) -> ProviderResult<Option<RefreshedTokens>> {
        match conn.provider {
            CalendarProvider::Google => {
                let Some(oauth) = &self.google_oauth else {
                    return Err(ProviderError::Unsupported);
                };
                google::refresh_tokens(&self.http, conn, oauth, now).await
            }
            CalendarProvider::Caldav | CalendarProvider::Icloud => Ok(None),
        }
    }

    /// CalDAV only: HTTP `OPTIONS` with basic auth.
    pub async fn validate(&self, conn: &CalendarConnectionInfo) -> ProviderResult<()> {
        match conn.provider {
            CalendarProvider::Caldav | CalendarProvider::Icloud => {
                caldav::validate(&self.http, conn).await
            }
            CalendarProvider::Google => Ok(()),
        }
    }
}

/// `now + 5min >= token_expiry` ⇒ refresh is due.
pub fn needs_refresh(token_expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match token_expiry {
        Some(expiry) => now + chrono::Duration::minutes(5) >= expiry,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn refresh_not_needed_when_far_from_expiry() {
        let now = Utc::now();
        assert!(!needs_refresh(Some(now + Duration::hours(1)), now));
    }

    #[test]
    fn refresh_needed_within_five_minutes_of_expiry() {
        let now = Utc::now();
        assert!(needs_refresh(Some(now + Duration::minutes(4)), now));
    }

    #[test]
    fn refresh_needed_when_no_expiry_known() {
        assert!(needs_refresh(None, Utc::now()));
    }
}
