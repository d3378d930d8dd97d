use chrono::{DateTime, Utc};
use domain::{decode_ics, encode_booking_ics, IcsBookingEvent};
use reqwest::Method;
use shared::types::TimeSlot;

use super::{BookingEventDetails, CalendarConnectionInfo, CreatedEvent};
use crate::error::{ProviderError, ProviderResult};

/// Free-busy-query is intentionally not used (poor iCloud support);
/// busy intervals are synthesized from parsed events (spec §4.4).
pub async fn busy_times(
    http: &reqwest::Client,
    conn: &CalendarConnectionInfo,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ProviderResult<Vec<TimeSlot>> {
    let base_url = conn.caldav_url.as_deref().ok_or(ProviderError::Auth)?;
    let body = calendar_query_body(start, end);

    let response = http
        .request(Method::from_bytes(b"REPORT").expect("REPORT is a valid HTTP method"), base_url)
        .basic_auth(
            conn.caldav_username.as_deref().unwrap_or_default(),
            conn.caldav_password.as_deref(),
        )
        .header("Content-Type", "application/xml; charset=utf-8")
        .header("Depth", "1")
        .body(body)
        .send()
        .await?;

    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ProviderError::Auth);
    }
    if !response.status().is_success() {
        return Err(ProviderError::Provider(response.text().await.unwrap_or_default()));
    }

    let xml = response.text().await?;
    let range = TimeSlot::new(start, end).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let mut busy = Vec::new();
    for payload in extract_calendar_data(&xml) {
        for event in decode_ics(&payload, range) {
            if let Ok(slot) = TimeSlot::new(event.start, event.end) {
                busy.push(slot);
            }
        }
    }
    Ok(busy)
}

pub async fn create_event(
    http: &reqwest::Client,
    conn: &CalendarConnectionInfo,
    event: &BookingEventDetails<'_>,
) -> ProviderResult<CreatedEvent> {
    let base_url = conn.caldav_url.as_deref().ok_or(ProviderError::Auth)?;
    let filename = format!("{}.ics", uuid::Uuid::new_v4());
    let url = join_url(base_url, &filename);

    let ics = encode_booking_ics(&IcsBookingEvent {
        booking_id: uuid::Uuid::new_v4().to_string(),
        start: event.start,
        end: event.end,
        summary: event.summary.to_string(),
        description: event.description.map(|s| s.to_string()),
        location: event.location.map(|s| s.to_string()),
        organizer_email: conn.calendar_id.clone(),
        attendee_emails: event.attendee_emails.clone(),
    });

    let response = http
        .put(&url)
        .basic_auth(
            conn.caldav_username.as_deref().unwrap_or_default(),
            conn.caldav_password.as_deref(),
        )
        .header("Content-Type", "text/calendar; charset=utf-8")
        .body(ics)
        .send()
        .await?;

    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ProviderError::Auth);
    }
    if !response.status().is_success() {
        return Err(ProviderError::Provider(response.text().await.unwrap_or_default()));
    }

    Ok(CreatedEvent {
        event_id: filename,
        conference_link: None,
    })
}

pub async fn delete_event(
    http: &reqwest::Client,
    conn: &CalendarConnectionInfo,
    event_id: &str,
) -> ProviderResult<()> {
    let base_url = conn.caldav_url.as_deref().ok_or(ProviderError::Auth)?;
    let url = join_url(base_url, event_id);

    let response = http
        .delete(&url)
        .basic_auth(
            conn.caldav_username.as_deref().unwrap_or_default(),
            conn.caldav_password.as_deref(),
        )
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

pub async fn validate(http: &reqwest::Client, conn: &CalendarConnectionInfo) -> ProviderResult<()> {
    let base_url = conn.caldav_url.as_deref().ok_or(ProviderError::Auth)?;
    let response = http
        .request(Method::OPTIONS, base_url)
        .basic_auth(
            conn.caldav_username.as_deref().unwrap_or_default(),
            conn.caldav_password.as_deref(),
        )
        .send()
        .await?;

    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ProviderError::Auth);
    }
    if !response.status().is_success() {
        return Err(ProviderError::Provider(response.text().await.unwrap_or_default()));
    }
    Ok(())
}

fn calendar_query_body(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let fmt = "%Y%m%dT%H%M%SZ";
    format!(
        r#"<?xml version="1.0" encoding="utf-8" ?>
<C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop>
    <C:calendar-data/>
  </D:prop>
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      <C:comp-filter name="VEVENT">
        <C:time-range start="{}" end="{}"/>
      </C:comp-filter>
    </C:comp-filter>
  </C:filter>
</C:calendar-query>"#,
        start.format(fmt),
        end.format(fmt)
    )
}

/// Extract the text content of every `calendar-data` element,
/// tolerating the common namespace prefixes (`cal:`, `C:`, `ns0:`,
/// `ns1:`, or unprefixed) that different CalDAV servers emit.
fn extract_calendar_data(xml: &str) -> Vec<String> {
    const TAG: &str = "calendar-data";
    let mut out = Vec::new();
    let mut rest = xml;

    while let Some(open_start) = find_tag_open(rest, TAG) {
        let after_open_tag_name = open_start + TAG.len();
        let Some(open_end_rel) = rest[after_open_tag_name..].find('>') else {
            break;
        };
        let content_start = after_open_tag_name + open_end_rel + 1;

        let Some(close_start_rel) = find_tag_close(&rest[content_start..], TAG) else {
            break;
        };
        let content_end = content_start + close_start_rel;

        out.push(decode_xml_entities(&rest[content_start..content_end]));

        let Some(close_tag_end_rel) = rest[content_end..].find('>') else {
            break;
        };
        rest = &rest[content_end + close_tag_end_rel + 1..];
    }
    out
}

fn find_tag_open(xml: &str, local_name: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(rel) = xml[search_from..].find(local_name) {
        let idx = search_from + rel;
        if idx > 0 && xml.as_bytes()[idx - 1] == b'<' {
            return Some(idx);
        }
        // allow a namespace prefix immediately before the local name, e.g. "<cal:calendar-data"
        if idx >= 2 {
            let preceding = &xml[..idx];
            if let Some(lt) = preceding.rfind('<') {
                let between = &preceding[lt + 1..];
                if !between.contains('/') && between.chars().all(|c| c.is_alphanumeric() || c == ':') {
                    return Some(idx);
                }
            }
        }
        search_from = idx + local_name.len();
    }
    None
}

fn find_tag_close(xml: &str, local_name: &str) -> Option<usize> {
    let needle_plain = format!("</{local_name}");
    if let Some(i) = xml.find(&needle_plain) {
        return Some(i);
    }
    // search for any "</prefix:calendar-data"
    let mut search_from = 0;
    while let Some(rel) = xml[search_from..].find(local_name) {
        let idx = search_from + rel;
        let preceding = &xml[..idx];
        if preceding.ends_with(':') {
            if let Some(lt) = preceding.rfind('<') {
                if preceding[lt..].starts_with("</") {
                    return Some(lt);
                }
            }
        }
        search_from = idx + local_name.len();
    }
    None
}

fn decode_xml_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
}

fn join_url(base: &str, filename: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{filename}")
    } else {
        format!("{base}/{filename}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_unprefixed_calendar_data() {
        let xml = "<response><propstat><prop><calendar-data>BEGIN:VCALENDAR\nEND:VCALENDAR</calendar-data></prop></propstat></response>";
        let data = extract_calendar_data(xml);
        assert_eq!(data, vec!["BEGIN:VCALENDAR\nEND:VCALENDAR".to_string()]);
    }

    #[test]
    fn extracts_namespaced_calendar_data() {
        let xml = "<D:response><D:propstat><D:prop><cal:calendar-data xmlns:cal=\"urn:ietf:params:xml:ns:caldav\">BEGIN:VCALENDAR\nEND:VCALENDAR</cal:calendar-data></D:prop></D:propstat></D:response>";
        let data = extract_calendar_data(xml);
        assert_eq!(data, vec!["BEGIN:VCALENDAR\nEND:VCALENDAR".to_string()]);
    }

    #[test]
    fn extracts_multiple_entries() {
        let xml = "<a><calendar-data>ONE</calendar-data></a><a><ns0:calendar-data>TWO</ns0:calendar-data></a>";
        let data = extract_calendar_data(xml);
        assert_eq!(data, vec!["ONE".to_string(), "TWO".to_string()]);
    }

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(join_url("https://cal.example.com/dav/", "x.ics"), "https://cal.example.com/dav/x.ics");
        assert_eq!(join_url("https://cal.example.com/dav", "x.ics"), "https://cal.example.com/dav/x.ics");
    }
}
