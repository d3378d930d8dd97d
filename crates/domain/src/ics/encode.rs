use chrono::{DateTime, Utc};

/// Fields needed to render a booking as an RFC 5545 `VEVENT` (spec
/// §6, "ICS output").
pub struct IcsBookingEvent {
    pub booking_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub organizer_email: String,
    pub attendee_emails: Vec<String>,
}

const LINE_FOLD_LIMIT: usize = 75;

/// Render a single-VEVENT `VCALENDAR` for email attachment or CalDAV
/// `PUT`.
pub fn encode_booking_ics(event: &IcsBookingEvent) -> String {
    let mut lines = Vec::new();
    lines.push("BEGIN:VCALENDAR".to_string());
    lines.push("VERSION:2.0".to_string());
    lines.push("METHOD:REQUEST".to_string());
    lines.push("PRODID:-//meetwhen//scheduling kernel//EN".to_string());
    lines.push("BEGIN:VEVENT".to_string());
    lines.push(format!("UID:{}@meetwhen", event.booking_id));
    lines.push(format!("DTSTART:{}", format_utc(event.start)));
    lines.push(format!("DTEND:{}", format_utc(event.end)));
    lines.push(format!("SUMMARY:{}", escape_ics_text(&event.summary)));
    if let Some(description) = &event.description {
        lines.push(format!("DESCRIPTION:{}", escape_ics_text(description)));
    }
    if let Some(location) = &event.location {
        lines.push(format!("LOCATION:{}", escape_ics_text(location)));
    }
    lines.push(format!(
        "ORGANIZER:mailto:{}",
        escape_ics_text(&event.organizer_email)
    ));
    for attendee in &event.attendee_emails {
        lines.push(format!("ATTENDEE:mailto:{}", escape_ics_text(attendee)));
    }
    lines.push("STATUS:CONFIRMED".to_string());
    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());

    lines
        .into_iter()
        .map(|line| fold_line(&line))
        .collect::<Vec<_>>()
        .join("\r\n")
        + "\r\n"
}

fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape `\`, `;`, `,`, and newlines per RFC 5545 §3.3.11.
fn escape_ics_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Fold a logical line at `LINE_FOLD_LIMIT` octets, continuation lines
/// prefixed with a single space, per RFC 5545 §3.1.
fn fold_line(line: &str) -> String {
    if line.len() <= LINE_FOLD_LIMIT {
        return line.to_string();
    }
    let bytes = line.as_bytes();
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut limit = LINE_FOLD_LIMIT;
    while start < bytes.len() {
        let mut end = (start + limit).min(bytes.len());
        while end > start && !line.is_char_boundary(end) {
            end -= 1;
        }
        chunks.push(&line[start..end]);
        start = end;
        limit = LINE_FOLD_LIMIT - 1; // continuation lines lose one octet to the leading space
    }
    chunks.join("\r\n ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> IcsBookingEvent {
        IcsBookingEvent {
            booking_id: "b-1".to_string(),
            start: Utc.with_ymd_and_hms(2024, 6, 17, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 6, 17, 9, 30, 0).unwrap(),
            summary: "30 Minute Meeting".to_string(),
            description: Some("Agenda:\nDiscuss Q3".to_string()),
            location: None,
            organizer_email: "host@example.com".to_string(),
            attendee_emails: vec!["invitee@example.com".to_string()],
        }
    }

    #[test]
    fn contains_required_fields() {
        let ics = encode_booking_ics(&sample_event());
        assert!(ics.contains("VERSION:2.0"));
        assert!(ics.contains("UID:b-1@meetwhen"));
        assert!(ics.contains("DTSTART:20240617T090000Z"));
        assert!(ics.contains("DTEND:20240617T093000Z"));
        assert!(ics.contains("STATUS:CONFIRMED"));
        assert!(ics.contains("ORGANIZER:mailto:host@example.com"));
        assert!(ics.contains("ATTENDEE:mailto:invitee@example.com"));
    }

    #[test]
    fn escapes_newlines_in_description() {
        let ics = encode_booking_ics(&sample_event());
        assert!(ics.contains("DESCRIPTION:Agenda:\\nDiscuss Q3"));
    }

    #[test]
    fn escapes_special_characters() {
        let mut event = sample_event();
        event.summary = "Sync; planning, review\\".to_string();
        let ics = encode_booking_ics(&event);
        assert!(ics.contains("SUMMARY:Sync\\; planning\\, review\\\\"));
    }

    #[test]
    fn folds_long_lines() {
        let mut event = sample_event();
        event.description = Some("x".repeat(200));
        let ics = encode_booking_ics(&event);
        for line in ics.split("\r\n") {
            assert!(line.len() <= 75, "line too long: {} chars", line.len());
        }
    }
}
