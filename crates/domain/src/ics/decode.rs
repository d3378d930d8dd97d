use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use shared::types::TimeSlot;

/// A decoded VEVENT that overlaps the requested query range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsEvent {
    pub summary: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_all_day: bool,
}

/// Decode an RFC 5545 subset, returning every VEVENT whose interval
/// overlaps `range` (spec §4.5).
pub fn decode_ics(input: &str, range: TimeSlot) -> Vec<IcsEvent> {
    let lines = unfold_lines(input);

    let mut events = Vec::new();
    let mut in_event = false;
    let mut summary: Option<String> = None;
    let mut dtstart: Option<(DateTime<Utc>, bool)> = None;
    let mut dtend: Option<DateTime<Utc>> = None;
    let mut duration: Option<chrono::Duration> = None;

    for line in lines {
        let trimmed = line.trim_end();
        if trimmed.eq_ignore_ascii_case("BEGIN:VEVENT") {
            in_event = true;
            summary = None;
            dtstart = None;
            dtend = None;
            duration = None;
            continue;
        }
        if trimmed.eq_ignore_ascii_case("END:VEVENT") {
            if in_event {
                if let Some((start, is_all_day)) = dtstart {
                    let end = dtend
                        .or_else(|| duration.map(|d| start + d))
                        .unwrap_or(start);
                    if end > range.start && start < range.end {
                        events.push(IcsEvent {
                            summary: summary.clone(),
                            start,
                            end,
                            is_all_day,
                        });
                    }
                }
            }
            in_event = false;
            continue;
        }
        if !in_event {
            continue;
        }

        let Some((name_and_params, value)) = trimmed.split_once(':') else {
            continue;
        };
        let mut parts = name_and_params.split(';');
        let Some(name) = parts.next() else { continue };
        let params: Vec<&str> = parts.collect();

        match name.to_ascii_uppercase().as_str() {
            "SUMMARY" => summary = Some(unescape_text(value)),
            "DTSTART" => dtstart = parse_datetime(value, &params).map(|(dt, ad)| (dt, ad)),
            "DTEND" => dtend = parse_datetime(value, &params).map(|(dt, _)| dt),
            "DURATION" => duration = parse_duration(value),
            _ => {}
        }
    }

    events
}

/// Normalize CR/LF, then fold continuation lines (leading SPACE or
/// TAB) back onto the previous line.
fn unfold_lines(input: &str) -> Vec<String> {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = Vec::new();
    for raw_line in normalized.split('\n') {
        if (raw_line.starts_with(' ') || raw_line.starts_with('\t')) && !lines.is_empty() {
            let last = lines.last_mut().unwrap();
            last.push_str(&raw_line[1..]);
        } else {
            lines.push(raw_line.to_string());
        }
    }
    lines
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('n') | Some('N') => {
                    out.push('\n');
                    chars.next();
                }
                Some(';') => {
                    out.push(';');
                    chars.next();
                }
                Some(',') => {
                    out.push(',');
                    chars.next();
                }
                Some('\\') => {
                    out.push('\\');
                    chars.next();
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse a `DTSTART`/`DTEND` value, honoring `VALUE=DATE` and `TZID=`
/// params. Returns `(utc_datetime, is_all_day)`.
fn parse_datetime(value: &str, params: &[&str]) -> Option<(DateTime<Utc>, bool)> {
    let is_date_value = params
        .iter()
        .any(|p| p.eq_ignore_ascii_case("VALUE=DATE"));

    if is_date_value {
        let date = NaiveDate::parse_from_str(value, "%Y%m%d").ok()?;
        let dt = date.and_hms_opt(0, 0, 0)?;
        return Some((Utc.from_utc_datetime(&dt), true));
    }

    if let Some(stripped) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(stripped, "%Y%m%dT%H%M%S").ok()?;
        return Some((Utc.from_utc_datetime(&naive), false));
    }

    let naive = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok()?;
    let tzid = params.iter().find_map(|p| p.strip_prefix("TZID="));
    let utc = match tzid {
        Some(tz_name) => {
            let tz: chrono_tz::Tz = tz_name.parse().ok()?;
            tz.from_local_datetime(&naive).earliest()?.with_timezone(&Utc)
        }
        None => Utc.from_utc_datetime(&naive),
    };
    Some((utc, false))
}

/// Parse an ISO 8601 duration (`PnWnDTnHnMnS`, weeks mutually
/// exclusive with the rest in valid ICS but tolerated either way).
fn parse_duration(value: &str) -> Option<chrono::Duration> {
    let value = value.trim();
    let negative = value.starts_with('-');
    let value = value.trim_start_matches(['+', '-']);
    let rest = value.strip_prefix('P')?;

    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (rest, None),
    };

    let mut total = chrono::Duration::zero();
    let mut num = String::new();
    for c in date_part.chars() {
        if c.is_ascii_digit() {
            num.push(c);
        } else {
            let n: i64 = num.parse().ok()?;
            num.clear();
            match c {
                'W' => total += chrono::Duration::weeks(n),
                'D' => total += chrono::Duration::days(n),
                _ => return None,
            }
        }
    }

    if let Some(time_part) = time_part {
        let mut num = String::new();
        for c in time_part.chars() {
            if c.is_ascii_digit() {
                num.push(c);
            } else {
                let n: i64 = num.parse().ok()?;
                num.clear();
                match c {
                    'H' => total += chrono::Duration::hours(n),
                    'M' => total += chrono::Duration::minutes(n),
                    'S' => total += chrono::Duration::seconds(n),
                    _ => return None,
                }
            }
        }
    }

    Some(if negative { -total } else { total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeSlot {
        TimeSlot::new(start, end).unwrap()
    }

    #[test]
    fn decodes_utc_event() {
        let ics = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nSUMMARY:Standup\r\nDTSTART:20240617T090000Z\r\nDTEND:20240617T093000Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let r = range(
            Utc.with_ymd_and_hms(2024, 6, 17, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 18, 0, 0, 0).unwrap(),
        );
        let events = decode_ics(ics, r);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary.as_deref(), Some("Standup"));
        assert_eq!(events[0].start, Utc.with_ymd_and_hms(2024, 6, 17, 9, 0, 0).unwrap());
        assert_eq!(events[0].end, Utc.with_ymd_and_hms(2024, 6, 17, 9, 30, 0).unwrap());
        assert!(!events[0].is_all_day);
    }

    #[test]
    fn dtend_derived_from_duration() {
        let ics = "BEGIN:VEVENT\r\nDTSTART:20240617T090000Z\r\nDURATION:PT1H30M\r\nEND:VEVENT\r\n";
        let r = range(
            Utc.with_ymd_and_hms(2024, 6, 17, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 18, 0, 0, 0).unwrap(),
        );
        let events = decode_ics(ics, r);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].end, Utc.with_ymd_and_hms(2024, 6, 17, 10, 30, 0).unwrap());
    }

    #[test]
    fn all_day_event_parsed_as_midnight_utc() {
        let ics = "BEGIN:VEVENT\r\nDTSTART;VALUE=DATE:20240617\r\nDTEND;VALUE=DATE:20240618\r\nEND:VEVENT\r\n";
        let r = range(
            Utc.with_ymd_and_hms(2024, 6, 17, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 18, 0, 0, 0).unwrap(),
        );
        let events = decode_ics(ics, r);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_all_day);
        assert_eq!(events[0].start, Utc.with_ymd_and_hms(2024, 6, 17, 0, 0, 0).unwrap());
    }

    #[test]
    fn floating_time_with_tzid_converted_to_utc() {
        let ics = "BEGIN:VEVENT\r\nDTSTART;TZID=America/New_York:20240617T090000\r\nDTEND;TZID=America/New_York:20240617T100000\r\nEND:VEVENT\r\n";
        let r = range(
            Utc.with_ymd_and_hms(2024, 6, 17, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 18, 0, 0, 0).unwrap(),
        );
        let events = decode_ics(ics, r);
        assert_eq!(events.len(), 1);
        // EDT (UTC-4) in June.
        assert_eq!(events[0].start, Utc.with_ymd_and_hms(2024, 6, 17, 13, 0, 0).unwrap());
    }

    #[test]
    fn line_unfolding_joins_continuation() {
        let ics = "BEGIN:VEVENT\r\nSUMMARY:Long meeting na\r\n me\r\nDTSTART:20240617T090000Z\r\nDTEND:20240617T100000Z\r\nEND:VEVENT\r\n";
        let r = range(
            Utc.with_ymd_and_hms(2024, 6, 17, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 18, 0, 0, 0).unwrap(),
        );
        let events = decode_ics(ics, r);
        assert_eq!(events[0].summary.as_deref(), Some("Long meeting name"));
    }

    #[test]
    fn event_outside_range_excluded() {
        let ics = "BEGIN:VEVENT\r\nDTSTART:20240617T090000Z\r\nDTEND:20240617T100000Z\r\nEND:VEVENT\r\n";
        let r = range(
            Utc.with_ymd_and_hms(2024, 6, 18, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 19, 0, 0, 0).unwrap(),
        );
        assert!(decode_ics(ics, r).is_empty());
    }
}
