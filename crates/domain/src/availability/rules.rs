use chrono::NaiveTime;
use std::collections::HashMap;

/// One usable time-of-day window within a day's availability rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A single day's override of the host's working hours.
#[derive(Debug, Clone, Default)]
pub struct DayRule {
    pub enabled: bool,
    pub intervals: Vec<RuleInterval>,
}

/// Parsed `availability_rules` JSON blob (spec §4.2). `days` is keyed
/// by day-of-week, `0 = Sunday .. 6 = Saturday`, matching the
/// `working_hours` table's convention.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityRules {
    pub enabled: bool,
    pub days: HashMap<u8, DayRule>,
}

impl AvailabilityRules {
    /// Parse the dynamic JSON shape, tolerating both the current
    /// `{start,end}`-per-interval shape and the legacy single
    /// top-level `{start,end}` shape (lifted into a one-element
    /// `intervals`). Malformed entries are silently skipped rather
    /// than rejected, matching the source's permissive behaviour.
    pub fn parse(value: &serde_json::Value) -> Self {
        let obj = match value.as_object() {
            Some(o) => o,
            None => return Self::default(),
        };

        let enabled = obj.get("enabled").and_then(|v| v.as_bool()).unwrap_or(false);

        let mut days = HashMap::new();
        if let Some(days_obj) = obj.get("days").and_then(|v| v.as_object()) {
            for (key, day_value) in days_obj {
                let Ok(day_of_week) = key.parse::<u8>() else {
                    continue;
                };
                if day_of_week > 6 {
                    continue;
                }
                if let Some(rule) = parse_day_rule(day_value) {
                    days.insert(day_of_week, rule);
                }
            }
        }

        Self { enabled, days }
    }

    /// Union of enabled intervals for a given day-of-week, or `None`
    /// if the day has no rule or the rule is disabled.
    pub fn intervals_for_day(&self, day_of_week: u8) -> Option<&[RuleInterval]> {
        self.days
            .get(&day_of_week)
            .filter(|d| d.enabled)
            .map(|d| d.intervals.as_slice())
    }
}

fn parse_day_rule(value: &serde_json::Value) -> Option<DayRule> {
    let obj = value.as_object()?;
    let enabled = obj.get("enabled").and_then(|v| v.as_bool()).unwrap_or(false);

    let mut intervals = Vec::new();

    if let Some(arr) = obj.get("intervals").and_then(|v| v.as_array()) {
        for entry in arr {
            if let Some(interval) = parse_interval(entry) {
                intervals.push(interval);
            }
        }
    } else if obj.contains_key("start") && obj.contains_key("end") {
        // Legacy shape: single top-level start/end.
        if let Some(interval) = parse_interval(value) {
            intervals.push(interval);
        }
    }

    Some(DayRule { enabled, intervals })
}

fn parse_interval(value: &serde_json::Value) -> Option<RuleInterval> {
    let obj = value.as_object()?;
    let start = obj.get("start")?.as_str()?;
    let end = obj.get("end")?.as_str()?;
    let start = NaiveTime::parse_from_str(start, "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(end, "%H:%M").ok()?;
    Some(RuleInterval { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_current_shape() {
        let value = json!({
            "enabled": true,
            "days": {
                "1": { "enabled": true, "intervals": [
                    {"start": "09:00", "end": "10:00"},
                    {"start": "14:00", "end": "15:00"}
                ]}
            }
        });
        let rules = AvailabilityRules::parse(&value);
        assert!(rules.enabled);
        let monday = rules.intervals_for_day(1).unwrap();
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0].start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn lifts_legacy_start_end_shape() {
        let value = json!({
            "enabled": true,
            "days": {
                "0": { "enabled": true, "start": "10:00", "end": "11:00" }
            }
        });
        let rules = AvailabilityRules::parse(&value);
        let sunday = rules.intervals_for_day(0).unwrap();
        assert_eq!(sunday.len(), 1);
        assert_eq!(sunday[0].end, NaiveTime::from_hms_opt(11, 0, 0).unwrap());
    }

    #[test]
    fn skips_malformed_entries() {
        let value = json!({
            "enabled": true,
            "days": {
                "not-a-number": { "enabled": true, "intervals": [] },
                "9": { "enabled": true, "intervals": [] },
                "2": { "enabled": true, "intervals": [ {"start": "bad"} ] }
            }
        });
        let rules = AvailabilityRules::parse(&value);
        assert!(rules.days.get(&2).unwrap().intervals.is_empty());
        assert!(!rules.days.contains_key(&9));
    }

    #[test]
    fn disabled_day_returns_none() {
        let value = json!({
            "enabled": true,
            "days": { "3": { "enabled": false, "intervals": [{"start":"09:00","end":"10:00"}] } }
        });
        let rules = AvailabilityRules::parse(&value);
        assert!(rules.intervals_for_day(3).is_none());
    }

    #[test]
    fn non_object_input_yields_default() {
        let rules = AvailabilityRules::parse(&serde_json::Value::Null);
        assert!(!rules.enabled);
        assert!(rules.days.is_empty());
    }
}
