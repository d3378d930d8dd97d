use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use shared::types::{DurationMinutes, TimeSlot, WorkingHours};

use super::config::SLOT_GRID_MINUTES;
use super::rules::{AvailabilityRules, RuleInterval};

/// Pure slot-generation engine. Takes pre-loaded data (working hours,
/// busy intervals already buffer-expanded and merged) and is oblivious
/// to persistence or providers — those are the caller's job.
pub struct AvailabilityEngine;

impl AvailabilityEngine {
    /// Single-host slot computation (spec §4.1, steps 1–4 once the
    /// busy set has been assembled by the caller). `window` must
    /// already be clamped to `[earliest_start, latest_end)`.
    pub fn single_host_slots(
        window: (DateTime<Utc>, DateTime<Utc>),
        host_tz: Tz,
        working_hours: &[WorkingHours],
        rules: Option<&AvailabilityRules>,
        duration: DurationMinutes,
        busy: &[TimeSlot],
    ) -> Vec<TimeSlot> {
        let (effective_start, effective_end) = window;
        if effective_end <= effective_start || duration.is_zero() {
            return Vec::new();
        }

        let mut slots = Vec::new();

        let local_start_date = effective_start.with_timezone(&host_tz).date_naive();
        let local_end_date = effective_end.with_timezone(&host_tz).date_naive();

        let mut day = local_start_date;
        while day <= local_end_date {
            let day_of_week = day_of_week_sunday_zero(day);
            let day_windows = Self::day_windows(day_of_week, working_hours, rules);

            for rule_window in day_windows {
                let Some(window_utc) = local_window_to_utc(day, rule_window, host_tz) else {
                    continue;
                };
                Self::emit_grid_slots(
                    window_utc,
                    duration,
                    busy,
                    effective_start,
                    effective_end,
                    &mut slots,
                );
            }

            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        slots.sort_by_key(|s| s.start);
        slots.dedup();
        slots
    }

    /// Availability windows (as local time-of-day intervals) for a
    /// given day-of-week: the template's `availability_rules` if
    /// enabled and the day has an enabled rule, else the union of the
    /// host's enabled `WorkingHours` rows for that day.
    fn day_windows(
        day_of_week: u8,
        working_hours: &[WorkingHours],
        rules: Option<&AvailabilityRules>,
    ) -> Vec<(NaiveTime, NaiveTime)> {
        if let Some(rules) = rules {
            if rules.enabled {
                return match rules.intervals_for_day(day_of_week) {
                    Some(intervals) => intervals.iter().map(|i| (i.start, i.end)).collect(),
                    None => Vec::new(),
                };
            }
        }

        working_hours
            .iter()
            .filter(|wh| wh.day_of_week == day_of_week && wh.is_active)
            .filter(|wh| wh.end_time > wh.start_time)
            .map(|wh| (wh.start_time, wh.end_time))
            .collect()
    }

    fn emit_grid_slots(
        window: TimeSlot,
        duration: DurationMinutes,
        busy: &[TimeSlot],
        earliest_start: DateTime<Utc>,
        latest_end: DateTime<Utc>,
        out: &mut Vec<TimeSlot>,
    ) {
        let grid_step = Duration::minutes(SLOT_GRID_MINUTES);
        let mut cursor = window.start;
        while cursor < window.end {
            let slot_end = cursor + duration.as_chrono_duration();
            if slot_end > window.end {
                break;
            }
            if cursor >= earliest_start
                && slot_end <= latest_end
                && !busy.iter().any(|b| slot_overlaps(cursor, slot_end, b))
            {
                if let Ok(slot) = TimeSlot::new(cursor, slot_end) {
                    out.push(slot);
                }
            }
            cursor += grid_step;
        }
    }

    /// Pooled intersection (spec §4.1 "Pooled path"): exact-equality
    /// reduction of each required host's single-host slot list.
    /// Returns `None` immediately once the accumulator empties.
    pub fn pool_intersection(mut per_host_slots: Vec<Vec<TimeSlot>>) -> Vec<TimeSlot> {
        let Some(first) = per_host_slots.pop() else {
            return Vec::new();
        };
        let mut acc: std::collections::HashSet<(DateTime<Utc>, DateTime<Utc>)> =
            first.into_iter().map(|s| (s.start, s.end)).collect();

        for host_slots in per_host_slots {
            if acc.is_empty() {
                break;
            }
            let host_set: std::collections::HashSet<(DateTime<Utc>, DateTime<Utc>)> =
                host_slots.into_iter().map(|s| (s.start, s.end)).collect();
            acc.retain(|key| host_set.contains(key));
        }

        let mut result: Vec<TimeSlot> = acc
            .into_iter()
            .map(|(start, end)| TimeSlot { start, end })
            .collect();
        result.sort_by_key(|s| s.start);
        result
    }
}

fn slot_overlaps(start: DateTime<Utc>, end: DateTime<Utc>, busy: &TimeSlot) -> bool {
    start < busy.end && busy.start < end
}

/// `0 = Sunday .. 6 = Saturday`, matching the working-hours table and
/// the availability-rule schema (spec §9, Open Question 4).
fn day_of_week_sunday_zero(date: NaiveDate) -> u8 {
    use chrono::Datelike;
    date.weekday().num_days_from_sunday() as u8
}

fn local_window_to_utc(
    day: NaiveDate,
    window: (NaiveTime, NaiveTime),
    tz: Tz,
) -> Option<TimeSlot> {
    let (start_time, end_time) = window;
    if end_time <= start_time {
        return None;
    }
    let local_start = day.and_time(start_time);
    let local_end = day.and_time(end_time);

    let start_utc = tz
        .from_local_datetime(&local_start)
        .earliest()?
        .with_timezone(&Utc);
    let end_utc = tz
        .from_local_datetime(&local_end)
        .earliest()?
        .with_timezone(&Utc);

    TimeSlot::new(start_utc, end_utc).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::types::merge_intervals;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn wh(day: u8, sh: u32, sm: u32, eh: u32, em: u32) -> WorkingHours {
        WorkingHours::new(
            day,
            NaiveTime::from_hms_opt(sh, sm, 0).unwrap(),
            NaiveTime::from_hms_opt(eh, em, 0).unwrap(),
        )
    }

    // S1 — single host, busy in middle.
    #[test]
    fn s1_single_host_busy_in_middle() {
        // 2024-06-17 is a Monday.
        let working_hours = vec![wh(1, 9, 0, 12, 0)];
        let busy = vec![TimeSlot::new(utc(2024, 6, 17, 10, 0), utc(2024, 6, 17, 10, 30)).unwrap()];
        let window = (utc(2024, 6, 17, 0, 0), utc(2024, 6, 18, 0, 0));

        let slots = AvailabilityEngine::single_host_slots(
            window,
            Tz::UTC,
            &working_hours,
            None,
            DurationMinutes::new(30),
            &busy,
        );

        let starts: Vec<String> = slots.iter().map(|s| s.start.format("%H:%M").to_string()).collect();
        assert_eq!(
            starts,
            vec!["09:00", "09:15", "09:30", "10:30", "10:45", "11:00", "11:30"]
        );
    }

    // S2 — template rules override working hours.
    #[test]
    fn s2_rules_override_working_hours() {
        let working_hours = vec![wh(1, 9, 0, 17, 0)];
        let rules = AvailabilityRules::parse(&serde_json::json!({
            "enabled": true,
            "days": {
                "1": { "enabled": true, "intervals": [
                    {"start": "09:00", "end": "10:00"},
                    {"start": "14:00", "end": "15:00"}
                ]}
            }
        }));
        let window = (utc(2024, 6, 17, 0, 0), utc(2024, 6, 18, 0, 0));

        let slots = AvailabilityEngine::single_host_slots(
            window,
            Tz::UTC,
            &working_hours,
            Some(&rules),
            DurationMinutes::new(30),
            &[],
        );

        let starts: Vec<String> = slots.iter().map(|s| s.start.format("%H:%M").to_string()).collect();
        assert_eq!(starts, vec!["09:00", "09:15", "09:30", "14:00", "14:15", "14:30"]);
    }

    // S3 — pool intersection.
    #[test]
    fn s3_pool_intersection() {
        let host_a = vec![
            TimeSlot::new(utc(2024, 6, 17, 9, 0), utc(2024, 6, 17, 9, 30)).unwrap(),
            TimeSlot::new(utc(2024, 6, 17, 9, 30), utc(2024, 6, 17, 10, 0)).unwrap(),
            TimeSlot::new(utc(2024, 6, 17, 14, 0), utc(2024, 6, 17, 14, 30)).unwrap(),
            TimeSlot::new(utc(2024, 6, 17, 14, 30), utc(2024, 6, 17, 15, 0)).unwrap(),
        ];
        let host_b = vec![
            TimeSlot::new(utc(2024, 6, 17, 9, 30), utc(2024, 6, 17, 10, 0)).unwrap(),
            TimeSlot::new(utc(2024, 6, 17, 14, 30), utc(2024, 6, 17, 15, 0)).unwrap(),
        ];

        let result = AvailabilityEngine::pool_intersection(vec![host_a, host_b]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].start, utc(2024, 6, 17, 9, 30));
        assert_eq!(result[1].start, utc(2024, 6, 17, 14, 30));
    }

    #[test]
    fn pool_intersection_subset_invariant() {
        let host_a = vec![TimeSlot::new(utc(2024, 6, 17, 9, 0), utc(2024, 6, 17, 9, 30)).unwrap()];
        let host_b: Vec<TimeSlot> = vec![];
        let result = AvailabilityEngine::pool_intersection(vec![host_a, host_b]);
        assert!(result.is_empty());
    }

    #[test]
    fn slots_are_disjoint_from_buffered_busy_set() {
        let working_hours = vec![wh(1, 9, 0, 12, 0)];
        let raw_busy = vec![
            TimeSlot::new(utc(2024, 6, 17, 10, 0), utc(2024, 6, 17, 10, 15)).unwrap(),
            TimeSlot::new(utc(2024, 6, 17, 10, 10), utc(2024, 6, 17, 10, 30)).unwrap(),
        ];
        let busy = merge_intervals(&raw_busy);
        let window = (utc(2024, 6, 17, 0, 0), utc(2024, 6, 18, 0, 0));

        let slots = AvailabilityEngine::single_host_slots(
            window,
            Tz::UTC,
            &working_hours,
            None,
            DurationMinutes::new(15),
            &busy,
        );
        for slot in &slots {
            for b in &busy {
                assert!(!(slot.start < b.end && b.start < slot.end));
            }
        }
    }

    #[test]
    fn no_slot_outside_notice_and_horizon_bounds() {
        let working_hours = vec![wh(1, 0, 0, 23, 45)];
        let earliest = utc(2024, 6, 17, 10, 0);
        let latest = utc(2024, 6, 17, 11, 0);
        let window = (earliest, latest);

        let slots = AvailabilityEngine::single_host_slots(
            window,
            Tz::UTC,
            &working_hours,
            None,
            DurationMinutes::new(15),
            &[],
        );
        for slot in &slots {
            assert!(slot.start >= earliest);
            assert!(slot.end <= latest);
        }
    }
}
