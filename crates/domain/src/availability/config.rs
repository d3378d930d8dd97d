use chrono::{DateTime, Duration, Utc};

/// Slots are always emitted on a grid anchored at the enclosing
/// availability window's start, advancing in steps of this size
/// (spec §4.1, invariant 1).
pub const SLOT_GRID_MINUTES: i64 = 15;

/// Compute the effective query window: `now + min_notice` on the
/// left, `now + max_schedule_days` on the right, clamped against the
/// caller-requested `[start, end)`.
pub fn clamp_window(
    requested_start: DateTime<Utc>,
    requested_end: DateTime<Utc>,
    now: DateTime<Utc>,
    min_notice_minutes: i32,
    max_schedule_days: i32,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let earliest_start = now + Duration::minutes(min_notice_minutes as i64);
    let latest_end = now + Duration::days(max_schedule_days as i64);

    let start = requested_start.max(earliest_start);
    let end = requested_end.min(latest_end);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn clamps_both_sides() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let requested_start = now - Duration::days(1);
        let requested_end = now + Duration::days(365);
        let (start, end) = clamp_window(requested_start, requested_end, now, 60, 30);
        assert_eq!(start, now + Duration::minutes(60));
        assert_eq!(end, now + Duration::days(30));
    }

    #[test]
    fn requested_window_inside_bounds_is_unchanged() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let requested_start = now + Duration::hours(3);
        let requested_end = now + Duration::days(2);
        let (start, end) = clamp_window(requested_start, requested_end, now, 60, 30);
        assert_eq!(start, requested_start);
        assert_eq!(end, requested_end);
    }
}
