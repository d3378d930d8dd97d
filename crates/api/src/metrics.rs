//! Prometheus metrics for the scheduling kernel.
//!
//! Covers availability queries, booking lifecycle transitions, and the
//! two background loops (calendar sync, reminders).

use metrics::{counter, histogram};
use std::time::Instant;

/// Metric names
pub mod names {
    pub const AVAILABILITY_QUERY_DURATION: &str = "availability_query_duration_seconds";
    pub const BOOKINGS_CREATED: &str = "bookings_created_total";
    pub const BOOKING_CONFLICTS: &str = "booking_conflicts_total";
    pub const BOOKING_CANCELLATIONS: &str = "booking_cancellations_total";
    pub const BOOKING_RESCHEDULES: &str = "booking_reschedules_total";
    pub const SYNC_TICKS: &str = "calendar_sync_ticks_total";
    pub const SYNC_CONNECTION_ERRORS: &str = "calendar_sync_connection_errors_total";
    pub const REMINDER_TICKS: &str = "reminder_ticks_total";
    pub const REMINDERS_SENT: &str = "reminders_sent_total";
}

/// Record a booking creation, tagged by tenant and whether it conflicted.
pub fn record_booking_created(tenant_id: &str) {
    counter!(names::BOOKINGS_CREATED, "tenant_id" => tenant_id.to_string()).increment(1);
}

/// Record a booking rejected for pool capacity or slot conflict.
pub fn record_conflict(tenant_id: &str) {
    counter!(names::BOOKING_CONFLICTS, "tenant_id" => tenant_id.to_string()).increment(1);
}

pub fn record_cancellation(tenant_id: &str) {
    counter!(names::BOOKING_CANCELLATIONS, "tenant_id" => tenant_id.to_string()).increment(1);
}

pub fn record_reschedule(tenant_id: &str) {
    counter!(names::BOOKING_RESCHEDULES, "tenant_id" => tenant_id.to_string()).increment(1);
}

/// Record one calendar-sync loop tick, tagged by outcome (`"ok"` or `"error"`).
pub fn record_sync_tick(outcome: &str) {
    counter!(names::SYNC_TICKS, "outcome" => outcome.to_string()).increment(1);
}

pub fn record_sync_connection_error() {
    counter!(names::SYNC_CONNECTION_ERRORS).increment(1);
}

/// Record one reminder loop tick, with the number of reminders sent.
pub fn record_reminder_tick(sent: u64) {
    counter!(names::REMINDER_TICKS).increment(1);
    counter!(names::REMINDERS_SENT).increment(sent);
}

/// Timing helper for the availability query handler.
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        histogram!(names::AVAILABILITY_QUERY_DURATION).record(duration);
    }
}

/// Initialize the Prometheus metrics exporter. Returns a handle used
/// to render `/metrics`.
pub fn init_metrics() -> metrics_exporter_prometheus::PrometheusHandle {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    builder
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder")
}
