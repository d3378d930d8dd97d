//! Periodic external-calendar sync loop (spec §4.6). Every connection
//! is probed independently; one failure never stops the tick.

use chrono::{Duration as ChronoDuration, Utc};
use db::CalendarConnectionRepository;
use shared::types::SyncStatus;
use std::time::Duration;

use crate::metrics::{record_sync_connection_error, record_sync_tick};
use crate::routes::host::calendar_connections::to_connection_info;
use crate::state::AppState;

const SYNC_INTERVAL: Duration = Duration::from_secs(15 * 60);
const PROBE_WINDOW_HOURS: i64 = 24;

/// Spawns the sync loop on the current Tokio runtime. Runs forever;
/// intended to be spawned once from `main`.
pub async fn run(state: AppState) {
    let mut ticker = tokio::time::interval(SYNC_INTERVAL);
    loop {
        ticker.tick().await;
        tick(&state).await;
    }
}

async fn tick(state: &AppState) {
    let connections = match CalendarConnectionRepository::list_all(&state.pool).await {
        Ok(c) => c,
        Err(err) => {
            tracing::error!("sync tick: failed to list calendar connections: {err}");
            record_sync_tick("list_failed");
            return;
        }
    };

    let now = Utc::now();
    for conn in connections {
        let mut info = to_connection_info(&conn);

        match state.calendar.refresh_tokens(&info, now).await {
            Ok(Some(refreshed)) => {
                if let Err(err) = CalendarConnectionRepository::update_tokens(
                    &state.pool,
                    conn.id,
                    &refreshed.access_token,
                    refreshed.refresh_token.as_deref(),
                    refreshed.expires_at,
                )
                .await
                {
                    tracing::warn!("sync tick: failed to persist refreshed tokens for {}: {err}", conn.id);
                }
                info.access_token = Some(refreshed.access_token);
            }
            Ok(None) => {}
            Err(integrations::ProviderError::Unsupported) => {}
            Err(err) => {
                tracing::warn!("sync tick: token refresh failed for {}: {err}", conn.id);
            }
        }

        // Health probe (spec §4.6): a real `busy_times` call over
        // [now, now+24h), not a capability-only `validate()` no-op —
        // for Google, `validate()` never contacts the remote calendar
        // at all, so it can never observe an auth failure.
        let probe = state
            .calendar
            .busy_times(&info, now, now + ChronoDuration::hours(PROBE_WINDOW_HOURS))
            .await;

        let (status, error) = match probe {
            Ok(_) => (SyncStatus::Synced, None),
            Err(integrations::ProviderError::Auth) => (
                SyncStatus::Failed,
                Some("Authentication failed. Please reconnect your calendar.".to_string()),
            ),
            Err(err) => (SyncStatus::Failed, Some(err.to_string())),
        };

        if status == SyncStatus::Failed {
            tracing::warn!("sync tick: connection {} probe failed", conn.id);
            record_sync_connection_error();
        }

        if let Err(err) =
            CalendarConnectionRepository::record_sync_result(&state.pool, conn.id, status, error.as_deref()).await
        {
            tracing::warn!("sync tick: failed to record sync result for {}: {err}", conn.id);
        }
    }

    record_sync_tick("ok");
}
