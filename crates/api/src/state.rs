use integrations::calendar::GoogleOAuthConfig;
use integrations::conferencing::ZoomConfig;
use integrations::{CalendarAdapter, EmailPort, LoggingEmailSink};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;

/// Application state shared across all handlers and background loops.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub calendar: Arc<CalendarAdapter>,
    pub email: Arc<dyn EmailPort>,
    pub http: reqwest::Client,
    pub zoom_config: Option<Arc<ZoomConfig>>,
    pub selection_token_secret: Vec<u8>,
    pub session_duration_hours: i64,
    pub max_schedule_days_default: i32,
    pub default_timezone: String,
    pub public_base_url: String,
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config, metrics_handle: PrometheusHandle) -> Self {
        let google_oauth = match (&config.google_oauth_client_id, &config.google_oauth_client_secret) {
            (Some(id), Some(secret)) => Some(GoogleOAuthConfig {
                client_id: id.clone(),
                client_secret: secret.clone(),
            }),
            _ => None,
        };
        let zoom_config = match (&config.zoom_oauth_client_id, &config.zoom_oauth_client_secret) {
            (Some(id), Some(secret)) => Some(Arc::new(ZoomConfig {
                client_id: id.clone(),
                client_secret: secret.clone(),
            })),
            _ => None,
        };

        Self {
            pool,
            calendar: Arc::new(CalendarAdapter::new(google_oauth)),
            email: Arc::new(LoggingEmailSink),
            http: reqwest::Client::new(),
            zoom_config,
            selection_token_secret: config.selection_token_secret.as_bytes().to_vec(),
            session_duration_hours: config.session_duration_hours,
            max_schedule_days_default: config.max_schedule_days_default,
            default_timezone: config.default_timezone.clone(),
            public_base_url: config.public_base_url.clone(),
            metrics_handle,
        }
    }
}
