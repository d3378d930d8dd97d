/// Startup configuration, read once from the environment (spec.md
/// §6.4). Kept as ad-hoc `std::env::var` reads grouped into one
/// struct rather than a config-parsing crate, matching the reference
/// `main.rs`'s style.
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub port: u16,
    pub public_base_url: String,
    pub google_oauth_client_id: Option<String>,
    pub google_oauth_client_secret: Option<String>,
    pub zoom_oauth_client_id: Option<String>,
    pub zoom_oauth_client_secret: Option<String>,
    pub selection_token_secret: String,
    pub session_duration_hours: i64,
    pub max_schedule_days_default: i32,
    pub default_timezone: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            google_oauth_client_id: std::env::var("GOOGLE_OAUTH_CLIENT_ID").ok(),
            google_oauth_client_secret: std::env::var("GOOGLE_OAUTH_CLIENT_SECRET").ok(),
            zoom_oauth_client_id: std::env::var("ZOOM_OAUTH_CLIENT_ID").ok(),
            zoom_oauth_client_secret: std::env::var("ZOOM_OAUTH_CLIENT_SECRET").ok(),
            selection_token_secret: std::env::var("SELECTION_TOKEN_SECRET")
                .expect("SELECTION_TOKEN_SECRET must be set"),
            session_duration_hours: std::env::var("SESSION_DURATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            max_schedule_days_default: std::env::var("MAX_SCHEDULE_DAYS_DEFAULT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(90),
            default_timezone: std::env::var("DEFAULT_TIMEZONE").unwrap_or_else(|_| "UTC".to_string()),
        }
    }
}
