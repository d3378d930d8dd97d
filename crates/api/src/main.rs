use std::net::SocketAddr;

use api::{create_app, init_metrics, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Check for --migrate-only flag
    let migrate_only = std::env::args().any(|arg| arg == "--migrate-only");

    // Initialize Prometheus metrics
    let metrics_handle = init_metrics();
    tracing::info!("Prometheus metrics initialized");

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get configuration from environment (spec.md §6, SPEC_FULL.md §6.4)
    let config = Config::from_env();

    // Create database pool
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Database migrations complete");

    // Exit early if only running migrations
    if migrate_only {
        tracing::info!("Migration-only mode, exiting");
        return;
    }

    // Create app state
    let state = AppState::new(pool, &config, metrics_handle);

    // Background loops (spec.md §4.6, §4.7): calendar sync and reminders.
    // Both are long-lived tasks that tick forever; process shutdown is
    // the single termination signal per spec.md §5.
    tokio::spawn(api::sync::run(state.clone()));
    tokio::spawn(api::reminders::run(state.clone()));

    // Create the app
    let app = create_app(state);

    let addr = SocketAddr::from((
        config
            .bind_addr
            .parse::<std::net::IpAddr>()
            .unwrap_or([0, 0, 0, 0].into()),
        config.port,
    ));
    tracing::info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
