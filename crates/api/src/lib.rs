pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod reminders;
pub mod routes;
pub mod state;
pub mod sync;

pub use config::Config;
pub use error::ApiError;
pub use metrics::init_metrics;
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Liveness
        .route("/healthz", get(routes::health::healthz))
        // Prometheus metrics
        .route("/metrics", get(routes::prometheus::metrics))
        // Public template lookup + availability
        .route(
            "/api/templates/:host_email/:template_slug",
            get(routes::templates::get_template),
        )
        .route(
            "/api/templates/:host_email/:template_slug/availability",
            get(routes::templates::get_availability),
        )
        // Invitee-facing booking lifecycle, no auth
        .route(
            "/api/bookings",
            post(routes::bookings::create_booking),
        )
        .route("/api/bookings/:token", get(routes::bookings::get_booking))
        .route("/api/bookings/:token/ics", get(routes::bookings::get_booking_ics))
        .route(
            "/api/bookings/:token/cancel",
            post(routes::bookings::cancel_booking_by_token),
        )
        .route(
            "/api/bookings/:token/reschedule",
            post(routes::bookings::reschedule_booking_by_token),
        )
        // Host-authenticated session exchange
        .route(
            "/api/host/sessions/exchange",
            post(routes::host::sessions::exchange_session),
        )
        // Host-authenticated template CRUD + pool management
        .route(
            "/api/host/templates",
            get(routes::host::templates::list_templates).post(routes::host::templates::create_template),
        )
        .route(
            "/api/host/templates/:id",
            get(routes::host::templates::get_template)
                .patch(routes::host::templates::update_template)
                .delete(routes::host::templates::deactivate_template),
        )
        .route(
            "/api/host/templates/:id/pool",
            get(routes::host::templates::list_pool_members).post(routes::host::templates::add_pool_member),
        )
        .route(
            "/api/host/templates/:id/pool/:host_id",
            axum::routing::delete(routes::host::templates::remove_pool_member),
        )
        // Host-authenticated working hours
        .route(
            "/api/host/working-hours",
            get(routes::host::working_hours::list_working_hours)
                .put(routes::host::working_hours::replace_working_hours),
        )
        // Host-authenticated calendar connections
        .route(
            "/api/host/calendar-connections",
            get(routes::host::calendar_connections::list_calendar_connections)
                .post(routes::host::calendar_connections::create_calendar_connection),
        )
        .route(
            "/api/host/calendar-connections/:id",
            axum::routing::delete(routes::host::calendar_connections::delete_calendar_connection),
        )
        // Host-authenticated conferencing connections
        .route(
            "/api/host/conferencing-connections",
            post(routes::host::conferencing_connections::create_conferencing_connection),
        )
        .route(
            "/api/host/conferencing-connections/:provider",
            get(routes::host::conferencing_connections::get_conferencing_connection),
        )
        .route(
            "/api/host/conferencing-connections/:id",
            axum::routing::delete(routes::host::conferencing_connections::delete_conferencing_connection),
        )
        // Host-authenticated booking management
        .route("/api/host/bookings", get(routes::host::bookings::list_bookings))
        .route(
            "/api/host/bookings/:id/approve",
            post(routes::host::bookings::approve_booking),
        )
        .route(
            "/api/host/bookings/:id/reject",
            post(routes::host::bookings::reject_booking),
        )
        .route(
            "/api/host/bookings/:id/cancel",
            post(routes::host::bookings::cancel_booking),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
