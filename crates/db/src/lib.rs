pub mod models;
pub mod repositories;

pub use models::*;
pub use repositories::*;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Creates the single shared connection pool used by every tenant
/// (spec.md's multi-tenancy is row-level via `tenant_id`/`host_id`
/// columns, not per-tenant databases).
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}
