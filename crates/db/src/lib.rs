//! PostgreSQL persistence layer for the KISS portal.
//!
//! One model module and one repository per table. Repositories are
//! stateless structs with associated async functions taking a pool
//! reference, so handlers stay free of SQL.

pub mod models;
pub mod repositories;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Convenience alias used throughout the workspace.
pub type DbPool = PgPool;

/// Maximum connections in the pool.
const MAX_CONNECTIONS: u32 = 10;

/// How long to wait for a connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a connection pool for the given database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}

/// Verify the database is reachable with a trivial round trip.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Apply pending migrations from the embedded `migrations/` directory.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Clamp a requested page size into `1..=max`, defaulting to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a requested offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_clamping() {
        assert_eq!(clamp_limit(None, 50, 100), 50);
        assert_eq!(clamp_limit(Some(20), 50, 100), 20);
        assert_eq!(clamp_limit(Some(0), 50, 100), 1);
        assert_eq!(clamp_limit(Some(-5), 50, 100), 1);
        assert_eq!(clamp_limit(Some(500), 50, 100), 100);
    }

    #[test]
    fn offset_clamping() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(30)), 30);
        assert_eq!(clamp_offset(Some(-1)), 0);
    }
}
