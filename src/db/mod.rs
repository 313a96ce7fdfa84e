//! PostgreSQL pool management for the OASIS API gateway
//!
//! The pool is created lazily: the gateway starts even when the database is
//! unreachable, and each request then sees the outage as a dependency failure.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::Config;

/// Database error
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Invalid database configuration: {0}")]
    ConfigurationError(String),

    #[error("Failed to run migrations: {0}")]
    MigrationError(String),

    #[error("Database health check failed: {0}")]
    HealthCheckError(String),
}

/// Create a lazily-connecting pool
pub fn create_pool(config: &Config) -> Result<PgPool, DbError> {
    tracing::info!("Configuring database pool for {}", config.database_url_masked());

    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .connect_lazy(&config.database_url)
        .map_err(|e| DbError::ConfigurationError(e.to_string()))
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DbError::MigrationError(e.to_string()))?;

    tracing::info!("Database migrations completed successfully");

    Ok(())
}

/// Check database connectivity (for health checks)
pub async fn check_health(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| DbError::HealthCheckError(e.to_string()))?;

    Ok(())
}
