//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. Every connection is
//! checked before it is handed out and carries a server-side statement
//! timeout.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::{ACQUIRE_TIMEOUT, MAX_OVERFLOW, POOL_SIZE, STATEMENT_TIMEOUT};

/// Upper bound on simultaneously open connections.
pub const MAX_CONNECTIONS: u32 = POOL_SIZE + MAX_OVERFLOW;

/// Create a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the first connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/todos").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, MAX_CONNECTIONS).await
}

/// Create a PostgreSQL connection pool with a custom connection limit.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(database_url)?.options([(
        "statement_timeout",
        STATEMENT_TIMEOUT.as_millis().to_string(),
    )]);

    tracing::debug!(
        max_connections,
        acquire_timeout_secs = ACQUIRE_TIMEOUT.as_secs(),
        "Creating connection pool"
    );

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .test_before_acquire(true)
        .connect_with(options)
        .await
}
