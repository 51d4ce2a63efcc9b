//! Create the todo schema and exit

use anyhow::{Context, Result};

use todo_server::db::{create_pool, schema};
use todo_server::Settings;

pub async fn run_init_db(settings: Settings) -> Result<()> {
    tracing::info!(database = %settings.redacted_database_url(), "Initializing database");

    let pool = create_pool(&settings.database_url)
        .await
        .context("Failed to create database pool")?;

    schema::init(&pool)
        .await
        .context("Failed to create todo schema")?;

    pool.close().await;
    println!("Database schema ready");
    Ok(())
}
