//! HTTP server command
//!
//! Runs the todo API with the resolved settings; flags override config.

use anyhow::{Context, Result};
use clap::Parser;

use todo_server::db::create_pool;
use todo_server::{run_server, Settings};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

/// Run the HTTP server (blocks until shutdown)
pub async fn run_serve(args: ServeArgs, mut settings: Settings) -> Result<()> {
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }

    tracing::info!(
        app = %settings.app_name,
        database = %settings.redacted_database_url(),
        "Starting server on {}",
        settings.bind_addr()
    );

    let pool = create_pool(&settings.database_url)
        .await
        .context("Failed to create database pool")?;

    run_server(pool, settings).await.context("Server error")?;

    Ok(())
}
