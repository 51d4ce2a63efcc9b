//! todo-api CLI - run and manage the todo HTTP service
//!
//! - `serve`: run the HTTP API
//! - `init-db`: create the database schema
//! - `config`: show the resolved configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todo_server::Settings;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "todo-api",
    author,
    version,
    about = "Todo list HTTP API backed by Postgres",
    long_about = "Create, list, update, and delete todos over a JSON API. Configuration \
                  comes from environment variables, optionally layered over a .env file."
)]
struct Cli {
    /// Read settings from this dotenv file instead of ./.env
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Enable debug logging (overrides DEBUG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create the todo table and index, then exit
    InitDb,
    /// Print the resolved configuration as JSON (password masked)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.env_file.as_deref())
        .context("Failed to load configuration")?;
    settings.debug |= cli.debug;

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: settings.debug,
    })
    .ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, settings).await?,
        Commands::InitDb => commands::run_init_db(settings).await?,
        Commands::Config => commands::run_config(&settings)?,
    }
    Ok(())
}
