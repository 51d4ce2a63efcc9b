//! Show the resolved configuration

use anyhow::Result;
use serde_json::{json, Value};

use todo_server::Settings;

/// Print settings as pretty JSON. The database password is masked.
pub fn run_config(settings: &Settings) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&settings_json(settings))?);
    Ok(())
}

fn settings_json(settings: &Settings) -> Value {
    json!({
        "app_name": settings.app_name,
        "debug": settings.debug,
        "host": settings.host,
        "port": settings.port,
        "database_url": settings.redacted_database_url(),
        "cors_origins": settings.cors_origins,
        "request_timeout_secs": settings.request_timeout.as_secs(),
    })
}
