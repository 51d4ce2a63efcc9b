//! todo-server: HTTP service for todo items
//!
//! Create, list (paginated), fetch, update, and delete todos stored in
//! Postgres. Request bodies are validated field by field and every error
//! is returned as a problem-details document.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod state;

pub use config::Settings;
pub use error::{Error, Result};
pub use http::{build_router, run_server};
pub use state::AppState;
