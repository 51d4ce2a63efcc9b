//! Error types for todo-server startup and serving

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DbError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] DbError),

    #[error("invalid CORS origin {origin:?}")]
    InvalidOrigin { origin: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
