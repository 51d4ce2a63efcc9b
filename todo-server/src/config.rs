//! Service configuration
//!
//! Settings come from the process environment, optionally layered over a
//! dotenv file (`.env` in the working directory by default). Process
//! variables always win over file entries and the process environment is
//! never modified. Keys are matched upper-case first, then lower-case.
//! Dotenv values containing spaces must be quoted (`APP_NAME="Todo API"`).
//!
//! | Key                    | Default                                            |
//! |------------------------|----------------------------------------------------|
//! | `APP_NAME`             | `Todo API`                                         |
//! | `DEBUG`                | `false`                                            |
//! | `HOST`                 | `0.0.0.0`                                          |
//! | `PORT`                 | `8080`                                             |
//! | `DATABASE_URL`         | required                                           |
//! | `CORS_ORIGINS`         | `http://localhost:5173`, `http://localhost:3000`   |
//! | `REQUEST_TIMEOUT_SECS` | `30`                                               |

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Connections kept for steady-state load.
pub const POOL_SIZE: u32 = 10;

/// Extra connections allowed above [`POOL_SIZE`] under burst load.
pub const MAX_OVERFLOW: u32 = 20;

/// How long a request waits for a pooled connection before failing.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Server-side limit for a single SQL statement.
pub const STATEMENT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_APP_NAME: &str = "Todo API";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const REDACTED: &str = "***";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {key}")]
    Missing { key: &'static str },

    #[error("invalid value for {key} ({value:?}): {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read env file {path:?}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Immutable service settings, built once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub app_name: String,
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub cors_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl Settings {
    /// Load settings from the process environment layered over a dotenv file.
    ///
    /// With `env_file = None`, `./.env` is read when present. An explicit
    /// path must exist.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_layered(env_file, |key| std::env::var(key).ok())
    }

    fn load_layered<F>(env_file: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_vars = match env_file {
            Some(path) => read_env_file(path)?,
            None => {
                let default = Path::new(".env");
                if default.is_file() {
                    read_env_file(default)?
                } else {
                    HashMap::new()
                }
            }
        };

        Self::from_lookup(|key| env(key).or_else(|| file_vars.get(key).cloned()))
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).or_else(|| lookup(&key.to_ascii_lowercase()));

        let database_url = get("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing {
                key: "DATABASE_URL",
            })?;

        let debug = match get("DEBUG") {
            Some(v) => parse_bool("DEBUG", &v)?,
            None => false,
        };

        let port = match get("PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                value: v.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let cors_origins = match get("CORS_ORIGINS") {
            Some(v) => parse_origins(&v)?,
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(v) => match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "REQUEST_TIMEOUT_SECS",
                        value: v,
                        reason: "expected a positive number of seconds".into(),
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Self {
            app_name: get("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            debug,
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url,
            cors_origins,
            request_timeout,
        })
    }

    /// `host:port` suitable for `TcpListener::bind` (IPv6 hosts are bracketed).
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Database URL with every password replaced by `***`.
    ///
    /// Covers both the userinfo password and a `password` query parameter.
    /// Anything that isn't a parseable URL is masked entirely.
    pub fn redacted_database_url(&self) -> String {
        let Ok(mut url) = Url::parse(&self.database_url) else {
            return REDACTED.to_string();
        };

        if url.password().is_some() {
            // Only fails for URLs without a host, which carry no userinfo
            let _ = url.set_password(Some(REDACTED));
        }

        if url.query_pairs().any(|(key, _)| key == "password") {
            let pairs: Vec<(String, String)> = url
                .query_pairs()
                .map(|(key, value)| {
                    let value = if key == "password" {
                        REDACTED.to_string()
                    } else {
                        value.into_owned()
                    };
                    (key.into_owned(), value)
                })
                .collect();
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }

        url.to_string()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("app_name", &self.app_name)
            .field("debug", &self.debug)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.redacted_database_url())
            .field("cors_origins", &self.cors_origins)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let env_err = |source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    dotenvy::from_path_iter(path)
        .map_err(env_err)?
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(env_err)
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "expected a boolean".into(),
        }),
    }
}

/// Accepts a JSON array (`["http://a", "http://b"]`) or a comma-separated list.
fn parse_origins(value: &str) -> Result<Vec<String>, ConfigError> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str::<Vec<String>>(trimmed).map_err(|e| ConfigError::Invalid {
            key: "CORS_ORIGINS",
            value: value.to_string(),
            reason: e.to_string(),
        });
    }

    Ok(trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}
