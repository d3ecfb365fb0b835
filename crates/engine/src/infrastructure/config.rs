//! Engine configuration read from the environment.

use std::env;

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_DB_PATH: &str = "grimoire.db";

/// Runtime settings for the engine binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    /// Path of the SQLite database file, created when missing
    pub db_path: String,
    /// Raw `CORS_ALLOWED_ORIGINS` value, `None` leaves CORS off
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            db_path: DEFAULT_DB_PATH.to_string(),
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    /// Read settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let server_host = lookup("SERVER_HOST")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.server_host);

        let server_port = lookup("SERVER_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|value| match value.trim().parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    tracing::warn!(value = %value, "Ignoring invalid server port");
                    None
                }
            })
            .unwrap_or(defaults.server_port);

        let db_path = lookup("GRIMOIRE_DB")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.db_path);

        let cors_allowed_origins =
            lookup("CORS_ALLOWED_ORIGINS").filter(|value| !value.trim().is_empty());

        Self {
            server_host,
            server_port,
            db_path,
            cors_allowed_origins,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
