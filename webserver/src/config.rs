//! Validated server configuration
//!
//! Raw values come from the command line or `LEARNING_*` environment
//! variables (see `main.rs`) and are checked here before anything starts.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{WebServerError, WebServerResult};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Where the SQLite database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

impl FromStr for DatabaseLocation {
    type Err = WebServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(WebServerError::config("database location must not be empty")),
            ":memory:" => Ok(DatabaseLocation::InMemory),
            path => Ok(DatabaseLocation::File(PathBuf::from(path))),
        }
    }
}

impl fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseLocation::InMemory => write!(f, ":memory:"),
            DatabaseLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub database: DatabaseLocation,
    pub log_level: String,
    /// Existing user granted the Admin role on startup
    pub seed_admin_email: Option<String>,
}

impl ServerConfig {
    pub fn new(
        host: &str,
        port: u16,
        database: &str,
        log_level: &str,
        seed_admin_email: Option<String>,
    ) -> WebServerResult<Self> {
        let bind_address: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| WebServerError::config(format!("Invalid bind address {host}:{port}: {e}")))?;

        let log_level = log_level.trim().to_lowercase();
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(WebServerError::config(format!("Invalid log level: {log_level}")));
        }

        Ok(Self {
            bind_address,
            database: database.parse()?,
            log_level,
            seed_admin_email: seed_admin_email.filter(|email| !email.trim().is_empty()),
        })
    }
}
