//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
///
/// Both sections are required; the tool refuses to run without them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database holding the current schema (read only).
    pub source_database: DatabaseConfig,

    /// Database set up with the version 3.0 schema (written).
    pub destination_database: DatabaseConfig,
}

/// Connection parameters for one MySQL database.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database host.
    pub host: String,

    /// Database port (default: 3306).
    #[serde(default = "default_mysql_port")]
    pub port: u16,

    /// Username.
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// Database (schema) name.
    pub database: String,

    /// TLS mode: disable, prefer, require, verify-ca, verify-full (default: disable).
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

fn default_mysql_port() -> u16 {
    3306
}

fn default_ssl_mode() -> String {
    "disable".to_string()
}
