//! Configuration validation.

use super::{Config, DatabaseConfig};
use crate::error::{BackportError, Result};

const SSL_MODES: &[&str] = &[
    "disable",
    "prefer",
    "require",
    "verify-ca",
    "verify_ca",
    "verify-full",
    "verify_identity",
];

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    validate_database("source_database", &config.source_database)?;
    validate_database("destination_database", &config.destination_database)?;

    // Cannot backport into the database being read
    let src = &config.source_database;
    let dst = &config.destination_database;
    if src.host == dst.host && src.port == dst.port && src.database == dst.database {
        return Err(BackportError::Config(
            "source_database and destination_database cannot be the same database".into(),
        ));
    }

    Ok(())
}

fn validate_database(section: &str, db: &DatabaseConfig) -> Result<()> {
    if db.host.is_empty() {
        return Err(BackportError::Config(format!("{section}.host is required")));
    }
    if db.user.is_empty() {
        return Err(BackportError::Config(format!("{section}.user is required")));
    }
    if db.database.is_empty() {
        return Err(BackportError::Config(format!(
            "{section}.database is required"
        )));
    }
    if !SSL_MODES.contains(&db.ssl_mode.to_lowercase().as_str()) {
        return Err(BackportError::Config(format!(
            "{section}.ssl_mode must be one of {}, got '{}'",
            SSL_MODES.join(", "),
            db.ssl_mode
        )));
    }
    Ok(())
}
