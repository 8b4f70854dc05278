//! Configuration loading and validation.
//!
//! The configuration file holds exactly two sections, `source_database` and
//! `destination_database`. Files ending in `.yaml`/`.yml` are read as YAML,
//! everything else as JSON.

mod types;
mod validation;

pub use types::*;

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{BackportError, Result};

/// Keys that must be present at the top level of the configuration.
const REQUIRED_SECTIONS: [&str; 2] = ["source_database", "destination_database"];

impl Config {
    /// Load configuration from a file, failing on any problem.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Load configuration, returning `None` when it is missing or unusable.
    ///
    /// A `None` means there is nothing to do: the caller must not touch
    /// either database.
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                debug!("Loaded configuration from {:?}", path);
                Some(config)
            }
            Err(e) => {
                warn!("No usable configuration in {:?}: {}", path, e);
                None
            }
        }
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        check_sections(&value)?;
        let config: Config = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        check_sections(&value)?;
        let config: Config = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

/// Reject empty, non-object, or incomplete documents before deserializing.
fn check_sections(value: &serde_json::Value) -> Result<()> {
    let object = match value.as_object() {
        Some(object) if !object.is_empty() => object,
        Some(_) => return Err(BackportError::Config("configuration is empty".into())),
        None => {
            return Err(BackportError::Config(
                "configuration must be a JSON object".into(),
            ))
        }
    };

    for section in REQUIRED_SECTIONS {
        match object.get(section) {
            Some(serde_json::Value::Object(_)) => {}
            Some(_) => {
                return Err(BackportError::Config(format!(
                    "{section} must be an object"
                )))
            }
            None => return Err(BackportError::Config(format!("{section} is required"))),
        }
    }
    Ok(())
}
