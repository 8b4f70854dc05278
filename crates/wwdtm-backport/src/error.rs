//! Error types for the backport library.

use thiserror::Error;

/// Main error type for backport operations.
#[derive(Error, Debug)]
pub enum BackportError {
    /// Configuration error (invalid JSON/YAML, missing sections, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A database handle was not connected and could not be reconnected
    #[error("Connection error: {message}\n  Context: {context}")]
    Connection { message: String, context: String },

    /// Error reported by the MySQL driver, passed through as-is
    #[error("Database error: {0}")]
    Database(#[from] mysql_async::Error),

    /// Statement rejected by a non-MySQL backend
    #[error("Statement failed for table {table}: {message}")]
    Statement { table: String, message: String },

    /// Source row could not be decoded into its entity record
    #[error("Cannot decode column {column} of table {table}: {message}")]
    Decode {
        table: String,
        column: String,
        message: String,
    },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl BackportError {
    /// Create a Connection error with context about where it occurred
    pub fn connection(message: impl ToString, context: impl Into<String>) -> Self {
        BackportError::Connection {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Create a Statement error
    pub fn statement(table: impl Into<String>, message: impl Into<String>) -> Self {
        BackportError::Statement {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a Decode error
    pub fn decode(
        table: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        BackportError::Decode {
            table: table.into(),
            column: column.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for backport operations.
pub type Result<T> = std::result::Result<T, BackportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detailed_includes_message() {
        let err = BackportError::statement("ww_shows", "Duplicate entry '1' for key 'PRIMARY'");
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: Statement failed for table ww_shows"));
        assert!(detailed.contains("Duplicate entry"));
    }

    #[test]
    fn test_format_detailed_walks_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.json missing");
        let err = BackportError::from(io);
        let detailed = err.format_detailed();
        assert!(detailed.contains("IO error: config.json missing"));
    }

    #[test]
    fn test_connection_error_carries_context() {
        let err = BackportError::connection("refused", "reconnecting source");
        assert_eq!(
            err.to_string(),
            "Connection error: refused\n  Context: reconnecting source"
        );
    }
}
