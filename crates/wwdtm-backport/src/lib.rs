//! # wwdtm-backport
//!
//! Copies the current Wait Wait... Don't Tell Me! Stats Database into an
//! empty database laid out in the older 3.0 schema.
//!
//! A run reads every row of fourteen tables from the source and inserts them,
//! keys unchanged, into the destination:
//!
//! - **Entity tables** first (shows, descriptions, notes, guests, hosts,
//!   locations, panelists, scorekeepers), then the six **mapping tables**
//!   that reference them
//! - **Show repeats** are written in a second pass once every show exists
//! - **Text normalization** strips names and descriptions down to ASCII
//! - **Bluff mapping** keeps only the first-segment rows the 3.0 schema models
//!
//! Statements run one at a time with no surrounding transaction. A failure
//! stops the run and leaves the destination partially populated.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wwdtm_backport::{Config, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> wwdtm_backport::Result<()> {
//!     let config = Config::load("config.json")?;
//!     let orchestrator = Orchestrator::connect(&config).await?;
//!     let result = orchestrator.run().await?;
//!     println!("Backported {} rows", result.rows_transferred);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod drivers;
pub mod entity;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod transfer;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use config::{Config, DatabaseConfig};
pub use core::{Connection, Row, SourceReader, SqlValue, TargetWriter};
pub use drivers::MysqlConnection;
pub use error::{BackportError, Result};
pub use orchestrator::{MigrationResult, Orchestrator};
pub use transfer::{MappingTransfers, ShowTransfer, TableTransfer, TransferStats, TransferUnit};
