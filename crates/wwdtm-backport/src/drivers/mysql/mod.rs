//! MySQL/MariaDB database driver.
//!
//! - [`MysqlDialect`]: SQL text for selects, inserts and updates
//! - [`MysqlConnection`]: single-connection handle implementing both
//!   [`SourceReader`](crate::core::SourceReader) and
//!   [`TargetWriter`](crate::core::TargetWriter)
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+
//! - MariaDB 10.2+

mod connection;
mod dialect;

pub use connection::MysqlConnection;
pub use dialect::MysqlDialect;
