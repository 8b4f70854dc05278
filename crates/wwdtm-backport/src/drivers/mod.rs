//! Database driver implementations.
//!
//! Each driver implements the connection traits from [`crate::core::traits`].
//! Both schema versions of the stats database live on MySQL/MariaDB, so
//! [`mysql`] is the only driver.

pub mod mysql;

pub use mysql::{MysqlConnection, MysqlDialect};
