//! Connection traits the transfer engine is written against.
//!
//! - [`Connection`]: liveness and reconnect for a single database handle
//! - [`SourceReader`]: full-snapshot reads from the current schema
//! - [`TargetWriter`]: row inserts and single-column updates on the 3.0 schema
//!
//! Every statement is parameterized and runs on its own; there is no
//! transaction spanning rows or tables.

use async_trait::async_trait;

use crate::error::Result;

use super::schema::SelectQuery;
use super::value::{Row, SqlValue};

/// A single live database handle.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Human-readable name used in log lines (e.g. `source`, `destination`).
    fn name(&self) -> &str;

    /// Check whether the handle can still run statements.
    async fn is_connected(&self) -> bool;

    /// Re-establish the handle after it dropped.
    async fn reconnect(&self) -> Result<()>;
}

/// Read rows from the source database.
#[async_trait]
pub trait SourceReader: Connection {
    /// Run `query` and return every row, in the query's order.
    async fn fetch_rows(&self, query: &SelectQuery) -> Result<Vec<Row>>;
}

/// Write rows to the destination database.
#[async_trait]
pub trait TargetWriter: Connection {
    /// Insert one row. `values` line up with `columns`.
    ///
    /// Returns the number of affected rows.
    async fn insert_row(&self, table: &str, columns: &[&str], values: Vec<SqlValue>)
        -> Result<u64>;

    /// Set `column` to `value` on the row whose `key_column` equals `key`.
    ///
    /// Returns the number of affected rows.
    async fn update_column(
        &self,
        table: &str,
        key_column: &str,
        key: SqlValue,
        column: &str,
        value: SqlValue,
    ) -> Result<u64>;
}
