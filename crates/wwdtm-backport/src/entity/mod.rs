//! Strongly typed records for every table that is backported.
//!
//! Each record declares its [`TableSpec`] next to its fields, so the source
//! and destination column names for a table live in exactly one place.

mod mappings;
mod tables;

pub use mappings::{BluffMap, GuestMap, HostMap, LocationMap, PanelistMap, ScorekeeperMap};
pub use tables::{Description, Guest, Host, Location, Note, Panelist, Scorekeeper, Show};

use crate::core::{Row, SqlValue, TableSpec};
use crate::error::Result;

/// A table row that can be read from the current schema and written to the
/// 3.0 schema.
pub trait Entity: Sized + Send + Sync + 'static {
    /// Table and column mapping.
    const SPEC: TableSpec;

    /// Decode a source row.
    fn from_row(row: &Row) -> Result<Self>;

    /// Primary key, identical in both schemas.
    fn key(&self) -> i64;

    /// Values for the destination insert, in `SPEC.columns` order and
    /// before text normalization.
    fn to_values(&self) -> Vec<SqlValue>;
}
