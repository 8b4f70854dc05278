//! Core abstractions shared by the drivers and the transfer engine.
//!
//! - [`schema`]: per-table column mappings and source queries
//! - [`value`]: SQL values and rows with typed accessors
//! - [`traits`]: connection traits implemented by the drivers
//!
//! The transfer engine only sees these types, so it can be exercised against
//! an in-memory backend in tests and against MySQL in production.

pub mod schema;
pub mod traits;
pub mod value;

pub use schema::{ColumnSpec, SelectQuery, SourceFilter, TableSpec};
pub use traits::{Connection, SourceReader, TargetWriter};
pub use value::{Row, SqlValue};
