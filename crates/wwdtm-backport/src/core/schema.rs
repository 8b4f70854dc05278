//! Table metadata: which columns move from which source table to which
//! destination table, and how.

use super::value::SqlValue;

/// Mapping for one column between the source and destination schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name in the current schema.
    pub source: &'static str,
    /// Column name in the version 3.0 schema.
    pub destination: &'static str,
    /// Run the value through the ASCII text normalizer before writing.
    pub normalize: bool,
}

impl ColumnSpec {
    /// Column with the same name in both schemas, copied as-is.
    pub const fn plain(name: &'static str) -> Self {
        Self {
            source: name,
            destination: name,
            normalize: false,
        }
    }

    /// Column with the same name in both schemas, normalized to ASCII.
    pub const fn text(name: &'static str) -> Self {
        Self {
            source: name,
            destination: name,
            normalize: true,
        }
    }
}

/// Equality filter applied to the source query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFilter {
    pub column: &'static str,
    pub value: i64,
}

/// Everything the transfer engine needs to know about one entity table.
///
/// The first entry of `columns` is the primary key; it is written with the
/// source value so keys line up across both schemas.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    /// Table name in the current schema.
    pub source_table: &'static str,
    /// Table name in the version 3.0 schema.
    pub destination_table: &'static str,
    /// Columns inserted into the destination, key first.
    pub columns: &'static [ColumnSpec],
    /// Columns read from the source but written in a later pass.
    pub deferred: &'static [ColumnSpec],
    /// Restricts which source rows are read.
    pub filter: Option<SourceFilter>,
}

impl TableSpec {
    /// The primary key column.
    pub fn key(&self) -> &'static ColumnSpec {
        let columns: &'static [ColumnSpec] = self.columns;
        &columns[0]
    }

    /// Destination column names for the insert statement, in value order.
    pub fn insert_columns(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.destination).collect()
    }

    /// Build the full-snapshot source query, ordered by key.
    pub fn select_query(&self) -> SelectQuery {
        SelectQuery {
            table: self.source_table,
            columns: self
                .columns
                .iter()
                .chain(self.deferred.iter())
                .map(|c| c.source)
                .collect(),
            order_by: self.key().source,
            filter: self
                .filter
                .map(|f| (f.column, SqlValue::I64(f.value))),
        }
    }
}

/// A full-table SELECT with an optional equality filter.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: &'static str,
    pub columns: Vec<&'static str>,
    /// Column the rows are sorted by, ascending.
    pub order_by: &'static str,
    pub filter: Option<(&'static str, SqlValue)>,
}
