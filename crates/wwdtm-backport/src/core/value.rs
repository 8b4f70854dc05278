//! SQL value and row types shared by the drivers and the transfer engine.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{BackportError, Result};

/// A single column value crossing the connection boundary.
///
/// MySQL reports every integer width and `TINYINT(1)` flags as integers, so
/// one integer variant covers them all.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,

    /// Boolean flag.
    Bool(bool),

    /// Any integer column.
    I64(i64),

    /// Floating point column.
    F64(f64),

    /// Text column.
    Text(String),

    /// Binary column, or text that was not valid UTF-8.
    Bytes(Vec<u8>),

    /// Date without time component.
    Date(NaiveDate),

    /// Timestamp without timezone.
    DateTime(NaiveDateTime),
}

impl SqlValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Short type name used in decode errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::Bool(_) => "bool",
            SqlValue::I64(_) => "integer",
            SqlValue::F64(_) => "float",
            SqlValue::Text(_) => "text",
            SqlValue::Bytes(_) => "bytes",
            SqlValue::Date(_) => "date",
            SqlValue::DateTime(_) => "datetime",
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// One row returned by a source query.
///
/// Column names are shared between all rows of a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    table: String,
    columns: Arc<[String]>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Create a row. `values` must line up with `columns`.
    pub fn new(table: impl Into<String>, columns: Arc<[String]>, values: Vec<SqlValue>) -> Self {
        Self {
            table: table.into(),
            columns,
            values,
        }
    }

    /// Look up a value by column name.
    pub fn get(&self, column: &str) -> Result<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| BackportError::decode(&self.table, column, "column not in result set"))
    }

    fn mismatch(&self, column: &str, expected: &str, found: &SqlValue) -> BackportError {
        BackportError::decode(
            &self.table,
            column,
            format!("expected {expected}, found {}", found.type_name()),
        )
    }

    /// Read a nullable integer column.
    pub fn opt_i64(&self, column: &str) -> Result<Option<i64>> {
        match self.get(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::I64(v) => Ok(Some(*v)),
            SqlValue::Bool(v) => Ok(Some(i64::from(*v))),
            SqlValue::Text(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.mismatch(column, "integer", &SqlValue::Text(s.clone()))),
            other => Err(self.mismatch(column, "integer", other)),
        }
    }

    /// Read a non-null integer column.
    pub fn i64(&self, column: &str) -> Result<i64> {
        self.opt_i64(column)?
            .ok_or_else(|| self.mismatch(column, "integer", &SqlValue::Null))
    }

    /// Read a nullable text column.
    ///
    /// Bytes that are not valid UTF-8 are a decode error; they are never
    /// rewritten with replacement characters.
    pub fn opt_text(&self, column: &str) -> Result<Option<String>> {
        match self.get(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::Text(s) => Ok(Some(s.clone())),
            SqlValue::Bytes(b) => String::from_utf8(b.clone())
                .map(Some)
                .map_err(|e| BackportError::decode(&self.table, column, e.to_string())),
            other => Err(self.mismatch(column, "text", other)),
        }
    }

    /// Read a non-null date column.
    pub fn date(&self, column: &str) -> Result<NaiveDate> {
        match self.get(column)? {
            SqlValue::Date(d) => Ok(*d),
            SqlValue::DateTime(dt) => Ok(dt.date()),
            SqlValue::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| BackportError::decode(&self.table, column, e.to_string())),
            other => Err(self.mismatch(column, "date", other)),
        }
    }
}
