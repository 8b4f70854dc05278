//! In-memory database used by the unit tests.
//!
//! Behaves like a MySQL schema as far as the transfer engine can tell:
//! the first inserted column is the primary key and must be unique, declared
//! foreign keys are checked on insert and update, and a disconnected handle
//! rejects statements until it is reconnected. Every successful write is
//! recorded so tests can check order and absence of writes.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::{Connection, Row, SelectQuery, SourceReader, SqlValue, TargetWriter};
use crate::error::{BackportError, Result};

/// A write that reached the database.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Insert {
        table: String,
        key: i64,
    },
    Update {
        table: String,
        key: i64,
        column: String,
    },
}

#[derive(Debug, Clone)]
struct ForeignKey {
    table: String,
    column: String,
    ref_table: String,
    ref_column: String,
}

type StoredRow = Vec<(String, SqlValue)>;

pub struct MemoryDatabase {
    name: String,
    tables: Mutex<BTreeMap<String, Vec<StoredRow>>>,
    foreign_keys: Vec<ForeignKey>,
    writes: Mutex<Vec<Write>>,
    connected: AtomicBool,
    refuse_reconnect: bool,
    reconnects: AtomicUsize,
}

fn column_value<'r>(row: &'r StoredRow, column: &str) -> Option<&'r SqlValue> {
    row.iter().find(|(c, _)| c == column).map(|(_, v)| v)
}

fn row_key(row: &StoredRow) -> Option<i64> {
    match row.first() {
        Some((_, SqlValue::I64(key))) => Some(*key),
        _ => None,
    }
}

impl MemoryDatabase {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tables: Mutex::new(BTreeMap::new()),
            foreign_keys: Vec::new(),
            writes: Mutex::new(Vec::new()),
            connected: AtomicBool::new(true),
            refuse_reconnect: false,
            reconnects: AtomicUsize::new(0),
        }
    }

    /// Enforce that `table.column` references an existing `ref_table.ref_column`.
    pub fn with_foreign_key(
        mut self,
        table: &str,
        column: &str,
        ref_table: &str,
        ref_column: &str,
    ) -> Self {
        self.foreign_keys.push(ForeignKey {
            table: table.to_string(),
            column: column.to_string(),
            ref_table: ref_table.to_string(),
            ref_column: ref_column.to_string(),
        });
        self
    }

    /// Make every reconnect attempt fail.
    pub fn refusing_reconnect(mut self) -> Self {
        self.refuse_reconnect = true;
        self
    }

    /// Simulate a dropped connection.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn reconnect_count(&self) -> usize {
        self.reconnects.load(Ordering::SeqCst)
    }

    /// Add a row without recording a write or checking constraints.
    pub fn seed(&self, table: &str, columns: &[&str], values: Vec<SqlValue>) {
        let row: StoredRow = columns.iter().map(|c| c.to_string()).zip(values).collect();
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    /// Primary keys stored in `table`, ascending.
    pub fn keys(&self, table: &str) -> Vec<i64> {
        let tables = self.tables.lock().unwrap();
        let mut keys: Vec<i64> = tables
            .get(table)
            .map(|rows| rows.iter().filter_map(row_key).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    /// Value of `column` on the row with primary key `key`.
    ///
    /// `None` when the row does not exist; `Some(Null)` when the row exists
    /// but the column was never written.
    pub fn value(&self, table: &str, key: i64, column: &str) -> Option<SqlValue> {
        self.with_row(table, key, |row| {
            column_value(row, column).cloned().unwrap_or(SqlValue::Null)
        })
    }

    /// Columns written for the row with primary key `key`, in write order.
    pub fn written_columns(&self, table: &str, key: i64) -> Vec<String> {
        self.with_row(table, key, |row| row.iter().map(|(c, _)| c.clone()).collect())
            .unwrap_or_default()
    }

    /// Values of the row with primary key `key`, in write order.
    pub fn row_values(&self, table: &str, key: i64) -> Option<Vec<SqlValue>> {
        self.with_row(table, key, |row| row.iter().map(|(_, v)| v.clone()).collect())
    }

    fn with_row<T>(&self, table: &str, key: i64, f: impl FnOnce(&StoredRow) -> T) -> Option<T> {
        let tables = self.tables.lock().unwrap();
        tables
            .get(table)
            .and_then(|rows| rows.iter().find(|r| row_key(r) == Some(key)))
            .map(f)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BackportError::connection(
                "Lost connection to MySQL server",
                format!("{} handle", self.name),
            ))
        }
    }

    fn check_foreign_keys(
        &self,
        tables: &BTreeMap<String, Vec<StoredRow>>,
        table: &str,
        column: &str,
        value: &SqlValue,
    ) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        for fk in self
            .foreign_keys
            .iter()
            .filter(|fk| fk.table == table && fk.column == column)
        {
            let exists = tables.get(&fk.ref_table).is_some_and(|rows| {
                rows.iter()
                    .any(|r| column_value(r, &fk.ref_column) == Some(value))
            });
            if !exists {
                return Err(BackportError::statement(
                    table,
                    format!(
                        "Cannot add or update a child row: a foreign key constraint fails \
                         ({}.{} references {}.{})",
                        fk.table, fk.column, fk.ref_table, fk.ref_column
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Connection for MemoryDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn reconnect(&self) -> Result<()> {
        self.reconnects.fetch_add(1, Ordering::SeqCst);
        if self.refuse_reconnect {
            return Err(BackportError::connection(
                "Connection refused",
                format!("reconnecting {} handle", self.name),
            ));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SourceReader for MemoryDatabase {
    async fn fetch_rows(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        self.ensure_connected()?;
        let tables = self.tables.lock().unwrap();
        let Some(stored) = tables.get(query.table) else {
            return Ok(Vec::new());
        };

        let mut matching: Vec<&StoredRow> = stored
            .iter()
            .filter(|row| match &query.filter {
                Some((column, value)) => column_value(row, column) == Some(value),
                None => true,
            })
            .collect();
        matching.sort_by_key(|row| match column_value(row, query.order_by) {
            Some(SqlValue::I64(key)) => *key,
            _ => i64::MIN,
        });

        let columns: Arc<[String]> = query.columns.iter().map(|c| c.to_string()).collect();
        Ok(matching
            .into_iter()
            .map(|row| {
                let values = query
                    .columns
                    .iter()
                    .map(|c| column_value(row, c).cloned().unwrap_or(SqlValue::Null))
                    .collect();
                Row::new(query.table, columns.clone(), values)
            })
            .collect())
    }
}

#[async_trait]
impl TargetWriter for MemoryDatabase {
    async fn insert_row(
        &self,
        table: &str,
        columns: &[&str],
        values: Vec<SqlValue>,
    ) -> Result<u64> {
        self.ensure_connected()?;
        let row: StoredRow = columns.iter().map(|c| c.to_string()).zip(values).collect();
        let Some(key) = row_key(&row) else {
            return Err(BackportError::statement(table, "primary key must be an integer"));
        };

        let mut tables = self.tables.lock().unwrap();
        if tables
            .get(table)
            .is_some_and(|rows| rows.iter().any(|r| row_key(r) == Some(key)))
        {
            return Err(BackportError::statement(
                table,
                format!("Duplicate entry '{key}' for key 'PRIMARY'"),
            ));
        }
        for (column, value) in &row {
            self.check_foreign_keys(&tables, table, column, value)?;
        }

        tables.entry(table.to_string()).or_default().push(row);
        self.writes.lock().unwrap().push(Write::Insert {
            table: table.to_string(),
            key,
        });
        Ok(1)
    }

    async fn update_column(
        &self,
        table: &str,
        key_column: &str,
        key: SqlValue,
        column: &str,
        value: SqlValue,
    ) -> Result<u64> {
        self.ensure_connected()?;
        let mut tables = self.tables.lock().unwrap();
        self.check_foreign_keys(&tables, table, column, &value)?;

        let Some(row) = tables.get_mut(table).and_then(|rows| {
            rows.iter_mut()
                .find(|r| column_value(r, key_column) == Some(&key))
        }) else {
            return Ok(0);
        };
        let key = row_key(row).unwrap_or_default();
        match row.iter_mut().find(|(c, _)| c == column) {
            Some((_, existing)) => *existing = value,
            None => row.push((column.to_string(), value)),
        }

        self.writes.lock().unwrap().push(Write::Update {
            table: table.to_string(),
            key,
            column: column.to_string(),
        });
        Ok(1)
    }
}
