//! MySQL/MariaDB connection handle.
//!
//! Implements [`SourceReader`] and [`TargetWriter`] over a single
//! `mysql_async` connection. One handle serves the whole run; statements are
//! executed one at a time and autocommit, so there is no transaction to
//! roll back if a statement fails.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Timelike};
use mysql_async::prelude::*;
use mysql_async::{Conn, Opts, OptsBuilder, Params, SslOpts, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::dialect::MysqlDialect;
use crate::config::DatabaseConfig;
use crate::core::{Connection, Row, SelectQuery, SourceReader, SqlValue, TargetWriter};
use crate::error::{BackportError, Result};

/// A single MySQL connection bound to one database.
pub struct MysqlConnection {
    name: String,
    opts: Opts,
    dialect: MysqlDialect,
    conn: Mutex<Option<Conn>>,
}

impl MysqlConnection {
    /// Open a connection described by `config`.
    ///
    /// `name` identifies the handle in log lines and errors.
    pub async fn connect(name: &str, config: &DatabaseConfig) -> Result<Self> {
        let mut builder = OptsBuilder::default()
            .ip_or_hostname(config.host.as_str())
            .tcp_port(config.port)
            .db_name(Some(config.database.as_str()))
            .user(Some(config.user.as_str()))
            .pass(Some(config.password.as_str()))
            // Use utf8mb4 for full Unicode support
            .init(vec!["SET NAMES utf8mb4"]);

        if let Some(ssl) = ssl_opts(&config.ssl_mode) {
            builder = builder.ssl_opts(ssl);
        }

        let opts: Opts = builder.into();
        let mut conn = Conn::new(opts.clone())
            .await
            .map_err(|e| BackportError::connection(e, format!("connecting to {name} database")))?;

        conn.query_drop("SELECT 1")
            .await
            .map_err(|e| BackportError::connection(e, format!("testing {name} connection")))?;

        info!(
            "Connected to {} database: {}:{}/{}",
            name, config.host, config.port, config.database
        );

        Ok(Self {
            name: name.to_string(),
            opts,
            dialect: MysqlDialect::new(),
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Close the connection. Further statements fail until [`reconnect`].
    ///
    /// [`reconnect`]: Connection::reconnect
    pub async fn close(&self) {
        if let Some(conn) = self.conn.lock().await.take() {
            conn.disconnect().await.ok();
        }
    }

    fn not_connected(&self) -> BackportError {
        BackportError::connection("not connected", format!("{} handle", self.name))
    }
}

#[async_trait]
impl Connection for MysqlConnection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_connected(&self) -> bool {
        match self.conn.lock().await.as_mut() {
            Some(conn) => conn.ping().await.is_ok(),
            None => false,
        }
    }

    async fn reconnect(&self) -> Result<()> {
        let conn = Conn::new(self.opts.clone())
            .await
            .map_err(|e| BackportError::connection(e, format!("reconnecting {} handle", self.name)))?;
        // The old connection is already unusable; dropping it is enough.
        self.conn.lock().await.replace(conn);
        info!("Reconnected {} database", self.name);
        Ok(())
    }
}

#[async_trait]
impl SourceReader for MysqlConnection {
    async fn fetch_rows(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        let sql = self.dialect.build_select(query);
        let params = match &query.filter {
            Some((_, value)) => Params::Positional(vec![to_mysql(value)]),
            None => Params::Empty,
        };
        debug!("{}: {}", self.name, sql);

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(|| self.not_connected())?;
        let rows: Vec<mysql_async::Row> = conn.exec(sql, params).await?;

        let columns: std::sync::Arc<[String]> =
            query.columns.iter().map(|c| c.to_string()).collect();
        Ok(rows
            .into_iter()
            .map(|mut row| {
                let values = (0..row.len())
                    .map(|i| from_mysql(row.take::<Value, usize>(i).unwrap_or(Value::NULL)))
                    .collect();
                Row::new(query.table, columns.clone(), values)
            })
            .collect())
    }
}

#[async_trait]
impl TargetWriter for MysqlConnection {
    async fn insert_row(
        &self,
        table: &str,
        columns: &[&str],
        values: Vec<SqlValue>,
    ) -> Result<u64> {
        let sql = self.dialect.build_insert(table, columns);
        let params = Params::Positional(values.iter().map(to_mysql).collect());

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(|| self.not_connected())?;
        conn.exec_drop(sql, params).await?;
        Ok(conn.affected_rows())
    }

    async fn update_column(
        &self,
        table: &str,
        key_column: &str,
        key: SqlValue,
        column: &str,
        value: SqlValue,
    ) -> Result<u64> {
        let sql = self.dialect.build_update(table, key_column, column);
        let params = Params::Positional(vec![to_mysql(&value), to_mysql(&key)]);

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(|| self.not_connected())?;
        conn.exec_drop(sql, params).await?;
        Ok(conn.affected_rows())
    }
}

/// Map an `ssl_mode` setting to mysql_async TLS options.
fn ssl_opts(mode: &str) -> Option<SslOpts> {
    match mode.to_lowercase().as_str() {
        "disable" => {
            debug!("MySQL TLS is disabled");
            None
        }
        "prefer" | "require" => Some(SslOpts::default().with_danger_accept_invalid_certs(true)),
        "verify-ca" | "verify_ca" | "verify-full" | "verify_identity" => Some(SslOpts::default()),
        other => {
            warn!("Unknown ssl_mode '{}', defaulting to require", other);
            Some(SslOpts::default().with_danger_accept_invalid_certs(true))
        }
    }
}

/// Convert SqlValue to mysql_async::Value.
fn to_mysql(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::NULL,
        SqlValue::Bool(b) => Value::Int(i64::from(*b)),
        SqlValue::I64(i) => Value::Int(*i),
        SqlValue::F64(f) => Value::Double(*f),
        SqlValue::Text(s) => Value::Bytes(s.as_bytes().to_vec()),
        SqlValue::Bytes(b) => Value::Bytes(b.clone()),
        SqlValue::Date(d) => Value::Date(d.year() as u16, d.month() as u8, d.day() as u8, 0, 0, 0, 0),
        SqlValue::DateTime(dt) => Value::Date(
            dt.year() as u16,
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            dt.nanosecond() / 1_000,
        ),
    }
}

/// Convert mysql_async::Value to SqlValue.
///
/// Dates MySQL cannot represent as a calendar date (`0000-00-00`) come back
/// as text so decoding reports them instead of silently nulling them.
fn from_mysql(value: Value) -> SqlValue {
    match value {
        Value::NULL => SqlValue::Null,
        Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => SqlValue::Text(text),
            Err(e) => SqlValue::Bytes(e.into_bytes()),
        },
        Value::Int(i) => SqlValue::I64(i),
        Value::UInt(u) => i64::try_from(u)
            .map(SqlValue::I64)
            .unwrap_or_else(|_| SqlValue::Text(u.to_string())),
        Value::Float(f) => SqlValue::F64(f64::from(f)),
        Value::Double(f) => SqlValue::F64(f),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            let Some(date) = NaiveDate::from_ymd_opt(year.into(), month.into(), day.into()) else {
                return SqlValue::Text(format!("{year:04}-{month:02}-{day:02}"));
            };
            if (hour, minute, second, micros) == (0, 0, 0, 0) {
                return SqlValue::Date(date);
            }
            date.and_hms_micro_opt(hour.into(), minute.into(), second.into(), micros)
                .map(SqlValue::DateTime)
                .unwrap_or(SqlValue::Date(date))
        }
        Value::Time(negative, days, hours, minutes, seconds, _) => SqlValue::Text(format!(
            "{}{:02}:{:02}:{:02}",
            if negative { "-" } else { "" },
            days * 24 + u32::from(hours),
            minutes,
            seconds
        )),
    }
}
