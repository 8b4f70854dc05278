//! Migration orchestrator - main workflow coordinator.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};

use crate::config::Config;
use crate::core::{Connection, SourceReader, TargetWriter};
use crate::drivers::MysqlConnection;
use crate::entity::{Description, Guest, Host, Location, Note, Panelist, Scorekeeper};
use crate::error::{BackportError, Result};
use crate::transfer::{MappingTransfers, ShowTransfer, TableTransfer, TransferStats, TransferUnit};

/// Migration orchestrator.
///
/// Owns one source and one destination handle and lends them to every
/// transfer unit. Units run strictly one after another in dependency order.
pub struct Orchestrator<S = MysqlConnection, T = MysqlConnection> {
    source: S,
    destination: T,
}

/// Result of a migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationResult {
    /// Unique run identifier.
    pub run_id: String,

    /// When the migration started.
    pub started_at: DateTime<Utc>,

    /// When the migration completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Per-table statistics, in execution order.
    pub tables: Vec<TransferStats>,

    /// Total rows inserted across all tables.
    pub rows_transferred: u64,
}

impl MigrationResult {
    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Orchestrator<MysqlConnection, MysqlConnection> {
    /// Open both MySQL handles described by `config`.
    pub async fn connect(config: &Config) -> Result<Self> {
        let source = MysqlConnection::connect("source", &config.source_database).await?;
        let destination =
            MysqlConnection::connect("destination", &config.destination_database).await?;
        Ok(Self::new(source, destination))
    }

    /// Close both handles.
    pub async fn close(&self) {
        self.source.close().await;
        self.destination.close().await;
    }
}

impl<S: SourceReader, T: TargetWriter> Orchestrator<S, T> {
    /// Create an orchestrator over already-open handles.
    pub fn new(source: S, destination: T) -> Self {
        Self {
            source,
            destination,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn destination(&self) -> &T {
        &self.destination
    }

    /// Run the migration.
    pub async fn run(&self) -> Result<MigrationResult> {
        let started_at = Utc::now();
        let started = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();

        info!("Starting migration run: {}", run_id);

        ensure_connected(&self.source).await?;
        ensure_connected(&self.destination).await?;

        let source: &dyn SourceReader = &self.source;
        let destination: &dyn TargetWriter = &self.destination;

        // Shows first: every other table references them.
        let units: Vec<Box<dyn TransferUnit + '_>> = vec![
            Box::new(ShowTransfer::new(source, destination)),
            Box::new(TableTransfer::<Description>::new(source, destination)),
            Box::new(TableTransfer::<Note>::new(source, destination)),
            Box::new(TableTransfer::<Guest>::new(source, destination)),
            Box::new(TableTransfer::<Host>::new(source, destination)),
            Box::new(TableTransfer::<Location>::new(source, destination)),
            Box::new(TableTransfer::<Panelist>::new(source, destination)),
            Box::new(TableTransfer::<Scorekeeper>::new(source, destination)),
        ];

        let mut tables = Vec::with_capacity(units.len() + 6);
        for unit in &units {
            let span = info_span!("transfer", table = unit.table());
            tables.push(unit.transfer().instrument(span).await?);
        }

        tables.extend(
            MappingTransfers::new(source, destination)
                .transfer_all()
                .await?,
        );

        let completed_at = Utc::now();
        let rows_transferred = tables.iter().map(|t| t.rows_inserted).sum();
        let result = MigrationResult {
            run_id,
            started_at,
            completed_at,
            duration_seconds: started.elapsed().as_secs_f64(),
            tables,
            rows_transferred,
        };

        info!(
            "Migration completed: {} tables, {} rows in {:.2}s",
            result.tables.len(),
            result.rows_transferred,
            result.duration_seconds
        );
        Ok(result)
    }
}

/// Reconnect `handle` if it has dropped. A failed reconnect is fatal.
async fn ensure_connected<C: Connection + ?Sized>(handle: &C) -> Result<()> {
    if handle.is_connected().await {
        return Ok(());
    }

    warn!("{} connection lost, reconnecting", handle.name());
    handle.reconnect().await.map_err(|e| match e {
        e @ BackportError::Connection { .. } => e,
        other => BackportError::connection(other, format!("reconnecting {} handle", handle.name())),
    })
}
