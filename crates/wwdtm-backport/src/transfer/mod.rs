//! Table transfer units.
//!
//! A unit moves one table's full row set from the source to the destination:
//!
//! 1. read every row, ordered by primary key (filtered for bluff segments),
//! 2. decode each row into its typed record,
//! 3. normalize the flagged text columns,
//! 4. insert the row with its source key, one statement per row.
//!
//! There is no batching and no transaction. The first failing statement
//! stops the unit; rows already written stay written.
//!
//! [`ShowTransfer`] adds a second pass that fills in `repeatshowid` after
//! every show exists. [`MappingTransfers`] runs the six mapping tables in
//! dependency order.

mod mappings;

pub use mappings::MappingTransfers;

use std::marker::PhantomData;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{SourceReader, SqlValue, TargetWriter};
use crate::entity::{Entity, Show};
use crate::error::Result;
use crate::normalize::normalize_value;

/// Statistics from one table transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStats {
    /// Destination table name.
    pub table: String,

    /// Rows returned by the source query.
    pub rows_read: u64,

    /// Rows inserted into the destination.
    pub rows_inserted: u64,

    /// Rows touched by a deferred update pass.
    pub rows_updated: u64,

    /// Wall-clock time for the whole unit.
    pub duration_ms: u64,
}

impl TransferStats {
    fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    fn finish(mut self, started: Instant) -> Self {
        self.duration_ms = started.elapsed().as_millis() as u64;
        self
    }
}

/// One step of a migration run.
#[async_trait]
pub trait TransferUnit: Send + Sync {
    /// Destination table written by this unit.
    fn table(&self) -> &'static str;

    /// Move every row of the table.
    async fn transfer(&self) -> Result<TransferStats>;
}

/// Build the insert values for `record`, normalizing flagged text columns.
pub fn prepare_values<E: Entity>(record: &E) -> Vec<SqlValue> {
    E::SPEC
        .columns
        .iter()
        .zip(record.to_values())
        .map(|(column, value)| {
            if column.normalize {
                normalize_value(value)
            } else {
                value
            }
        })
        .collect()
}

/// Generic transfer unit for any [`Entity`].
pub struct TableTransfer<'a, E> {
    source: &'a dyn SourceReader,
    destination: &'a dyn TargetWriter,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E: Entity> TableTransfer<'a, E> {
    pub fn new(source: &'a dyn SourceReader, destination: &'a dyn TargetWriter) -> Self {
        Self {
            source,
            destination,
            _entity: PhantomData,
        }
    }

    /// Read and decode every source row, in key order.
    pub async fn fetch(&self) -> Result<Vec<E>> {
        let query = E::SPEC.select_query();
        let rows = self.source.fetch_rows(&query).await?;
        rows.iter().map(E::from_row).collect()
    }

    /// Insert `records` one at a time, in the given order.
    pub async fn insert_all(&self, records: &[E]) -> Result<u64> {
        let table = E::SPEC.destination_table;
        let columns = E::SPEC.insert_columns();
        let mut inserted = 0;

        for record in records {
            debug!("{}: inserting key {}", table, record.key());
            inserted += self
                .destination
                .insert_row(table, &columns, prepare_values(record))
                .await?;
        }

        Ok(inserted)
    }
}

#[async_trait]
impl<'a, E: Entity> TransferUnit for TableTransfer<'a, E> {
    fn table(&self) -> &'static str {
        E::SPEC.destination_table
    }

    async fn transfer(&self) -> Result<TransferStats> {
        let started = Instant::now();
        let mut stats = TransferStats::new(self.table());

        let records = self.fetch().await?;
        stats.rows_read = records.len() as u64;

        if records.is_empty() {
            info!("{}: no source rows, nothing to transfer", stats.table);
            return Ok(stats.finish(started));
        }

        stats.rows_inserted = self.insert_all(&records).await?;

        let stats = stats.finish(started);
        info!(
            "{}: completed ({} rows in {} ms)",
            stats.table, stats.rows_inserted, stats.duration_ms
        );
        Ok(stats)
    }
}

/// Two-pass transfer for `ww_shows`.
///
/// `repeatshowid` references another show. The first pass inserts every show
/// without it; the second sets it on the rows where the source has one, so
/// the referenced show always exists by then.
pub struct ShowTransfer<'a> {
    shows: TableTransfer<'a, Show>,
}

impl<'a> ShowTransfer<'a> {
    pub fn new(source: &'a dyn SourceReader, destination: &'a dyn TargetWriter) -> Self {
        Self {
            shows: TableTransfer::new(source, destination),
        }
    }

    async fn update_repeats(&self, shows: &[Show]) -> Result<u64> {
        let spec = Show::SPEC;
        let mut updated = 0;

        for show in shows {
            let Some(repeat_of) = show.repeat_show_id else {
                continue;
            };
            debug!(
                "{}: show {} repeats show {}",
                spec.destination_table, show.show_id, repeat_of
            );
            updated += self
                .shows
                .destination
                .update_column(
                    spec.destination_table,
                    spec.key().destination,
                    SqlValue::I64(show.show_id),
                    Show::REPEAT_SHOW_ID,
                    SqlValue::I64(repeat_of),
                )
                .await?;
        }

        Ok(updated)
    }
}

#[async_trait]
impl<'a> TransferUnit for ShowTransfer<'a> {
    fn table(&self) -> &'static str {
        Show::SPEC.destination_table
    }

    async fn transfer(&self) -> Result<TransferStats> {
        let started = Instant::now();
        let mut stats = TransferStats::new(self.table());

        let shows = self.shows.fetch().await?;
        stats.rows_read = shows.len() as u64;

        if shows.is_empty() {
            info!("{}: no source rows, nothing to transfer", stats.table);
            return Ok(stats.finish(started));
        }

        stats.rows_inserted = self.shows.insert_all(&shows).await?;
        stats.rows_updated = self.update_repeats(&shows).await?;

        let stats = stats.finish(started);
        info!(
            "{}: completed ({} rows, {} repeat links in {} ms)",
            stats.table, stats.rows_inserted, stats.rows_updated, stats.duration_ms
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{
        BluffMap, Description, Host, HostMap, Location, PanelistMap, ScorekeeperMap,
    };
    use crate::error::BackportError;
    use crate::testing::{MemoryDatabase, Write};
    use chrono::NaiveDate;

    fn date(day: u32) -> SqlValue {
        SqlValue::Date(NaiveDate::from_ymd_opt(2020, 1, day).unwrap())
    }

    fn seed_shows(source: &MemoryDatabase, shows: &[(i64, Option<i64>)]) {
        for (id, repeat) in shows {
            source.seed(
                "ww_shows",
                &[
                    "showid",
                    "showdate",
                    "bestof",
                    "bestofuniquebluff",
                    "repeatshowid",
                ],
                vec![
                    SqlValue::I64(*id),
                    date(*id as u32),
                    SqlValue::I64(0),
                    SqlValue::I64(0),
                    SqlValue::from(*repeat),
                ],
            );
        }
    }

    fn show_destination() -> MemoryDatabase {
        MemoryDatabase::new("destination").with_foreign_key(
            "ww_shows",
            "repeatshowid",
            "ww_shows",
            "showid",
        )
    }

    #[tokio::test]
    async fn test_host_transfer_normalizes_name() {
        let source = MemoryDatabase::new("source");
        let destination = MemoryDatabase::new("destination");
        source.seed(
            "ww_hosts",
            &["hostid", "host", "hostgender", "hostslug"],
            vec![
                SqlValue::I64(5),
                SqlValue::Text("François".into()),
                SqlValue::Text("M".into()),
                SqlValue::Text("francois".into()),
            ],
        );

        let stats = TableTransfer::<Host>::new(&source, &destination)
            .transfer()
            .await
            .unwrap();

        assert_eq!(stats.rows_read, 1);
        assert_eq!(stats.rows_inserted, 1);
        assert_eq!(
            destination.row_values("ww_hosts", 5),
            Some(vec![
                SqlValue::I64(5),
                SqlValue::Text("Francois".into()),
                SqlValue::Text("M".into()),
                SqlValue::Text("francois".into()),
            ])
        );
    }

    #[tokio::test]
    async fn test_keys_preserved_in_source_order() {
        let source = MemoryDatabase::new("source");
        let destination = MemoryDatabase::new("destination");
        for id in [40, 7, 19] {
            source.seed(
                "ww_locations",
                &["locationid", "city", "state", "venue", "locationslug"],
                vec![
                    SqlValue::I64(id),
                    SqlValue::Text("Chicago".into()),
                    SqlValue::Text("IL".into()),
                    SqlValue::Text("Chase Auditorium".into()),
                    SqlValue::Null,
                ],
            );
        }

        TableTransfer::<Location>::new(&source, &destination)
            .transfer()
            .await
            .unwrap();

        assert_eq!(destination.keys("ww_locations"), vec![7, 19, 40]);
        let inserted: Vec<_> = destination
            .writes()
            .into_iter()
            .map(|w| match w {
                Write::Insert { key, .. } => key,
                other => panic!("unexpected write {other:?}"),
            })
            .collect();
        assert_eq!(inserted, vec![7, 19, 40]);
    }

    #[tokio::test]
    async fn test_empty_text_becomes_null() {
        let source = MemoryDatabase::new("source");
        let destination = MemoryDatabase::new("destination");
        source.seed(
            "ww_showdescriptions",
            &["showid", "showdescription"],
            vec![SqlValue::I64(1), SqlValue::Text(String::new())],
        );
        source.seed(
            "ww_showdescriptions",
            &["showid", "showdescription"],
            vec![SqlValue::I64(2), SqlValue::Null],
        );

        TableTransfer::<Description>::new(&source, &destination)
            .transfer()
            .await
            .unwrap();

        assert_eq!(
            destination.value("ww_showdescriptions", 1, "showdescription"),
            Some(SqlValue::Null)
        );
        assert_eq!(
            destination.value("ww_showdescriptions", 2, "showdescription"),
            Some(SqlValue::Null)
        );
    }

    #[tokio::test]
    async fn test_mapping_text_columns_normalized() {
        let source = MemoryDatabase::new("source");
        let destination = MemoryDatabase::new("destination");
        source.seed(
            "ww_showpnlmap",
            &[
                "showpnlmapid",
                "showid",
                "panelistid",
                "panelistlrndstart",
                "panelistlrndcorrect",
                "panelistscore",
                "showpnlrank",
            ],
            vec![
                SqlValue::I64(10),
                SqlValue::I64(1),
                SqlValue::I64(2),
                SqlValue::I64(3),
                SqlValue::I64(4),
                SqlValue::I64(11),
                SqlValue::Text("１t".into()),
            ],
        );
        source.seed(
            "ww_showskmap",
            &["showskmapid", "showid", "scorekeeperid", "guest", "description"],
            vec![
                SqlValue::I64(3),
                SqlValue::I64(1),
                SqlValue::I64(1),
                SqlValue::I64(1),
                SqlValue::Text("Guest scorekeeper: Chioké".into()),
            ],
        );

        TableTransfer::<PanelistMap>::new(&source, &destination)
            .transfer()
            .await
            .unwrap();
        TableTransfer::<ScorekeeperMap>::new(&source, &destination)
            .transfer()
            .await
            .unwrap();

        assert_eq!(
            destination.value("ww_showpnlmap", 10, "showpnlrank"),
            Some(SqlValue::Text("1t".into()))
        );
        assert_eq!(
            destination.value("ww_showpnlmap", 10, "panelistscore"),
            Some(SqlValue::I64(11))
        );
        assert_eq!(
            destination.value("ww_showskmap", 3, "description"),
            Some(SqlValue::Text("Guest scorekeeper: Chioke".into()))
        );
    }

    #[tokio::test]
    async fn test_empty_source_writes_nothing() {
        let source = MemoryDatabase::new("source");
        let destination = MemoryDatabase::new("destination");

        let stats = TableTransfer::<Host>::new(&source, &destination)
            .transfer()
            .await
            .unwrap();
        let show_stats = ShowTransfer::new(&source, &destination)
            .transfer()
            .await
            .unwrap();

        assert_eq!(stats.rows_read, 0);
        assert_eq!(show_stats.rows_inserted, 0);
        assert_eq!(show_stats.rows_updated, 0);
        assert!(destination.writes().is_empty());
    }

    #[tokio::test]
    async fn test_bluff_map_only_first_segment() {
        let source = MemoryDatabase::new("source");
        let destination = MemoryDatabase::new("destination");
        for (id, segment) in [(1, 1), (2, 2), (3, 1), (4, 3)] {
            source.seed(
                "ww_showbluffmap",
                &[
                    "showbluffmapid",
                    "showid",
                    "segment",
                    "chosenbluffpnlid",
                    "correctbluffpnlid",
                ],
                vec![
                    SqlValue::I64(id),
                    SqlValue::I64(100),
                    SqlValue::I64(segment),
                    SqlValue::I64(8),
                    SqlValue::Null,
                ],
            );
        }

        let stats = TableTransfer::<BluffMap>::new(&source, &destination)
            .transfer()
            .await
            .unwrap();

        assert_eq!(stats.rows_read, 2);
        assert_eq!(destination.keys("ww_showbluffmap"), vec![1, 3]);
        assert!(!destination
            .written_columns("ww_showbluffmap", 1)
            .contains(&"segment".to_string()));
    }

    #[tokio::test]
    async fn test_show_two_pass_sets_repeats() {
        let source = MemoryDatabase::new("source");
        let destination = show_destination();
        seed_shows(&source, &[(1, None), (2, Some(1))]);

        let stats = ShowTransfer::new(&source, &destination)
            .transfer()
            .await
            .unwrap();

        assert_eq!(stats.rows_inserted, 2);
        assert_eq!(stats.rows_updated, 1);
        assert_eq!(destination.keys("ww_shows"), vec![1, 2]);
        assert_eq!(
            destination.value("ww_shows", 1, "repeatshowid"),
            Some(SqlValue::Null)
        );
        assert_eq!(
            destination.value("ww_shows", 2, "repeatshowid"),
            Some(SqlValue::I64(1))
        );
    }

    #[tokio::test]
    async fn test_show_forward_reference_survives_constraint() {
        let source = MemoryDatabase::new("source");
        let destination = show_destination();
        seed_shows(&source, &[(1, Some(3)), (2, None), (3, None)]);

        ShowTransfer::new(&source, &destination)
            .transfer()
            .await
            .unwrap();

        assert_eq!(
            destination.value("ww_shows", 1, "repeatshowid"),
            Some(SqlValue::I64(3))
        );
        let writes = destination.writes();
        assert_eq!(writes.len(), 4);
        assert_eq!(
            writes[3],
            Write::Update {
                table: "ww_shows".to_string(),
                key: 1,
                column: "repeatshowid".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_show_insert_omits_repeat_column() {
        let source = MemoryDatabase::new("source");
        let destination = MemoryDatabase::new("destination");
        seed_shows(&source, &[(1, None)]);

        ShowTransfer::new(&source, &destination)
            .transfer()
            .await
            .unwrap();

        assert_eq!(
            destination.written_columns("ww_shows", 1),
            vec!["showid", "showdate", "bestof", "bestofuniquebluff"]
        );
        assert_eq!(
            destination.value("ww_shows", 1, "repeatshowid"),
            Some(SqlValue::Null)
        );
    }

    #[tokio::test]
    async fn test_failure_stops_unit_and_keeps_earlier_rows() {
        let source = MemoryDatabase::new("source");
        let destination = MemoryDatabase::new("destination");
        for id in [1, 2, 3] {
            source.seed(
                "ww_hosts",
                &["hostid", "host", "hostgender", "hostslug"],
                vec![SqlValue::I64(id), SqlValue::Null, SqlValue::Null, SqlValue::Null],
            );
        }
        destination.seed(
            "ww_hosts",
            &["hostid", "host", "hostgender", "hostslug"],
            vec![SqlValue::I64(2), SqlValue::Null, SqlValue::Null, SqlValue::Null],
        );

        let err = TableTransfer::<Host>::new(&source, &destination)
            .transfer()
            .await
            .unwrap_err();

        assert!(matches!(err, BackportError::Statement { ref table, .. } if table == "ww_hosts"));
        assert_eq!(destination.keys("ww_hosts"), vec![1, 2]);
        assert_eq!(destination.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_flag_columns_copied_verbatim() {
        let source = MemoryDatabase::new("source");
        let destination = MemoryDatabase::new("destination");
        for (id, guest) in [(1, SqlValue::I64(2)), (2, SqlValue::Null), (3, SqlValue::I64(0))] {
            source.seed(
                "ww_showhostmap",
                &["showhostmapid", "showid", "hostid", "guest"],
                vec![SqlValue::I64(id), SqlValue::I64(1), SqlValue::I64(1), guest],
            );
        }
        source.seed(
            "ww_shows",
            &[
                "showid",
                "showdate",
                "bestof",
                "bestofuniquebluff",
                "repeatshowid",
            ],
            vec![
                SqlValue::I64(1),
                date(1),
                SqlValue::I64(2),
                SqlValue::Null,
                SqlValue::Null,
            ],
        );

        TableTransfer::<HostMap>::new(&source, &destination)
            .transfer()
            .await
            .unwrap();
        ShowTransfer::new(&source, &destination)
            .transfer()
            .await
            .unwrap();

        assert_eq!(
            destination.value("ww_showhostmap", 1, "guest"),
            Some(SqlValue::I64(2))
        );
        assert_eq!(
            destination.value("ww_showhostmap", 2, "guest"),
            Some(SqlValue::Null)
        );
        assert_eq!(
            destination.value("ww_showhostmap", 3, "guest"),
            Some(SqlValue::I64(0))
        );
        assert_eq!(
            destination.value("ww_shows", 1, "bestof"),
            Some(SqlValue::I64(2))
        );
        assert_eq!(
            destination.value("ww_shows", 1, "bestofuniquebluff"),
            Some(SqlValue::Null)
        );
    }

    #[tokio::test]
    async fn test_invalid_utf8_text_stops_unit() {
        let source = MemoryDatabase::new("source");
        let destination = MemoryDatabase::new("destination");
        source.seed(
            "ww_locations",
            &["locationid", "city", "state", "venue", "locationslug"],
            vec![
                SqlValue::I64(1),
                SqlValue::Text("Chicago".into()),
                SqlValue::Text("IL".into()),
                SqlValue::Text("Chase Auditorium".into()),
                SqlValue::Bytes(vec![b'c', b'h', b'a', b's', b'e', 0xff]),
            ],
        );

        let err = TableTransfer::<Location>::new(&source, &destination)
            .transfer()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BackportError::Decode { ref column, .. } if column == "locationslug"
        ));
        assert!(destination.writes().is_empty());
    }

    #[test]
    fn test_prepare_values_only_touches_flagged_columns() {
        let host = Host {
            host_id: 1,
            host: Some("Mo Rocca".into()),
            gender: Some("M".into()),
            slug: Some("".into()),
        };
        assert_eq!(
            prepare_values(&host),
            vec![
                SqlValue::I64(1),
                SqlValue::Text("Mo Rocca".into()),
                SqlValue::Text("M".into()),
                SqlValue::Text("".into()),
            ]
        );
    }
}
