//! Mapping table aggregator.

use tracing::{info, info_span, Instrument};

use super::{TableTransfer, TransferStats, TransferUnit};
use crate::core::{SourceReader, TargetWriter};
use crate::entity::{BluffMap, GuestMap, HostMap, LocationMap, PanelistMap, ScorekeeperMap};
use crate::error::Result;

/// Runs the six mapping tables in a fixed order.
///
/// Every mapping row points at shows and at one other entity table; the
/// caller is responsible for having transferred those tables first.
pub struct MappingTransfers<'a> {
    units: Vec<Box<dyn TransferUnit + 'a>>,
}

impl<'a> MappingTransfers<'a> {
    pub fn new(source: &'a dyn SourceReader, destination: &'a dyn TargetWriter) -> Self {
        Self {
            units: vec![
                Box::new(TableTransfer::<BluffMap>::new(source, destination)),
                Box::new(TableTransfer::<GuestMap>::new(source, destination)),
                Box::new(TableTransfer::<HostMap>::new(source, destination)),
                Box::new(TableTransfer::<LocationMap>::new(source, destination)),
                Box::new(TableTransfer::<PanelistMap>::new(source, destination)),
                Box::new(TableTransfer::<ScorekeeperMap>::new(source, destination)),
            ],
        }
    }

    /// Destination tables in execution order.
    pub fn tables(&self) -> Vec<&'static str> {
        self.units.iter().map(|u| u.table()).collect()
    }

    /// Transfer every mapping table, stopping at the first error.
    pub async fn transfer_all(&self) -> Result<Vec<TransferStats>> {
        let mut stats = Vec::with_capacity(self.units.len());
        for unit in &self.units {
            let span = info_span!("transfer", table = unit.table());
            stats.push(unit.transfer().instrument(span).await?);
        }

        let rows: u64 = stats.iter().map(|s| s.rows_inserted).sum();
        info!("Mapping tables: completed ({} rows)", rows);
        Ok(stats)
    }
}
