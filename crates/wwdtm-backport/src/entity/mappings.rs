//! Show mapping tables: who and what appeared on each show.
//!
//! Every mapping row references a show plus one other entity, so these
//! tables can only be written after all non-mapping tables.

use super::tables::SHOW_ID;
use super::Entity;
use crate::core::{ColumnSpec, Row, SourceFilter, SqlValue, TableSpec};
use crate::error::Result;

const SHOW_BLUFF_MAP_ID: ColumnSpec = ColumnSpec::plain("showbluffmapid");
const CHOSEN_BLUFF_PANELIST_ID: ColumnSpec = ColumnSpec::plain("chosenbluffpnlid");
const CORRECT_BLUFF_PANELIST_ID: ColumnSpec = ColumnSpec::plain("correctbluffpnlid");

const SHOW_GUEST_MAP_ID: ColumnSpec = ColumnSpec::plain("showguestmapid");
const GUEST_ID: ColumnSpec = ColumnSpec::plain("guestid");
const GUEST_SCORE: ColumnSpec = ColumnSpec::plain("guestscore");
const EXCEPTION: ColumnSpec = ColumnSpec::plain("exception");

const SHOW_HOST_MAP_ID: ColumnSpec = ColumnSpec::plain("showhostmapid");
const HOST_ID: ColumnSpec = ColumnSpec::plain("hostid");
const GUEST_FLAG: ColumnSpec = ColumnSpec::plain("guest");

const SHOW_LOCATION_MAP_ID: ColumnSpec = ColumnSpec::plain("showlocationmapid");
const LOCATION_ID: ColumnSpec = ColumnSpec::plain("locationid");

const SHOW_PANELIST_MAP_ID: ColumnSpec = ColumnSpec::plain("showpnlmapid");
const PANELIST_ID: ColumnSpec = ColumnSpec::plain("panelistid");
const LIGHTNING_START: ColumnSpec = ColumnSpec::plain("panelistlrndstart");
const LIGHTNING_CORRECT: ColumnSpec = ColumnSpec::plain("panelistlrndcorrect");
const PANELIST_SCORE: ColumnSpec = ColumnSpec::plain("panelistscore");
const PANELIST_RANK: ColumnSpec = ColumnSpec::text("showpnlrank");

const SHOW_SCOREKEEPER_MAP_ID: ColumnSpec = ColumnSpec::plain("showskmapid");
const SCOREKEEPER_ID: ColumnSpec = ColumnSpec::plain("scorekeeperid");
const SCOREKEEPER_DESCRIPTION: ColumnSpec = ColumnSpec::text("description");

/// Outcome of a "Bluff the Listener" game.
///
/// The current schema records one row per bluff segment; the 3.0 schema only
/// knows the first, so the source query keeps `segment = 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct BluffMap {
    pub show_bluff_map_id: i64,
    pub show_id: i64,
    pub chosen_panelist_id: Option<i64>,
    pub correct_panelist_id: Option<i64>,
}

impl Entity for BluffMap {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_showbluffmap",
        destination_table: "ww_showbluffmap",
        columns: &[
            SHOW_BLUFF_MAP_ID,
            SHOW_ID,
            CHOSEN_BLUFF_PANELIST_ID,
            CORRECT_BLUFF_PANELIST_ID,
        ],
        deferred: &[],
        filter: Some(SourceFilter {
            column: "segment",
            value: 1,
        }),
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            show_bluff_map_id: row.i64(SHOW_BLUFF_MAP_ID.source)?,
            show_id: row.i64(SHOW_ID.source)?,
            chosen_panelist_id: row.opt_i64(CHOSEN_BLUFF_PANELIST_ID.source)?,
            correct_panelist_id: row.opt_i64(CORRECT_BLUFF_PANELIST_ID.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.show_bluff_map_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![
            self.show_bluff_map_id.into(),
            self.show_id.into(),
            self.chosen_panelist_id.into(),
            self.correct_panelist_id.into(),
        ]
    }
}

/// "Not My Job" appearance and score.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestMap {
    pub show_guest_map_id: i64,
    pub show_id: i64,
    pub guest_id: i64,
    pub score: Option<i64>,
    /// Scoring exception flag, copied verbatim.
    pub exception: Option<i64>,
}

impl Entity for GuestMap {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_showguestmap",
        destination_table: "ww_showguestmap",
        columns: &[SHOW_GUEST_MAP_ID, SHOW_ID, GUEST_ID, GUEST_SCORE, EXCEPTION],
        deferred: &[],
        filter: None,
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            show_guest_map_id: row.i64(SHOW_GUEST_MAP_ID.source)?,
            show_id: row.i64(SHOW_ID.source)?,
            guest_id: row.i64(GUEST_ID.source)?,
            score: row.opt_i64(GUEST_SCORE.source)?,
            exception: row.opt_i64(EXCEPTION.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.show_guest_map_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![
            self.show_guest_map_id.into(),
            self.show_id.into(),
            self.guest_id.into(),
            self.score.into(),
            self.exception.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostMap {
    pub show_host_map_id: i64,
    pub show_id: i64,
    pub host_id: i64,
    /// Guest host rather than the regular host.
    pub guest: Option<i64>,
}

impl Entity for HostMap {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_showhostmap",
        destination_table: "ww_showhostmap",
        columns: &[SHOW_HOST_MAP_ID, SHOW_ID, HOST_ID, GUEST_FLAG],
        deferred: &[],
        filter: None,
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            show_host_map_id: row.i64(SHOW_HOST_MAP_ID.source)?,
            show_id: row.i64(SHOW_ID.source)?,
            host_id: row.i64(HOST_ID.source)?,
            guest: row.opt_i64(GUEST_FLAG.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.show_host_map_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![
            self.show_host_map_id.into(),
            self.show_id.into(),
            self.host_id.into(),
            self.guest.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationMap {
    pub show_location_map_id: i64,
    pub show_id: i64,
    pub location_id: i64,
}

impl Entity for LocationMap {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_showlocationmap",
        destination_table: "ww_showlocationmap",
        columns: &[SHOW_LOCATION_MAP_ID, SHOW_ID, LOCATION_ID],
        deferred: &[],
        filter: None,
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            show_location_map_id: row.i64(SHOW_LOCATION_MAP_ID.source)?,
            show_id: row.i64(SHOW_ID.source)?,
            location_id: row.i64(LOCATION_ID.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.show_location_map_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![
            self.show_location_map_id.into(),
            self.show_id.into(),
            self.location_id.into(),
        ]
    }
}

/// Panelist appearance with Lightning Fill-in-the-Blank results.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelistMap {
    pub show_panelist_map_id: i64,
    pub show_id: i64,
    pub panelist_id: i64,
    pub lightning_start: Option<i64>,
    pub lightning_correct: Option<i64>,
    pub score: Option<i64>,
    /// Finishing position such as `1`, `1t`, `2`.
    pub rank: Option<String>,
}

impl Entity for PanelistMap {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_showpnlmap",
        destination_table: "ww_showpnlmap",
        columns: &[
            SHOW_PANELIST_MAP_ID,
            SHOW_ID,
            PANELIST_ID,
            LIGHTNING_START,
            LIGHTNING_CORRECT,
            PANELIST_SCORE,
            PANELIST_RANK,
        ],
        deferred: &[],
        filter: None,
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            show_panelist_map_id: row.i64(SHOW_PANELIST_MAP_ID.source)?,
            show_id: row.i64(SHOW_ID.source)?,
            panelist_id: row.i64(PANELIST_ID.source)?,
            lightning_start: row.opt_i64(LIGHTNING_START.source)?,
            lightning_correct: row.opt_i64(LIGHTNING_CORRECT.source)?,
            score: row.opt_i64(PANELIST_SCORE.source)?,
            rank: row.opt_text(PANELIST_RANK.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.show_panelist_map_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![
            self.show_panelist_map_id.into(),
            self.show_id.into(),
            self.panelist_id.into(),
            self.lightning_start.into(),
            self.lightning_correct.into(),
            self.score.into(),
            self.rank.clone().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScorekeeperMap {
    pub show_scorekeeper_map_id: i64,
    pub show_id: i64,
    pub scorekeeper_id: i64,
    pub guest: Option<i64>,
    pub description: Option<String>,
}

impl Entity for ScorekeeperMap {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_showskmap",
        destination_table: "ww_showskmap",
        columns: &[
            SHOW_SCOREKEEPER_MAP_ID,
            SHOW_ID,
            SCOREKEEPER_ID,
            GUEST_FLAG,
            SCOREKEEPER_DESCRIPTION,
        ],
        deferred: &[],
        filter: None,
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            show_scorekeeper_map_id: row.i64(SHOW_SCOREKEEPER_MAP_ID.source)?,
            show_id: row.i64(SHOW_ID.source)?,
            scorekeeper_id: row.i64(SCOREKEEPER_ID.source)?,
            guest: row.opt_i64(GUEST_FLAG.source)?,
            description: row.opt_text(SCOREKEEPER_DESCRIPTION.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.show_scorekeeper_map_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![
            self.show_scorekeeper_map_id.into(),
            self.show_id.into(),
            self.scorekeeper_id.into(),
            self.guest.into(),
            self.description.clone().into(),
        ]
    }
}
