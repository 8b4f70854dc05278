//! Shows and the people and places that appear on them.

use chrono::NaiveDate;

use super::Entity;
use crate::core::{ColumnSpec, Row, SqlValue, TableSpec};
use crate::error::Result;

pub(super) const SHOW_ID: ColumnSpec = ColumnSpec::plain("showid");
const SHOW_DATE: ColumnSpec = ColumnSpec::plain("showdate");
const BEST_OF: ColumnSpec = ColumnSpec::plain("bestof");
const BEST_OF_UNIQUE_BLUFF: ColumnSpec = ColumnSpec::plain("bestofuniquebluff");
const REPEAT_SHOW_ID: ColumnSpec = ColumnSpec::plain("repeatshowid");

const SHOW_DESCRIPTION: ColumnSpec = ColumnSpec::text("showdescription");
const SHOW_NOTES: ColumnSpec = ColumnSpec::text("shownotes");

const GUEST_ID: ColumnSpec = ColumnSpec::plain("guestid");
const GUEST: ColumnSpec = ColumnSpec::plain("guest");
const GUEST_SLUG: ColumnSpec = ColumnSpec::plain("guestslug");

const HOST_ID: ColumnSpec = ColumnSpec::plain("hostid");
const HOST: ColumnSpec = ColumnSpec::text("host");
const HOST_GENDER: ColumnSpec = ColumnSpec::plain("hostgender");
const HOST_SLUG: ColumnSpec = ColumnSpec::plain("hostslug");

const LOCATION_ID: ColumnSpec = ColumnSpec::plain("locationid");
const CITY: ColumnSpec = ColumnSpec::plain("city");
const STATE: ColumnSpec = ColumnSpec::plain("state");
const VENUE: ColumnSpec = ColumnSpec::text("venue");
const LOCATION_SLUG: ColumnSpec = ColumnSpec::plain("locationslug");

const PANELIST_ID: ColumnSpec = ColumnSpec::plain("panelistid");
const PANELIST: ColumnSpec = ColumnSpec::text("panelist");
const PANELIST_GENDER: ColumnSpec = ColumnSpec::plain("panelistgender");
const PANELIST_SLUG: ColumnSpec = ColumnSpec::plain("panelistslug");

const SCOREKEEPER_ID: ColumnSpec = ColumnSpec::plain("scorekeeperid");
const SCOREKEEPER: ColumnSpec = ColumnSpec::text("scorekeeper");
const SCOREKEEPER_GENDER: ColumnSpec = ColumnSpec::plain("scorekeepergender");
const SCOREKEEPER_SLUG: ColumnSpec = ColumnSpec::plain("scorekeeperslug");

/// One broadcast.
///
/// `repeat_show_id` points at the original broadcast of a repeat. It is a
/// reference into the same table, so it is written in a second pass once
/// every show exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Show {
    pub show_id: i64,
    pub show_date: NaiveDate,
    /// Flag columns keep their stored integer, NULL included.
    pub best_of: Option<i64>,
    pub best_of_unique_bluff: Option<i64>,
    pub repeat_show_id: Option<i64>,
}

impl Show {
    /// Column written by the second pass.
    pub const REPEAT_SHOW_ID: &'static str = REPEAT_SHOW_ID.destination;
}

impl Entity for Show {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_shows",
        destination_table: "ww_shows",
        columns: &[SHOW_ID, SHOW_DATE, BEST_OF, BEST_OF_UNIQUE_BLUFF],
        deferred: &[REPEAT_SHOW_ID],
        filter: None,
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            show_id: row.i64(SHOW_ID.source)?,
            show_date: row.date(SHOW_DATE.source)?,
            best_of: row.opt_i64(BEST_OF.source)?,
            best_of_unique_bluff: row.opt_i64(BEST_OF_UNIQUE_BLUFF.source)?,
            repeat_show_id: row.opt_i64(REPEAT_SHOW_ID.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.show_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![
            self.show_id.into(),
            self.show_date.into(),
            self.best_of.into(),
            self.best_of_unique_bluff.into(),
        ]
    }
}

/// Free-text description of a show.
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    pub show_id: i64,
    pub description: Option<String>,
}

impl Entity for Description {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_showdescriptions",
        destination_table: "ww_showdescriptions",
        columns: &[SHOW_ID, SHOW_DESCRIPTION],
        deferred: &[],
        filter: None,
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            show_id: row.i64(SHOW_ID.source)?,
            description: row.opt_text(SHOW_DESCRIPTION.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.show_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![self.show_id.into(), self.description.clone().into()]
    }
}

/// Free-text production notes for a show.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub show_id: i64,
    pub notes: Option<String>,
}

impl Entity for Note {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_shownotes",
        destination_table: "ww_shownotes",
        columns: &[SHOW_ID, SHOW_NOTES],
        deferred: &[],
        filter: None,
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            show_id: row.i64(SHOW_ID.source)?,
            notes: row.opt_text(SHOW_NOTES.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.show_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![self.show_id.into(), self.notes.clone().into()]
    }
}

/// "Not My Job" guest.
#[derive(Debug, Clone, PartialEq)]
pub struct Guest {
    pub guest_id: i64,
    pub guest: Option<String>,
    pub slug: Option<String>,
}

impl Entity for Guest {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_guests",
        destination_table: "ww_guests",
        columns: &[GUEST_ID, GUEST, GUEST_SLUG],
        deferred: &[],
        filter: None,
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            guest_id: row.i64(GUEST_ID.source)?,
            guest: row.opt_text(GUEST.source)?,
            slug: row.opt_text(GUEST_SLUG.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.guest_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![
            self.guest_id.into(),
            self.guest.clone().into(),
            self.slug.clone().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Host {
    pub host_id: i64,
    pub host: Option<String>,
    pub gender: Option<String>,
    pub slug: Option<String>,
}

impl Entity for Host {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_hosts",
        destination_table: "ww_hosts",
        columns: &[HOST_ID, HOST, HOST_GENDER, HOST_SLUG],
        deferred: &[],
        filter: None,
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            host_id: row.i64(HOST_ID.source)?,
            host: row.opt_text(HOST.source)?,
            gender: row.opt_text(HOST_GENDER.source)?,
            slug: row.opt_text(HOST_SLUG.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.host_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![
            self.host_id.into(),
            self.host.clone().into(),
            self.gender.clone().into(),
            self.slug.clone().into(),
        ]
    }
}

/// Recording venue.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub location_id: i64,
    pub city: Option<String>,
    pub state: Option<String>,
    pub venue: Option<String>,
    pub slug: Option<String>,
}

impl Entity for Location {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_locations",
        destination_table: "ww_locations",
        columns: &[LOCATION_ID, CITY, STATE, VENUE, LOCATION_SLUG],
        deferred: &[],
        filter: None,
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            location_id: row.i64(LOCATION_ID.source)?,
            city: row.opt_text(CITY.source)?,
            state: row.opt_text(STATE.source)?,
            venue: row.opt_text(VENUE.source)?,
            slug: row.opt_text(LOCATION_SLUG.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.location_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![
            self.location_id.into(),
            self.city.clone().into(),
            self.state.clone().into(),
            self.venue.clone().into(),
            self.slug.clone().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panelist {
    pub panelist_id: i64,
    pub panelist: Option<String>,
    pub gender: Option<String>,
    pub slug: Option<String>,
}

impl Entity for Panelist {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_panelists",
        destination_table: "ww_panelists",
        columns: &[PANELIST_ID, PANELIST, PANELIST_GENDER, PANELIST_SLUG],
        deferred: &[],
        filter: None,
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            panelist_id: row.i64(PANELIST_ID.source)?,
            panelist: row.opt_text(PANELIST.source)?,
            gender: row.opt_text(PANELIST_GENDER.source)?,
            slug: row.opt_text(PANELIST_SLUG.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.panelist_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![
            self.panelist_id.into(),
            self.panelist.clone().into(),
            self.gender.clone().into(),
            self.slug.clone().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scorekeeper {
    pub scorekeeper_id: i64,
    pub scorekeeper: Option<String>,
    pub gender: Option<String>,
    pub slug: Option<String>,
}

impl Entity for Scorekeeper {
    const SPEC: TableSpec = TableSpec {
        source_table: "ww_scorekeepers",
        destination_table: "ww_scorekeepers",
        columns: &[SCOREKEEPER_ID, SCOREKEEPER, SCOREKEEPER_GENDER, SCOREKEEPER_SLUG],
        deferred: &[],
        filter: None,
    };

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            scorekeeper_id: row.i64(SCOREKEEPER_ID.source)?,
            scorekeeper: row.opt_text(SCOREKEEPER.source)?,
            gender: row.opt_text(SCOREKEEPER_GENDER.source)?,
            slug: row.opt_text(SCOREKEEPER_SLUG.source)?,
        })
    }

    fn key(&self) -> i64 {
        self.scorekeeper_id
    }

    fn to_values(&self) -> Vec<SqlValue> {
        vec![
            self.scorekeeper_id.into(),
            self.scorekeeper.clone().into(),
            self.gender.clone().into(),
            self.slug.clone().into(),
        ]
    }
}
