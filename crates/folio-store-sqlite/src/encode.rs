//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 with microseconds and a `Z`
//! suffix, so lexicographic column order equals chronological order and the
//! `date_time` range queries can compare strings directly. Archive dates are
//! `YYYY-MM-DD`. UUIDs are hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use folio_core::{
  page::Page,
  revision::{Revision, Snapshot},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `pages` row as it comes off the wire, before decoding.
pub struct RawPage {
  pub uuid:             String,
  pub slug:             String,
  pub name:             String,
  pub archive_date:     Option<String>,
  pub last_revision_id: Option<String>,
  pub deleted_at:       Option<String>,
}

impl RawPage {
  pub fn into_page(self) -> Result<Page> {
    Ok(Page {
      uuid:             decode_uuid(&self.uuid)?,
      slug:             self.slug,
      name:             self.name,
      archive_date:     self.archive_date.as_deref().map(decode_date).transpose()?,
      last_revision_id: self
        .last_revision_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      deleted_at:       self.deleted_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// A `revisions` row before decoding.
pub struct RawRevision {
  pub uuid:      String,
  pub page_id:   String,
  pub date_time: String,
  pub author:    String,
}

impl RawRevision {
  pub fn into_revision(self) -> Result<Revision> {
    Ok(Revision {
      uuid:      decode_uuid(&self.uuid)?,
      page_id:   decode_uuid(&self.page_id)?,
      date_time: decode_dt(&self.date_time)?,
      author:    self.author,
    })
  }
}

/// A `snapshots` row before decoding.
pub struct RawSnapshot {
  pub uuid:     String,
  pub page:     String,
  pub revision: String,
}

impl RawSnapshot {
  pub fn into_snapshot(self) -> Result<Snapshot> {
    Ok(Snapshot {
      uuid:     decode_uuid(&self.uuid)?,
      page:     decode_uuid(&self.page)?,
      revision: decode_uuid(&self.revision)?,
    })
  }
}
