//! Revision and snapshot types.
//!
//! Revisions are immutable once created and form an append-only, time-ordered
//! log per page; each one's blob is a unified diff against the content as of
//! the immediately preceding revision (diff-from-empty for the first).
//! Snapshots are full-content checkpoints: deleting every snapshot of a page
//! changes reconstruction cost, never reconstruction result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One accepted edit. `date_time` is assigned by the metadata store at
/// insert and is strictly increasing per page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
  pub uuid:      Uuid,
  pub page_id:   Uuid,
  pub date_time: DateTime<Utc>,
  pub author:    String,
}

/// A full-content checkpoint. Its blob holds the exact reconstructed text as
/// of `revision`, inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
  pub uuid:     Uuid,
  pub page:     Uuid,
  pub revision: Uuid,
}

/// A revision plus its reconstructed content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionView {
  #[serde(flatten)]
  pub revision: Revision,
  pub content:  String,
}
