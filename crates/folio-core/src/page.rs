//! Page types — identity, previews, and the request/view shapes around them.
//!
//! A page owns an append-only log of revisions. Its full text lives in the
//! content blob store; rows here carry identity and ordering only.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A wiki page row. `last_revision_id`, when set, always references a
/// revision whose `page_id` equals this page's `uuid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
  pub uuid:             Uuid,
  /// Human key, unique across live and deleted pages.
  pub slug:             String,
  pub name:             String,
  /// The date of the historical subject, not an edit time.
  pub archive_date:     Option<NaiveDate>,
  pub last_revision_id: Option<Uuid>,
  /// Soft-delete marker; a deleted page keeps its full history.
  pub deleted_at:       Option<DateTime<Utc>>,
}

impl Page {
  pub fn is_deleted(&self) -> bool { self.deleted_at.is_some() }
}

/// Input for creating a page with its initial content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPage {
  pub slug:         String,
  pub name:         String,
  pub author:       String,
  pub archive_date: Option<NaiveDate>,
  pub content:      String,
}

/// A page plus its current tip content, as returned by the read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
  #[serde(flatten)]
  pub page:           Page,
  pub last_edit_time: Option<DateTime<Utc>>,
  pub content:        String,
}

/// The listing shape: metadata plus a short flattened content preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagePreview {
  pub uuid:           Uuid,
  pub slug:           String,
  pub name:           String,
  pub last_edit_time: Option<DateTime<Utc>>,
  pub archive_date:   Option<NaiveDate>,
  pub preview:        String,
}

/// One page in the bulk dump consumed by the search indexer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
  pub uuid:          Uuid,
  pub slug:          String,
  pub name:          String,
  pub last_modified: Option<DateTime<Utc>>,
  pub archive_date:  Option<NaiveDate>,
  pub content:       String,
}

/// An auxiliary label, used only for list filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
  pub id:   i64,
  pub slug: String,
}
