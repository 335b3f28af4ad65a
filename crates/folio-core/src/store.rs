//! The `MetadataStore` and `BlobStore` traits.
//!
//! Implemented by storage backends (`folio-store-sqlite`, `folio-store-fs`).
//! The revision engine depends on these abstractions, not on any concrete
//! backend, and is the only component allowed to write through them.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  Result,
  page::{Category, Page},
  revision::{Revision, Snapshot},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`MetadataStore::list_pages`].
#[derive(Debug, Clone, Default)]
pub struct PageQuery {
  pub offset:   usize,
  pub count:    usize,
  /// Category id or slug; an unknown category yields an empty listing.
  pub category: Option<String>,
}

/// Everything needed to create a page row together with its initial revision
/// and snapshot in one transaction. UUIDs are supplied by the caller because
/// the engine writes the matching blobs before the metadata commit.
#[derive(Debug, Clone)]
pub struct NewPageRecord {
  pub page_id:      Uuid,
  pub slug:         String,
  pub name:         String,
  pub archive_date: Option<NaiveDate>,
  pub revision_id:  Uuid,
  pub snapshot_id:  Uuid,
  pub author:       String,
}

// ─── Metadata store ──────────────────────────────────────────────────────────

/// Relational persistence for page, revision, snapshot, and category records.
///
/// Owns identity, ordering (`date_time`), and soft-delete flags. Read
/// operations distinguish "not found" from store failure via the error
/// taxonomy; each mutating operation runs inside a single atomic transaction.
pub trait MetadataStore: Send + Sync {
  // ── Reads ─────────────────────────────────────────────────────────────

  /// Map a slug to the canonical page UUID.
  fn resolve_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Uuid>> + Send + 'a;

  fn get_page(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Page>> + Send + '_;

  /// Page UUIDs ordered by slug, excluding soft-deleted pages, bounded by
  /// offset/count at the store level.
  fn list_pages<'a>(
    &'a self,
    query: &'a PageQuery,
  ) -> impl Future<Output = Result<Vec<Uuid>>> + Send + 'a;

  fn get_revision(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Revision>> + Send + '_;

  /// Revision UUIDs for a page ordered by `date_time` ascending.
  fn list_revisions(
    &self,
    page_id: Uuid,
    offset: usize,
    count: usize,
  ) -> impl Future<Output = Result<Vec<Uuid>>> + Send + '_;

  /// The snapshot for the same page whose revision's `date_time` is the
  /// greatest value at or before the target revision's.
  fn snapshot_at_or_before(
    &self,
    revision_id: Uuid,
  ) -> impl Future<Output = Result<Snapshot>> + Send + '_;

  /// Full revision rows with `after < date_time <= until`, ascending.
  /// This is the "missing revisions" enumeration used by reconstruction.
  fn revisions_between(
    &self,
    page_id: Uuid,
    after: DateTime<Utc>,
    until: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<Revision>>> + Send + '_;

  /// How many revisions a page has accumulated strictly after `after`.
  /// Used to decide snapshot compaction.
  fn count_revisions_after(
    &self,
    page_id: Uuid,
    after: DateTime<Utc>,
  ) -> impl Future<Output = Result<u64>> + Send + '_;

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Insert the page row, its first revision, and its first snapshot, and
  /// point `last_revision_id` at that revision — all in one transaction.
  fn insert_page(
    &self,
    record: NewPageRecord,
  ) -> impl Future<Output = Result<(Page, Revision, Snapshot)>> + Send + '_;

  /// Insert a revision row with a store-assigned `date_time` and update the
  /// page's `last_revision_id` in the same transaction.
  fn insert_revision<'a>(
    &'a self,
    id: Uuid,
    page_id: Uuid,
    author: &'a str,
  ) -> impl Future<Output = Result<Revision>> + Send + 'a;

  fn insert_snapshot(
    &self,
    id: Uuid,
    page_id: Uuid,
    revision_id: Uuid,
  ) -> impl Future<Output = Result<Snapshot>> + Send + '_;

  /// Set `deleted_at`. Revision and snapshot rows are never removed.
  fn mark_page_deleted(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<DateTime<Utc>>> + Send + '_;

  // ── Categories ────────────────────────────────────────────────────────

  fn create_category<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Category>> + Send + 'a;

  /// Associate a page with a category (id or slug).
  fn tag_page<'a>(
    &'a self,
    page_id: Uuid,
    category: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;
}

// ─── Blob store ──────────────────────────────────────────────────────────────

/// The three kinds of content blob, keyed by UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
  /// Current tip content: `pages/<uuid>.md`.
  Page,
  /// Unified diff against the preceding content: `revisions/<uuid>.txt`.
  Revision,
  /// Full reconstructed content at a checkpoint: `snapshots/<uuid>.md`.
  Snapshot,
}

impl BlobKind {
  pub fn dir(self) -> &'static str {
    match self {
      Self::Page => "pages",
      Self::Revision => "revisions",
      Self::Snapshot => "snapshots",
    }
  }

  pub fn extension(self) -> &'static str {
    match self {
      Self::Page | Self::Snapshot => "md",
      Self::Revision => "txt",
    }
  }
}

/// Filesystem persistence for content blobs.
///
/// Writes create any needed parent location and must never leave a partial
/// blob visible under its final name. `delete` exists only as compensating
/// cleanup after a metadata-transaction failure.
pub trait BlobStore: Send + Sync {
  fn read_page(
    &self,
    page_id: Uuid,
  ) -> impl Future<Output = Result<String>> + Send + '_;

  fn read_revision_diff(
    &self,
    revision_id: Uuid,
  ) -> impl Future<Output = Result<String>> + Send + '_;

  fn read_snapshot(
    &self,
    snapshot_id: Uuid,
  ) -> impl Future<Output = Result<String>> + Send + '_;

  fn write_page<'a>(
    &'a self,
    page_id: Uuid,
    content: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  fn write_revision_diff<'a>(
    &'a self,
    revision_id: Uuid,
    diff: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  fn write_snapshot<'a>(
    &'a self,
    snapshot_id: Uuid,
    content: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  fn delete(
    &self,
    kind: BlobKind,
    id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;
}
