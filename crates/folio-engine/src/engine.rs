//! [`Engine`] — orchestration of page creation, revision append, snapshot
//! compaction, soft deletion, and the read paths.
//!
//! The engine is stateless between calls apart from its per-page write locks;
//! every read re-fetches from the stores. Metadata rows and blobs are created
//! and removed together: blobs are written first, keyed by UUIDs generated
//! here, and the metadata transaction commits last. A [`BlobGuard`] deletes
//! any blob written by an operation that does not reach its commit, on every
//! exit path including cancellation.

use folio_core::{
  Error, Result,
  page::{IndexEntry, NewPage, Page, PagePreview, PageView},
  revision::{Revision, RevisionView, Snapshot},
  store::{BlobKind, BlobStore, MetadataStore, NewPageRecord, PageQuery},
};
use uuid::Uuid;

use crate::{locks::KeyLocks, preview, reconstruct, resolve};

/// Missing revisions accumulated since the latest snapshot before a new
/// snapshot is materialised.
pub const DEFAULT_SNAPSHOT_THRESHOLD: u64 = 10;

/// The revision engine. Exclusively owns the invariant that metadata rows
/// and content blobs are created and removed together.
pub struct Engine<M, B> {
  meta:      M,
  blobs:     B,
  locks:     KeyLocks,
  threshold: u64,
}

impl<M, B> Engine<M, B>
where
  M: MetadataStore,
  B: BlobStore + Clone + 'static,
{
  pub fn new(meta: M, blobs: B) -> Self {
    Self::with_threshold(meta, blobs, DEFAULT_SNAPSHOT_THRESHOLD)
  }

  pub fn with_threshold(meta: M, blobs: B, threshold: u64) -> Self {
    Self { meta, blobs, locks: KeyLocks::new(), threshold }
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Create a page with exactly one revision (a diff from empty content) and
  /// one snapshot. Either the page exists completely afterwards or not at
  /// all — no partial page is ever observable.
  pub async fn create_page(&self, req: NewPage) -> Result<Page> {
    let lock = self.locks.for_key(&req.slug);
    let _held = lock.lock().await;

    let page_id = Uuid::new_v4();
    let revision_id = Uuid::new_v4();
    let snapshot_id = Uuid::new_v4();
    let initial_diff = crate::diff::unified_diff("", &req.content);

    let mut guard = BlobGuard::new(self.blobs.clone());
    self.blobs.write_page(page_id, &req.content).await?;
    guard.record(BlobKind::Page, page_id);
    self.blobs.write_revision_diff(revision_id, &initial_diff).await?;
    guard.record(BlobKind::Revision, revision_id);
    self.blobs.write_snapshot(snapshot_id, &req.content).await?;
    guard.record(BlobKind::Snapshot, snapshot_id);

    let record = NewPageRecord {
      page_id,
      slug: req.slug,
      name: req.name,
      archive_date: req.archive_date,
      revision_id,
      snapshot_id,
      author: req.author,
    };
    let (page, _revision, _snapshot) = match self.meta.insert_page(record).await {
      Ok(created) => created,
      Err(e) => {
        guard.clean().await;
        return Err(e);
      }
    };
    guard.disarm();

    tracing::info!(slug = %page.slug, page = %page.uuid, "created page");
    Ok(page)
  }

  /// Append one revision of full new content.
  ///
  /// The revision is durable once its metadata commits; the follow-up
  /// snapshot compaction and tip-blob refresh can fail without rolling it
  /// back, and such failures are reported to the caller.
  pub async fn post_revision(
    &self,
    page: &str,
    author: &str,
    new_content: &str,
  ) -> Result<Revision> {
    let page_id = resolve::resolve_page(&self.meta, page).await?;

    let lock = self.locks.for_key(&page_id.to_string());
    let _held = lock.lock().await;

    let info = self.meta.get_page(page_id).await?;
    if info.is_deleted() {
      return Err(Error::PageDeleted(page_id));
    }

    let current = self.blobs.read_page(page_id).await?;
    let diff = crate::diff::unified_diff(&current, new_content);
    let revision_id = Uuid::new_v4();

    let mut guard = BlobGuard::new(self.blobs.clone());
    self.blobs.write_revision_diff(revision_id, &diff).await?;
    guard.record(BlobKind::Revision, revision_id);

    let revision = match self.meta.insert_revision(revision_id, page_id, author).await
    {
      Ok(revision) => revision,
      Err(e) => {
        guard.clean().await;
        return Err(e);
      }
    };
    guard.disarm();

    tracing::info!(page = %page_id, revision = %revision.uuid, "appended revision");

    // Compaction is a best-effort optimisation: the revision above stays
    // committed even if this fails, and a later append retries it.
    if let Err(e) = self.maybe_compact(page_id, &revision).await {
      tracing::warn!(page = %page_id, error = %e, "snapshot compaction failed");
      return Err(Error::DatabaseFilesystem(Box::new(e)));
    }

    // The tip blob is a cache of reconstructed state, not the source of
    // truth; the revision remains correct even if this write fails.
    self.blobs.write_page(page_id, new_content).await?;

    Ok(revision)
  }

  /// Soft-delete a page. Revision and snapshot rows and blobs are never
  /// removed; the page is hidden from normal access.
  pub async fn delete_page(&self, page: &str, user: &str) -> Result<()> {
    let page_id = resolve::resolve_page(&self.meta, page).await?;

    let lock = self.locks.for_key(&page_id.to_string());
    let _held = lock.lock().await;

    let info = self.meta.get_page(page_id).await?;
    if info.is_deleted() {
      return Err(Error::PageDeleted(page_id));
    }

    self.meta.mark_page_deleted(page_id).await?;
    tracing::info!(page = %page_id, slug = %info.slug, %user, "soft-deleted page");
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Full page by UUID or slug: metadata plus tip content.
  pub async fn get_page(&self, id: &str) -> Result<PageView> {
    let page_id = resolve::resolve_page(&self.meta, id).await?;
    let page = self.meta.get_page(page_id).await?;
    if page.is_deleted() {
      return Err(Error::PageDeleted(page_id));
    }

    let content = self.blobs.read_page(page_id).await?;
    let last_edit_time = self.last_edit_time(&page).await?;

    Ok(PageView { page, last_edit_time, content })
  }

  /// A revision's metadata plus its reconstructed content.
  pub async fn get_revision(&self, id: &str) -> Result<RevisionView> {
    let revision_id = Uuid::parse_str(id)
      .map_err(|_| Error::InvalidIdentifier(id.to_owned()))?;

    let content =
      reconstruct::content_at_revision(&self.meta, &self.blobs, revision_id)
        .await?;
    let revision = self.meta.get_revision(revision_id).await?;

    Ok(RevisionView { revision, content })
  }

  /// Page previews ordered by slug, excluding soft-deleted pages.
  pub async fn list_pages(&self, query: &PageQuery) -> Result<Vec<PagePreview>> {
    let ids = self.meta.list_pages(query).await?;

    let mut previews = Vec::with_capacity(ids.len());
    for id in ids {
      let page = self.meta.get_page(id).await?;
      let content = self.blobs.read_page(id).await?;
      let last_edit_time = self.last_edit_time(&page).await?;
      previews.push(PagePreview {
        uuid: page.uuid,
        slug: page.slug,
        name: page.name,
        last_edit_time,
        archive_date: page.archive_date,
        preview: preview::flatten(&content, preview::PREVIEW_LENGTH),
      });
    }
    Ok(previews)
  }

  /// Revision metadata for a page, ordered by `date_time` ascending.
  ///
  /// Deliberately works for soft-deleted pages: history stays enumerable,
  /// only the current view is hidden.
  pub async fn list_revisions(
    &self,
    page: &str,
    offset: usize,
    count: usize,
  ) -> Result<Vec<Revision>> {
    let page_id = resolve::resolve_page(&self.meta, page).await?;
    // Distinguish an unknown page from one with no listed revisions.
    self.meta.get_page(page_id).await?;

    let ids = self.meta.list_revisions(page_id, offset, count).await?;
    let mut revisions = Vec::with_capacity(ids.len());
    for id in ids {
      revisions.push(self.meta.get_revision(id).await?);
    }
    Ok(revisions)
  }

  /// Bulk dump of full tip content per live page, for the search indexer.
  pub async fn index_dump(
    &self,
    offset: usize,
    count: usize,
  ) -> Result<Vec<IndexEntry>> {
    let ids = self
      .meta
      .list_pages(&PageQuery { offset, count, category: None })
      .await?;

    let mut entries = Vec::with_capacity(ids.len());
    for id in ids {
      let page = self.meta.get_page(id).await?;
      let content = self.blobs.read_page(id).await?;
      let last_modified = self.last_edit_time(&page).await?;
      entries.push(IndexEntry {
        uuid: page.uuid,
        slug: page.slug,
        name: page.name,
        last_modified,
        archive_date: page.archive_date,
        content,
      });
    }
    Ok(entries)
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  async fn last_edit_time(
    &self,
    page: &Page,
  ) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    match page.last_revision_id {
      Some(revision_id) => {
        Ok(Some(self.meta.get_revision(revision_id).await?.date_time))
      }
      None => Ok(None),
    }
  }

  /// Materialise a snapshot at `latest` once enough revisions have
  /// accumulated since the most recent one.
  async fn maybe_compact(
    &self,
    page_id: Uuid,
    latest: &Revision,
  ) -> Result<Option<Snapshot>> {
    let snapshot = self.meta.snapshot_at_or_before(latest.uuid).await?;
    let snapshot_revision = self.meta.get_revision(snapshot.revision).await?;
    let missing = self
      .meta
      .count_revisions_after(page_id, snapshot_revision.date_time)
      .await?;
    if missing < self.threshold {
      return Ok(None);
    }

    let content =
      reconstruct::content_at_revision(&self.meta, &self.blobs, latest.uuid)
        .await?;
    let snapshot_id = Uuid::new_v4();

    let mut guard = BlobGuard::new(self.blobs.clone());
    self.blobs.write_snapshot(snapshot_id, &content).await?;
    guard.record(BlobKind::Snapshot, snapshot_id);

    let snapshot = match self
      .meta
      .insert_snapshot(snapshot_id, page_id, latest.uuid)
      .await
    {
      Ok(snapshot) => snapshot,
      Err(e) => {
        guard.clean().await;
        return Err(e);
      }
    };
    guard.disarm();

    tracing::info!(
      page = %page_id,
      revision = %latest.uuid,
      snapshot = %snapshot_id,
      missing,
      "compacted diff chain into snapshot"
    );
    Ok(Some(snapshot))
  }
}

// ─── Compensating cleanup ────────────────────────────────────────────────────

/// Tracks blobs written during one mutating operation and deletes them if the
/// operation does not reach its metadata commit.
///
/// Error paths call [`clean`](Self::clean) so orphans are gone before the
/// call returns; the `Drop` impl covers cancellation, where the deletes are
/// spawned onto the runtime.
struct BlobGuard<B: BlobStore + Clone + 'static> {
  blobs:   B,
  written: Vec<(BlobKind, Uuid)>,
  armed:   bool,
}

impl<B: BlobStore + Clone + 'static> BlobGuard<B> {
  fn new(blobs: B) -> Self {
    Self { blobs, written: Vec::new(), armed: true }
  }

  fn record(&mut self, kind: BlobKind, id: Uuid) {
    self.written.push((kind, id));
  }

  /// The metadata commit succeeded; the blobs are now owned by it.
  fn disarm(mut self) { self.armed = false; }

  /// Delete everything written so far, before returning the error.
  async fn clean(mut self) {
    self.armed = false;
    for (kind, id) in std::mem::take(&mut self.written) {
      if let Err(error) = self.blobs.delete(kind, id).await {
        tracing::warn!(kind = kind.dir(), %id, %error, "orphan blob cleanup failed");
      }
    }
  }
}

impl<B: BlobStore + Clone + 'static> Drop for BlobGuard<B> {
  fn drop(&mut self) {
    if !self.armed || self.written.is_empty() {
      return;
    }
    // Reached only when the owning future was cancelled mid-operation.
    let blobs = self.blobs.clone();
    let written = std::mem::take(&mut self.written);
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
      handle.spawn(async move {
        for (kind, id) in written {
          if let Err(error) = blobs.delete(kind, id).await {
            tracing::warn!(kind = kind.dir(), %id, %error, "orphan blob cleanup failed");
          }
        }
      });
    }
  }
}
