//! Reconstruction: snapshot base plus a bounded diff chain.

use folio_core::{
  Error, Result,
  store::{BlobStore, MetadataStore},
};
use uuid::Uuid;

use crate::diff;

/// Reconstruct the exact content of a page as of `target`.
///
/// Reads the nearest snapshot at or before the target revision, then replays
/// the diffs of every revision recorded after that snapshot up to and
/// including the target, in `date_time` order. The replay length is bounded
/// by the compaction threshold regardless of total history length.
///
/// Fails `RevisionNotFound` for an unknown target and `PageDeleted` if the
/// owning page is soft-deleted.
pub async fn content_at_revision<M, B>(
  meta: &M,
  blobs: &B,
  target: Uuid,
) -> Result<String>
where
  M: MetadataStore,
  B: BlobStore,
{
  let revision = meta.get_revision(target).await?;
  let page = meta.get_page(revision.page_id).await?;
  if page.is_deleted() {
    return Err(Error::PageDeleted(page.uuid));
  }

  let snapshot = meta.snapshot_at_or_before(target).await?;
  let snapshot_revision = meta.get_revision(snapshot.revision).await?;
  let mut content = blobs.read_snapshot(snapshot.uuid).await?;

  let missing = meta
    .revisions_between(
      page.uuid,
      snapshot_revision.date_time,
      revision.date_time,
    )
    .await?;

  for rev in missing {
    let diff_blob = blobs.read_revision_diff(rev.uuid).await?;
    content = diff::apply_diff(rev.uuid, &content, &diff_blob)?;
  }

  Ok(content)
}
