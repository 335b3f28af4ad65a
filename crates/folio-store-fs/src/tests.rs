//! Tests for `FsBlobStore` against a temporary data directory.

use folio_core::store::{BlobKind, BlobStore};
use tempfile::TempDir;
use uuid::Uuid;

use crate::FsBlobStore;

fn store() -> (FsBlobStore, TempDir) {
  let dir = TempDir::new().expect("temp dir");
  (FsBlobStore::new(dir.path()), dir)
}

#[tokio::test]
async fn write_then_read_round_trips() {
  let (s, _dir) = store();
  let id = Uuid::new_v4();

  s.write_page(id, "# Hello\n").await.unwrap();
  assert_eq!(s.read_page(id).await.unwrap(), "# Hello\n");

  s.write_revision_diff(id, "--- a\n+++ b\n").await.unwrap();
  assert_eq!(s.read_revision_diff(id).await.unwrap(), "--- a\n+++ b\n");

  s.write_snapshot(id, "full text").await.unwrap();
  assert_eq!(s.read_snapshot(id).await.unwrap(), "full text");
}

#[tokio::test]
async fn blobs_land_in_the_conventional_layout() {
  let (s, dir) = store();
  let id = Uuid::new_v4();

  s.write_page(id, "tip").await.unwrap();
  s.write_revision_diff(id, "diff").await.unwrap();
  s.write_snapshot(id, "snap").await.unwrap();

  assert!(dir.path().join("pages").join(format!("{id}.md")).is_file());
  assert!(dir.path().join("revisions").join(format!("{id}.txt")).is_file());
  assert!(dir.path().join("snapshots").join(format!("{id}.md")).is_file());
}

#[tokio::test]
async fn overwrite_replaces_content_and_leaves_no_temp_file() {
  let (s, dir) = store();
  let id = Uuid::new_v4();

  s.write_page(id, "first").await.unwrap();
  s.write_page(id, "second").await.unwrap();
  assert_eq!(s.read_page(id).await.unwrap(), "second");

  let tmp = dir.path().join("pages").join(format!("{id}.tmp"));
  assert!(!tmp.exists());
}

#[tokio::test]
async fn read_missing_blob_is_a_filesystem_error() {
  let (s, _dir) = store();

  let err = s.read_page(Uuid::new_v4()).await.unwrap_err();
  assert!(
    matches!(err, folio_core::Error::Filesystem(_)),
    "got {err:?}"
  );
}

#[tokio::test]
async fn delete_removes_the_blob() {
  let (s, _dir) = store();
  let id = Uuid::new_v4();

  s.write_revision_diff(id, "diff").await.unwrap();
  s.delete(BlobKind::Revision, id).await.unwrap();

  let err = s.read_revision_diff(id).await.unwrap_err();
  assert!(matches!(err, folio_core::Error::Filesystem(_)));
}
