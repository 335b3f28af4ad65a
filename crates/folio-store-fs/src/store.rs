//! [`FsBlobStore`] — the data-directory implementation of [`BlobStore`].

use std::path::{Path, PathBuf};

use tokio::{fs, io::AsyncWriteExt as _};
use uuid::Uuid;

use folio_core::store::{BlobKind, BlobStore};

use crate::{Error, Result};

/// A content blob store rooted at a data directory.
///
/// Cloning is cheap — only the root path is held.
#[derive(Clone)]
pub struct FsBlobStore {
  root: PathBuf,
}

impl FsBlobStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path { &self.root }

  /// The final on-disk location for a blob.
  pub fn blob_path(&self, kind: BlobKind, id: Uuid) -> PathBuf {
    self
      .root
      .join(kind.dir())
      .join(format!("{id}.{}", kind.extension()))
  }

  async fn read(&self, kind: BlobKind, id: Uuid) -> Result<String> {
    let path = self.blob_path(kind, id);
    fs::read_to_string(&path)
      .await
      .map_err(|e| Error::io(path, e))
  }

  /// Write the full blob under a temporary name, fsync, then rename. A blob
  /// is never visible under its final name unless the write completed.
  async fn write_atomic(&self, kind: BlobKind, id: Uuid, content: &str) -> Result<()> {
    let path = self.blob_path(kind, id);
    let dir = self.root.join(kind.dir());
    fs::create_dir_all(&dir)
      .await
      .map_err(|e| Error::io(&dir, e))?;

    let tmp = path.with_extension("tmp");
    let mut file = fs::File::create(&tmp)
      .await
      .map_err(|e| Error::io(&tmp, e))?;
    file
      .write_all(content.as_bytes())
      .await
      .map_err(|e| Error::io(&tmp, e))?;
    file.sync_all().await.map_err(|e| Error::io(&tmp, e))?;
    drop(file);

    fs::rename(&tmp, &path)
      .await
      .map_err(|e| Error::io(&path, e))?;

    tracing::debug!(kind = kind.dir(), %id, "wrote blob");
    Ok(())
  }
}

impl BlobStore for FsBlobStore {
  async fn read_page(&self, page_id: Uuid) -> folio_core::Result<String> {
    Ok(self.read(BlobKind::Page, page_id).await?)
  }

  async fn read_revision_diff(&self, revision_id: Uuid) -> folio_core::Result<String> {
    Ok(self.read(BlobKind::Revision, revision_id).await?)
  }

  async fn read_snapshot(&self, snapshot_id: Uuid) -> folio_core::Result<String> {
    Ok(self.read(BlobKind::Snapshot, snapshot_id).await?)
  }

  async fn write_page(&self, page_id: Uuid, content: &str) -> folio_core::Result<()> {
    Ok(self.write_atomic(BlobKind::Page, page_id, content).await?)
  }

  async fn write_revision_diff(
    &self,
    revision_id: Uuid,
    diff: &str,
  ) -> folio_core::Result<()> {
    Ok(self.write_atomic(BlobKind::Revision, revision_id, diff).await?)
  }

  async fn write_snapshot(
    &self,
    snapshot_id: Uuid,
    content: &str,
  ) -> folio_core::Result<()> {
    Ok(self.write_atomic(BlobKind::Snapshot, snapshot_id, content).await?)
  }

  async fn delete(&self, kind: BlobKind, id: Uuid) -> folio_core::Result<()> {
    let path = self.blob_path(kind, id);
    fs::remove_file(&path)
      .await
      .map_err(|e| Error::io(path, e))?;
    Ok(())
  }
}
