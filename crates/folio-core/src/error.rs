//! The closed error taxonomy for the versioning engine.
//!
//! Every store-level failure is wrapped with its kind and original cause at
//! the point of detection; higher layers only attach operation context. The
//! taxonomy is matched exhaustively once, at the HTTP boundary.

use thiserror::Error;
use uuid::Uuid;

/// A boxed underlying cause from a store backend.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("page not found: {0}")]
  PageNotFound(String),

  #[error("revision not found: {0}")]
  RevisionNotFound(Uuid),

  #[error("no snapshot exists at or before revision {0}")]
  SnapshotNotFound(Uuid),

  #[error("page {0} is deleted")]
  PageDeleted(Uuid),

  #[error("revision {0} belongs to a deleted page")]
  RevisionDeleted(Uuid),

  #[error("snapshot {0} belongs to a deleted page")]
  SnapshotDeleted(Uuid),

  #[error("invalid identifier: {0:?}")]
  InvalidIdentifier(String),

  #[error("revision {revision} does not apply cleanly: {source}")]
  RevisionConflict {
    revision: Uuid,
    #[source]
    source:   Cause,
  },

  #[error("database error: {0}")]
  Database(#[source] Cause),

  #[error("filesystem error: {0}")]
  Filesystem(#[source] Cause),

  /// A single logical operation failed after touching both stores, e.g.
  /// snapshot compaction after the revision itself already committed.
  #[error("database/filesystem error: {0}")]
  DatabaseFilesystem(#[source] Cause),

  /// Corrupt history (unparseable diff) or any unclassified fault.
  #[error("internal error: {0}")]
  Internal(String),
}

impl Error {
  /// True for the `*NotFound` kinds.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::PageNotFound(_) | Self::RevisionNotFound(_) | Self::SnapshotNotFound(_)
    )
  }

  /// True for the `*Deleted` kinds.
  pub fn is_deleted(&self) -> bool {
    matches!(
      self,
      Self::PageDeleted(_) | Self::RevisionDeleted(_) | Self::SnapshotDeleted(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
