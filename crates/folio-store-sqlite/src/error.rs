//! Error type for `folio-store-sqlite`.
//!
//! Converted into the core taxonomy at the [`MetadataStore`] trait seam:
//! the `*NotFound` variants keep their kind, everything else becomes
//! `Database` with the original cause attached.
//!
//! [`MetadataStore`]: folio_core::store::MetadataStore

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("page not found: {0}")]
  PageNotFound(String),

  #[error("revision not found: {0}")]
  RevisionNotFound(Uuid),

  #[error("no snapshot at or before revision {0}")]
  SnapshotNotFound(Uuid),
}

impl From<Error> for folio_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::PageNotFound(id) => folio_core::Error::PageNotFound(id),
      Error::RevisionNotFound(id) => folio_core::Error::RevisionNotFound(id),
      Error::SnapshotNotFound(id) => folio_core::Error::SnapshotNotFound(id),
      other => folio_core::Error::Database(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
