//! Error type for `folio-store-fs`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("blob {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl Error {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io { path: path.into(), source }
  }
}

impl From<Error> for folio_core::Error {
  fn from(e: Error) -> Self {
    folio_core::Error::Filesystem(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
