//! Filesystem backend for the Folio content blob store.
//!
//! Blobs live under a single data directory, keyed by UUID:
//! `pages/<uuid>.md`, `revisions/<uuid>.txt`, `snapshots/<uuid>.md`.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::FsBlobStore;

#[cfg(test)]
mod tests;
