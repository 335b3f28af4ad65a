//! The Folio versioning engine.
//!
//! Pages are stored as an append-only sequence of unified diffs, periodically
//! compacted into full-content snapshots; the exact text at any historical
//! revision is reconstructed from the nearest preceding snapshot plus a
//! bounded diff chain. [`Engine`] orchestrates the metadata and blob stores
//! as one logical unit of work and is the only writer of either.

pub mod diff;
pub mod engine;
pub mod locks;
pub mod preview;
pub mod reconstruct;
pub mod resolve;

pub use engine::{DEFAULT_SNAPSHOT_THRESHOLD, Engine};
