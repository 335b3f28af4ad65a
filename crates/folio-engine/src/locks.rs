//! Per-key write serialization.
//!
//! Two concurrent writers against the same page would otherwise read the same
//! tip, produce divergent diffs, and silently overwrite each other's tip
//! update. Mutating operations take the page's lock (keyed by UUID, or by
//! slug for not-yet-created pages) around the whole read-diff-write sequence.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
};

use tokio::sync::Mutex as AsyncMutex;

/// A registry of per-key async mutexes.
///
/// Entries are created on first use and kept for the life of the process; the
/// key space is pages, which is small and bounded by actual content.
#[derive(Default)]
pub struct KeyLocks {
  inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyLocks {
  pub fn new() -> Self { Self::default() }

  /// The lock for `key`. Callers hold the returned handle and `.lock().await`
  /// it for the duration of the critical section.
  pub fn for_key(&self, key: &str) -> Arc<AsyncMutex<()>> {
    let mut map = self
      .inner
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner());
    map.entry(key.to_owned()).or_default().clone()
  }
}
