//! Identifier resolution: callers may supply a page UUID or a slug.

use folio_core::{Result, store::MetadataStore};
use uuid::Uuid;

/// Map a caller-supplied identifier to the canonical page UUID.
///
/// A syntactically valid UUID literal is returned directly, without a store
/// lookup; anything else is treated as a slug. Fails `PageNotFound` if
/// neither interpretation resolves.
pub async fn resolve_page<M: MetadataStore>(meta: &M, id: &str) -> Result<Uuid> {
  if let Ok(uuid) = Uuid::parse_str(id) {
    return Ok(uuid);
  }
  meta.resolve_slug(id).await
}
