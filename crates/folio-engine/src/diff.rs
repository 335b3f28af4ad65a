//! Unified-diff helpers on top of [`diffy`].
//!
//! A revision blob is the output of [`unified_diff`] against the preceding
//! content (empty for the first revision). [`apply_diff`] maps the two
//! failure modes onto the error taxonomy: an unparseable blob is corrupt
//! history (`Internal`), a clean parse that fails to apply is a
//! `RevisionConflict`. Neither is ever silently ignored or retried.

use folio_core::{Error, Result};
use uuid::Uuid;

/// The unified diff transforming `old` into `new`.
pub fn unified_diff(old: &str, new: &str) -> String {
  diffy::create_patch(old, new).to_string()
}

/// Apply the diff blob of `revision` to `base`.
pub fn apply_diff(revision: Uuid, base: &str, diff: &str) -> Result<String> {
  // `Patch::from_str` accepts arbitrary text as an empty patch, which would
  // make a corrupted blob apply as a no-op. Every blob written by
  // [`unified_diff`] starts with the `---`/`+++` file header, so anything
  // without it is corrupt history.
  if !diff.starts_with("--- ") {
    return Err(Error::Internal(format!(
      "corrupt diff blob for revision {revision}: missing unified diff header"
    )));
  }

  let patch = diffy::Patch::from_str(diff).map_err(|e| {
    Error::Internal(format!("corrupt diff blob for revision {revision}: {e}"))
  })?;

  diffy::apply(base, &patch).map_err(|e| Error::RevisionConflict {
    revision,
    source: Box::new(e),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn diff_from_empty_applies_to_empty() {
    let diff = unified_diff("", "Hello\nWorld\n");
    let rebuilt = apply_diff(Uuid::new_v4(), "", &diff).unwrap();
    assert_eq!(rebuilt, "Hello\nWorld\n");
  }

  #[test]
  fn diff_round_trips_edits() {
    let old = "line one\nline two\nline three\n";
    let new = "line one\nline 2\nline three\nline four\n";
    let diff = unified_diff(old, new);
    assert_eq!(apply_diff(Uuid::new_v4(), old, &diff).unwrap(), new);
  }

  #[test]
  fn unparseable_blob_is_internal() {
    let err = apply_diff(Uuid::new_v4(), "base", "not a diff at all").unwrap_err();
    assert!(matches!(err, Error::Internal(_)), "got {err:?}");
  }

  #[test]
  fn headerless_text_is_internal_even_if_it_parses() {
    // Free text parses as an empty patch; it must not apply as a no-op.
    let err =
      apply_diff(Uuid::new_v4(), "base", "just some prose, no header").unwrap_err();
    assert!(matches!(err, Error::Internal(_)), "got {err:?}");
  }

  #[test]
  fn header_with_garbage_body_is_internal() {
    let blob = "--- original\n+++ modified\nnot a hunk\n";
    let err = apply_diff(Uuid::new_v4(), "base", blob).unwrap_err();
    assert!(matches!(err, Error::Internal(_)), "got {err:?}");
  }

  #[test]
  fn no_change_diff_applies_as_a_no_op() {
    let diff = unified_diff("same\n", "same\n");
    assert_eq!(apply_diff(Uuid::new_v4(), "same\n", &diff).unwrap(), "same\n");
  }

  #[test]
  fn mismatched_base_is_a_conflict() {
    let diff = unified_diff("alpha\nbeta\n", "alpha\ngamma\n");
    let err = apply_diff(Uuid::new_v4(), "something else entirely\n", &diff)
      .unwrap_err();
    assert!(matches!(err, Error::RevisionConflict { .. }), "got {err:?}");
  }
}
