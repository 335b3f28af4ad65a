//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Engine(#[from] folio_core::Error),
}

/// Status code for an engine error.
fn engine_status(error: &folio_core::Error) -> StatusCode {
  use folio_core::Error::*;
  match error {
    PageNotFound(_) | RevisionNotFound(_) | SnapshotNotFound(_) => {
      StatusCode::NOT_FOUND
    }
    PageDeleted(_) | RevisionDeleted(_) | SnapshotDeleted(_) => {
      StatusCode::NOT_FOUND
    }
    InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
    RevisionConflict { .. } => StatusCode::CONFLICT,
    Database(_) | Filesystem(_) | DatabaseFilesystem(_) | Internal(_) => {
      StatusCode::INTERNAL_SERVER_ERROR
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Engine(e) => (engine_status(e), e.to_string()),
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
      tracing::error!(error = %message, "request failed");
    }
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use folio_core::Error;
  use uuid::Uuid;

  #[test]
  fn engine_errors_map_to_expected_statuses() {
    let id = Uuid::new_v4();
    let cases = [
      (Error::PageNotFound("x".into()), StatusCode::NOT_FOUND),
      (Error::RevisionNotFound(id), StatusCode::NOT_FOUND),
      (Error::PageDeleted(id), StatusCode::NOT_FOUND),
      (Error::InvalidIdentifier("x".into()), StatusCode::BAD_REQUEST),
      (
        Error::RevisionConflict { revision: id, source: "stale".into() },
        StatusCode::CONFLICT,
      ),
      (Error::Internal("broken".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (error, expected) in cases {
      assert_eq!(engine_status(&error), expected, "{error:?}");
    }
  }
}
