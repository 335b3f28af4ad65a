//! Handlers for revision endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/pages/:id/revisions` | History, oldest first; `?offset=&count=` |
//! | `POST` | `/pages/:id/revisions` | Body: `{"author":..,"content":..}` |
//! | `GET`  | `/revisions/:id` | Reconstructed content; `:id` is a UUID |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use folio_core::{
  revision::{Revision, RevisionView},
  store::{BlobStore, MetadataStore},
};
use folio_engine::Engine;
use serde::Deserialize;

use crate::{DEFAULT_LIST_COUNT, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub offset: Option<usize>,
  pub count:  Option<usize>,
}

/// `GET /pages/:id/revisions[?offset=&count=]`
pub async fn list<M, B>(
  State(engine): State<Arc<Engine<M, B>>>,
  Path(id): Path<String>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Revision>>, ApiError>
where
  M: MetadataStore + 'static,
  B: BlobStore + Clone + 'static,
{
  let revisions = engine
    .list_revisions(
      &id,
      params.offset.unwrap_or(0),
      params.count.unwrap_or(DEFAULT_LIST_COUNT),
    )
    .await?;
  Ok(Json(revisions))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub author:  String,
  pub content: String,
}

/// `POST /pages/:id/revisions` — append the full new content as one revision.
pub async fn create<M, B>(
  State(engine): State<Arc<Engine<M, B>>>,
  Path(id): Path<String>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  M: MetadataStore + 'static,
  B: BlobStore + Clone + 'static,
{
  if body.author.trim().is_empty() {
    return Err(ApiError::BadRequest("author must not be empty".to_owned()));
  }

  let revision = engine.post_revision(&id, &body.author, &body.content).await?;
  Ok((StatusCode::CREATED, Json(revision)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /revisions/:id`
pub async fn get_one<M, B>(
  State(engine): State<Arc<Engine<M, B>>>,
  Path(id): Path<String>,
) -> Result<Json<RevisionView>, ApiError>
where
  M: MetadataStore + 'static,
  B: BlobStore + Clone + 'static,
{
  Ok(Json(engine.get_revision(&id).await?))
}
