//! Handlers for `/pages` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/pages` | Previews; `?offset=&count=&category=` |
//! | `POST`   | `/pages` | Body: full [`NewPage`] |
//! | `GET`    | `/pages/:id` | `:id` is a UUID or a slug |
//! | `DELETE` | `/pages/:id` | Soft delete; `?author=` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use folio_core::{
  page::{NewPage, Page, PagePreview, PageView},
  store::{BlobStore, MetadataStore, PageQuery},
};
use folio_engine::Engine;
use serde::Deserialize;

use crate::{DEFAULT_LIST_COUNT, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub offset:   Option<usize>,
  pub count:    Option<usize>,
  pub category: Option<String>,
}

/// `GET /pages[?offset=&count=&category=]`
pub async fn list<M, B>(
  State(engine): State<Arc<Engine<M, B>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PagePreview>>, ApiError>
where
  M: MetadataStore + 'static,
  B: BlobStore + Clone + 'static,
{
  let query = PageQuery {
    offset:   params.offset.unwrap_or(0),
    count:    params.count.unwrap_or(DEFAULT_LIST_COUNT),
    category: params.category,
  };
  Ok(Json(engine.list_pages(&query).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /pages` — body: [`NewPage`]
pub async fn create<M, B>(
  State(engine): State<Arc<Engine<M, B>>>,
  Json(body): Json<NewPage>,
) -> Result<impl IntoResponse, ApiError>
where
  M: MetadataStore + 'static,
  B: BlobStore + Clone + 'static,
{
  if body.slug.trim().is_empty() {
    return Err(ApiError::BadRequest("slug must not be empty".to_owned()));
  }
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".to_owned()));
  }

  let page: Page = engine.create_page(body).await?;
  Ok((StatusCode::CREATED, Json(page)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /pages/:id`
pub async fn get_one<M, B>(
  State(engine): State<Arc<Engine<M, B>>>,
  Path(id): Path<String>,
) -> Result<Json<PageView>, ApiError>
where
  M: MetadataStore + 'static,
  B: BlobStore + Clone + 'static,
{
  Ok(Json(engine.get_page(&id).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  pub author: Option<String>,
}

/// `DELETE /pages/:id[?author=]`
pub async fn delete_one<M, B>(
  State(engine): State<Arc<Engine<M, B>>>,
  Path(id): Path<String>,
  Query(params): Query<DeleteParams>,
) -> Result<impl IntoResponse, ApiError>
where
  M: MetadataStore + 'static,
  B: BlobStore + Clone + 'static,
{
  let author = params.author.as_deref().unwrap_or("anonymous");
  engine.delete_page(&id, author).await?;
  Ok(StatusCode::NO_CONTENT)
}
