//! Handler for `/index` — the bulk dump consumed by the search indexer.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use folio_core::{
  page::IndexEntry,
  store::{BlobStore, MetadataStore},
};
use folio_engine::Engine;
use serde::Deserialize;

use crate::{DEFAULT_INDEX_COUNT, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct DumpParams {
  pub offset: Option<usize>,
  pub count:  Option<usize>,
}

/// `GET /index[?offset=&count=]` — full tip content per live page.
pub async fn dump<M, B>(
  State(engine): State<Arc<Engine<M, B>>>,
  Query(params): Query<DumpParams>,
) -> Result<Json<Vec<IndexEntry>>, ApiError>
where
  M: MetadataStore + 'static,
  B: BlobStore + Clone + 'static,
{
  let entries = engine
    .index_dump(
      params.offset.unwrap_or(0),
      params.count.unwrap_or(DEFAULT_INDEX_COUNT),
    )
    .await?;
  Ok(Json(entries))
}
