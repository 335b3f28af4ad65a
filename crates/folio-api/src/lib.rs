//! JSON REST API for Folio.
//!
//! Exposes an axum [`Router`] backed by a [`folio_engine::Engine`] over any
//! [`MetadataStore`] and [`BlobStore`] pair. TLS and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", folio_api::router(engine.clone()))
//! ```

pub mod error;
pub mod index;
pub mod pages;
pub mod revisions;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use folio_core::store::{BlobStore, MetadataStore};
use folio_engine::Engine;
use serde::Deserialize;

pub use error::ApiError;

/// Listing page size when the request does not specify one.
pub const DEFAULT_LIST_COUNT: usize = 30;
/// Index-dump page size when the request does not specify one. Larger than
/// the listing default because the indexer walks every page.
pub const DEFAULT_INDEX_COUNT: usize = 100;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:     String,
  pub port:     u16,
  /// SQLite metadata database file.
  pub db_path:  PathBuf,
  /// Root of the content blob directories.
  pub data_dir: PathBuf,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn router<M, B>(engine: Arc<Engine<M, B>>) -> Router<()>
where
  M: MetadataStore + 'static,
  B: BlobStore + Clone + 'static,
{
  Router::new()
    // Pages
    .route("/pages", get(pages::list::<M, B>).post(pages::create::<M, B>))
    .route(
      "/pages/{id}",
      get(pages::get_one::<M, B>).delete(pages::delete_one::<M, B>),
    )
    // Revisions
    .route(
      "/pages/{id}/revisions",
      get(revisions::list::<M, B>).post(revisions::create::<M, B>),
    )
    .route("/revisions/{id}", get(revisions::get_one::<M, B>))
    // Search indexer dump
    .route("/index", get(index::dump::<M, B>))
    .with_state(engine)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use folio_store_fs::FsBlobStore;
  use folio_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tempfile::TempDir;
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn make_app() -> (Router, TempDir) {
    let meta = SqliteStore::open_in_memory().await.unwrap();
    let dir = TempDir::new().unwrap();
    let blobs = FsBlobStore::new(dir.path());
    (router(Arc::new(Engine::new(meta, blobs))), dir)
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    app.clone().oneshot(req).await.unwrap()
  }

  async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn page_body(slug: &str, content: &str) -> Value {
    json!({
      "slug": slug,
      "name": slug,
      "author": "tester",
      "content": content,
    })
  }

  // ── Pages ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_page_returns_201_with_the_page() {
    let (app, _dir) = make_app().await;

    let resp =
      send(&app, "POST", "/pages", Some(page_body("intro", "Hello"))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let page = body_json(resp).await;
    assert_eq!(page["slug"], "intro");
    assert!(page["last_revision_id"].is_string());
  }

  #[tokio::test]
  async fn create_page_with_empty_slug_returns_400() {
    let (app, _dir) = make_app().await;
    let resp =
      send(&app, "POST", "/pages", Some(page_body("  ", "Hello"))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn get_page_by_slug_or_uuid_returns_content() {
    let (app, _dir) = make_app().await;
    let created = body_json(
      send(&app, "POST", "/pages", Some(page_body("intro", "Hello"))).await,
    )
    .await;

    let by_slug = send(&app, "GET", "/pages/intro", None).await;
    assert_eq!(by_slug.status(), StatusCode::OK);
    let view = body_json(by_slug).await;
    assert_eq!(view["content"], "Hello");
    assert_eq!(view["uuid"], created["uuid"]);

    let uri = format!("/pages/{}", created["uuid"].as_str().unwrap());
    let by_uuid = send(&app, "GET", &uri, None).await;
    assert_eq!(by_uuid.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn get_unknown_page_returns_404() {
    let (app, _dir) = make_app().await;
    let resp = send(&app, "GET", "/pages/missing", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_json(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn list_pages_returns_previews() {
    let (app, _dir) = make_app().await;
    send(&app, "POST", "/pages", Some(page_body("beta", "# B\n\nbody b")))
      .await;
    send(&app, "POST", "/pages", Some(page_body("alpha", "# A\n\nbody a")))
      .await;

    let resp = send(&app, "GET", "/pages", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let previews = body_json(resp).await;
    assert_eq!(previews[0]["slug"], "alpha");
    assert_eq!(previews[1]["slug"], "beta");
    assert_eq!(previews[0]["preview"], "**A** body a");
  }

  // ── Revisions ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn post_revision_updates_the_page() {
    let (app, _dir) = make_app().await;
    send(&app, "POST", "/pages", Some(page_body("intro", "Hello"))).await;

    let resp = send(
      &app,
      "POST",
      "/pages/intro/revisions",
      Some(json!({ "author": "a", "content": "Hello World" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let view =
      body_json(send(&app, "GET", "/pages/intro", None).await).await;
    assert_eq!(view["content"], "Hello World");
  }

  #[tokio::test]
  async fn revision_history_is_listed_and_reconstructable() {
    let (app, _dir) = make_app().await;
    send(&app, "POST", "/pages", Some(page_body("intro", "Hello"))).await;
    send(
      &app,
      "POST",
      "/pages/intro/revisions",
      Some(json!({ "author": "a", "content": "Hello World" })),
    )
    .await;

    let resp = send(&app, "GET", "/pages/intro/revisions", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let revisions = body_json(resp).await;
    assert_eq!(revisions.as_array().unwrap().len(), 2);

    // The first revision still reconstructs to the original content.
    let uri =
      format!("/revisions/{}", revisions[0]["uuid"].as_str().unwrap());
    let first = body_json(send(&app, "GET", &uri, None).await).await;
    assert_eq!(first["content"], "Hello");
  }

  #[tokio::test]
  async fn get_revision_with_malformed_id_returns_400() {
    let (app, _dir) = make_app().await;
    let resp = send(&app, "GET", "/revisions/not-a-uuid", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn get_unknown_revision_returns_404() {
    let (app, _dir) = make_app().await;
    let uri = format!("/revisions/{}", Uuid::new_v4());
    let resp = send(&app, "GET", &uri, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_page_hides_it_but_keeps_history() {
    let (app, _dir) = make_app().await;
    send(&app, "POST", "/pages", Some(page_body("intro", "Hello"))).await;

    let resp =
      send(&app, "DELETE", "/pages/intro?author=admin", None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "GET", "/pages/intro", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // History remains enumerable after the soft delete.
    let resp = send(&app, "GET", "/pages/intro/revisions", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn delete_twice_returns_404() {
    let (app, _dir) = make_app().await;
    send(&app, "POST", "/pages", Some(page_body("intro", "Hello"))).await;
    send(&app, "DELETE", "/pages/intro", None).await;

    let resp = send(&app, "DELETE", "/pages/intro", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Index dump ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn index_dump_carries_full_content() {
    let (app, _dir) = make_app().await;
    send(&app, "POST", "/pages", Some(page_body("intro", "# Title\n\nbody")))
      .await;

    let resp = send(&app, "GET", "/index", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let entries = body_json(resp).await;
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["content"], "# Title\n\nbody");
  }
}
