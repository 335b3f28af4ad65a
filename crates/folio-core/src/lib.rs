//! Core types, the error taxonomy, and the store traits for the Folio wiki
//! content service.
//!
//! Nothing in here knows about HTTP, SQLite, or the filesystem; the engine
//! and the storage backends both depend on this crate and meet only at the
//! [`store`] traits.

// Store impls provide the `impl Future` trait methods as plain `async fn`s.
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod page;
pub mod revision;
pub mod store;

pub use error::{Error, Result};
