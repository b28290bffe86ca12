//! The `RecordStore` trait.
//!
//! Implemented by storage backends (e.g. `openarc-store-json`). The API crate
//! depends on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::record::{NewRecord, Record};

/// Outcome of [`RecordStore::mint_identifier`] for a record that exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Minted {
  /// The record already carried this identifier; nothing was written.
  Existing(String),
  /// A fresh identifier was generated and persisted.
  Created(String),
}

impl Minted {
  pub fn identifier(&self) -> &str {
    match self {
      Minted::Existing(id) | Minted::Created(id) => id,
    }
  }

  pub fn into_identifier(self) -> String {
    match self {
      Minted::Existing(id) | Minted::Created(id) => id,
    }
  }
}

/// Abstraction over an OpenArc record store backend.
///
/// Records are only ever appended or given a persistent identifier; there is
/// no update or delete path.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All records in creation order.
  fn list_records(
    &self,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get_record(
    &self,
    id: u64,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Append a record built from `input` and return it.
  ///
  /// The id is one past the largest existing id. When
  /// `input.mint_identifier` is set the record is stored with a freshly
  /// generated persistent identifier.
  fn create_record(
    &self,
    input: NewRecord,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  /// Give record `id` a persistent identifier unless it already has one.
  ///
  /// Returns `None` if the record does not exist.
  fn mint_identifier(
    &self,
    id: u64,
  ) -> impl Future<Output = Result<Option<Minted>, Self::Error>> + Send + '_;
}
