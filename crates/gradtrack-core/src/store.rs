//! The `ProgramStore` trait.
//!
//! Implemented by storage backends (e.g. `gradtrack-store-sheets`). The API
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::program::{Program, ProgramKey};

/// A listing row: column header → cell value.
///
/// Listing is header-keyed rather than `Program`-shaped because the backing
/// table's columns are its own contract — rows are returned as whatever the
/// sheet currently holds.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Abstraction over an application-tracker storage backend.
///
/// Writes are whole-record: update replaces the full row for a key, there is
/// no partial patch. The backend recomputes `calculated_rank` on every
/// create and update; client-supplied ranks are discarded.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ProgramStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return every stored record, keyed by the current header row.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  /// Append a new record and return it with its computed rank.
  fn create(
    &self,
    program: Program,
  ) -> impl Future<Output = Result<Program, Self::Error>> + Send + '_;

  /// Replace the first record matching `key` with `program` (rank
  /// recomputed). Returns `None` if no record matches.
  fn update(
    &self,
    key: ProgramKey,
    program: Program,
  ) -> impl Future<Output = Result<Option<Program>, Self::Error>> + Send + '_;

  /// Remove the first record matching `key`. Returns `false` if no record
  /// matches.
  fn delete(
    &self,
    key: ProgramKey,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
