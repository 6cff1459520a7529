//! Local record storage.
//!
//! Screens never talk to a storage engine directly. They receive a [`RecordStore`], which
//! serializes the app's documents over any [`KeyValueStore`] backend: SQLite on device,
//! or [`MemoryStore`] in tests.

mod memory;
mod records;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use records::*;
pub use schema::*;
pub use sqlite::SqliteStore;

use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt record under '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value persistence of JSON text documents.
///
/// A missing key is `Ok(None)`, never an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing a key that does not exist succeeds.
    fn remove(&self, key: &str) -> StoreResult<()>;
}
