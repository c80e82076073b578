//! Record Store: persistence for the five record collections and the settings.
//!
//! Backends store each record as an opaque JSON document under a numeric id;
//! typing, id assignment and ordering live in `repo`, above the trait, so both
//! backends behave identically.

pub mod handlers;
pub mod memory;
pub mod ordering;
pub mod postgres;
pub mod repo;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgRecordStore;
pub use repo::Record;

/// Id of the singleton rows (profile, settings).
pub const SINGLETON_ID: i64 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Profile,
    History,
    Career,
    Qualifications,
    Applications,
    Settings,
}

impl Collection {
    pub fn table(self) -> &'static str {
        match self {
            Collection::Profile => "profile",
            Collection::History => "history_entries",
            Collection::Career => "career_entries",
            Collection::Qualifications => "qualification_entries",
            Collection::Applications => "application_profiles",
            Collection::Settings => "settings",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Produces a new document from its allocated id and the collection's
/// current rows.
pub type BuildFn = Box<dyn FnOnce(i64, &[(i64, Value)]) -> Result<Value, StoreError> + Send>;

/// Raw document storage. Lists are returned in ascending id order.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self, collection: Collection) -> Result<Vec<(i64, Value)>, StoreError>;

    async fn get(&self, collection: Collection, id: i64) -> Result<Option<Value>, StoreError>;

    /// Inserts or overwrites the document stored under `id`.
    async fn put(&self, collection: Collection, id: i64, data: Value) -> Result<(), StoreError>;

    /// Returns whether a document was removed.
    async fn delete(&self, collection: Collection, id: i64) -> Result<bool, StoreError>;

    /// Allocates one past the largest id in use (1 for an empty collection)
    /// and stores the document `build` produces for it. No other write to
    /// the collection can interleave between allocation and insert.
    async fn insert_new(
        &self,
        collection: Collection,
        build: BuildFn,
    ) -> Result<(i64, Value), StoreError>;

    /// Atomically swaps the whole collection for `rows`.
    async fn replace_all(
        &self,
        collection: Collection,
        rows: Vec<(i64, Value)>,
    ) -> Result<(), StoreError>;
}
