//! The remote document collection bookings are persisted in.
//!
//! Stores deal in raw JSON documents keyed by opaque, store-assigned ids;
//! translating them to and from [`Booking`](crate::models::Booking) is the
//! repository's job.

pub mod firestore;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::errors::AppError;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: serde_json::Value,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in the collection.
    async fn list_all(&self) -> Result<Vec<Document>, AppError>;

    /// Writes a new document and returns the id the store allocated for it.
    async fn add(&self, data: serde_json::Value) -> Result<String, AppError>;

    /// Replaces the whole document at `id`. Fails with `NotFound` if it is gone.
    async fn set(&self, id: &str, data: serde_json::Value) -> Result<(), AppError>;

    /// Fails with `NotFound` if there is no document at `id`.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}
