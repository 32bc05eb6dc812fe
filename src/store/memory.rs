use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{Document, DocumentStore};
use crate::errors::AppError;

/// An in-process document collection.
///
/// Backs `STORE_BACKEND=memory` and stands in for the remote store in tests:
/// it counts calls per operation and can be switched into an outage where
/// every call fails with `StoreUnavailable`.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<Document>>,
    next_id: AtomicUsize,
    unavailable: AtomicBool,
    list_calls: AtomicUsize,
    add_calls: AtomicUsize,
    set_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document under a caller-chosen id.
    pub fn insert(&self, id: impl Into<String>, data: serde_json::Value) -> Result<(), AppError> {
        self.documents()?.push(Document {
            id: id.into(),
            data,
        });
        Ok(())
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn documents(&self) -> Result<MutexGuard<'_, Vec<Document>>, AppError> {
        self.documents
            .lock()
            .map_err(|_| AppError::StoreUnavailable("memory store lock poisoned".to_string()))
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Document>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.documents()?.clone())
    }

    async fn add(&self, data: serde_json::Value) -> Result<String, AppError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut documents = self.documents()?;
        let id = loop {
            let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let candidate = format!("mem-{n}");
            if !documents.iter().any(|d| d.id == candidate) {
                break candidate;
            }
        };
        documents.push(Document {
            id: id.clone(),
            data,
        });
        Ok(id)
    }

    async fn set(&self, id: &str, data: serde_json::Value) -> Result<(), AppError> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut documents = self.documents()?;
        let doc = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound(format!("document {id}")))?;
        doc.data = data;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut documents = self.documents()?;
        let before = documents.len();
        documents.retain(|d| d.id != id);
        if documents.len() == before {
            return Err(AppError::NotFound(format!("document {id}")));
        }
        Ok(())
    }
}
