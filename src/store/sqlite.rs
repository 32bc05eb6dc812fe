use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection};

use super::{Document, DocumentStore};
use crate::errors::AppError;

/// Documents kept as JSON text in the local `documents` table.
pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
    collection: String,
}

impl SqliteStore {
    pub fn new(db: Arc<Mutex<Connection>>, collection: impl Into<String>) -> Self {
        Self {
            db,
            collection: collection.into(),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::StoreUnavailable("database lock poisoned".to_string()))
    }
}

fn encode(data: &serde_json::Value) -> Result<String, AppError> {
    serde_json::to_string(data).map_err(|e| AppError::StoreUnavailable(e.to_string()))
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn list_all(&self) -> Result<Vec<Document>, AppError> {
        let db = self.conn()?;
        let mut stmt =
            db.prepare("SELECT id, data FROM documents WHERE collection = ?1 ORDER BY rowid ASC")?;

        let rows = stmt.query_map(params![self.collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut documents = vec![];
        for row in rows {
            let (id, raw) = row?;
            match serde_json::from_str(&raw) {
                Ok(data) => documents.push(Document { id, data }),
                Err(e) => tracing::warn!(id = %id, error = %e, "skipping unreadable document"),
            }
        }
        Ok(documents)
    }

    async fn add(&self, data: serde_json::Value) -> Result<String, AppError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let raw = encode(&data)?;

        let db = self.conn()?;
        db.execute(
            "INSERT INTO documents (collection, id, data) VALUES (?1, ?2, ?3)",
            params![self.collection, id, raw],
        )?;
        Ok(id)
    }

    async fn set(&self, id: &str, data: serde_json::Value) -> Result<(), AppError> {
        let raw = encode(&data)?;

        let db = self.conn()?;
        let count = db.execute(
            "UPDATE documents SET data = ?1, updated_at = datetime('now')
             WHERE collection = ?2 AND id = ?3",
            params![raw, self.collection, id],
        )?;
        if count == 0 {
            return Err(AppError::NotFound(format!("document {id}")));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let db = self.conn()?;
        let count = db.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![self.collection, id],
        )?;
        if count == 0 {
            return Err(AppError::NotFound(format!("document {id}")));
        }
        Ok(())
    }
}
