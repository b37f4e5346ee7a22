//! In-process component store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ComponentStore, NewComponent, StoreError, StoredComponent, newest_first};

/// Keeps rows in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<StoredComponent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ComponentStore for MemoryStore {
    async fn insert_all(&self, rows: Vec<NewComponent>) -> Result<usize, StoreError> {
        let mut stored = self.rows.write().await;
        let mut next_id = stored.last().map(|r| r.id).unwrap_or(0) + 1;
        let count = rows.len();
        for row in rows {
            stored.push(StoredComponent::from_new(next_id, row));
            next_id += 1;
        }
        Ok(count)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<StoredComponent>, StoreError> {
        let stored = self.rows.read().await;
        Ok(newest_first(&stored, limit))
    }
}
