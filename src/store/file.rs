//! Component store persisted as a JSON array on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{ComponentStore, NewComponent, StoreError, StoredComponent, newest_first};

/// Rows kept in a single JSON file, rewritten on every insert.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_rows(&self) -> Result<Vec<StoredComponent>, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };
        serde_json::from_slice(&raw)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }

    async fn write_rows(&self, rows: &[StoredComponent]) -> Result<(), StoreError> {
        let unavailable =
            |e: std::io::Error| StoreError::Unavailable(format!("cannot write {}: {}", self.path.display(), e));

        let json = serde_json::to_vec(rows).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(unavailable)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(unavailable)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(unavailable)?;
        Ok(())
    }
}

#[async_trait]
impl ComponentStore for JsonFileStore {
    async fn insert_all(&self, rows: Vec<NewComponent>) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let mut stored = self.read_rows().await?;
        let mut next_id = stored.last().map(|r| r.id).unwrap_or(0) + 1;
        let count = rows.len();
        for row in rows {
            stored.push(StoredComponent::from_new(next_id, row));
            next_id += 1;
        }
        self.write_rows(&stored).await?;
        debug!(path = %self.path.display(), count, total = stored.len(), "stored components");
        Ok(count)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<StoredComponent>, StoreError> {
        let _guard = self.lock.lock().await;
        let stored = self.read_rows().await?;
        Ok(newest_first(&stored, limit))
    }
}
