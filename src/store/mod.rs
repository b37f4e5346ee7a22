//! # Component Store
//!
//! Storage for saved template components, one row per component:
//!
//! | Column | Type |
//! |--------|------|
//! | `id` | integer, assigned on insert, increasing |
//! | `templateId`, `componentId`, `name` | text |
//! | eight corner coordinates | f64 |
//! | `dataJson` | text, nullable |
//!
//! Rows of one template share a `templateId` string; nothing else links them.
//!
//! Two backends are provided: [`MemoryStore`] and [`JsonFileStore`].

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::template::Corners;

/// How many rows a listing returns.
pub const LIST_LIMIT: usize = 100;

/// Datastore errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The datastore cannot be reached or written.
    #[error("Datastore unavailable: {0}")]
    Unavailable(String),

    /// The datastore holds data it cannot read back.
    #[error("Datastore corrupt: {0}")]
    Corrupt(String),
}

/// A component row about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComponent {
    pub template_id: String,
    pub component_id: String,
    pub name: String,
    pub corners: Corners,
    pub data_json: Option<String>,
}

/// A stored component row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredComponent {
    pub id: i64,
    pub template_id: String,
    pub component_id: String,
    pub name: String,
    #[serde(flatten)]
    pub corners: Corners,
    pub data_json: Option<String>,
}

impl StoredComponent {
    fn from_new(id: i64, row: NewComponent) -> Self {
        Self {
            id,
            template_id: row.template_id,
            component_id: row.component_id,
            name: row.name,
            corners: row.corners,
            data_json: row.data_json,
        }
    }
}

/// Backend for saved components.
#[async_trait]
pub trait ComponentStore: Send + Sync {
    /// Insert all rows or none. Returns the number inserted.
    async fn insert_all(&self, rows: Vec<NewComponent>) -> Result<usize, StoreError>;

    /// Up to `limit` most recently inserted rows, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<StoredComponent>, StoreError>;
}

/// Newest-first slice of `rows` (which are in insertion order).
fn newest_first(rows: &[StoredComponent], limit: usize) -> Vec<StoredComponent> {
    rows.iter().rev().take(limit).cloned().collect()
}
