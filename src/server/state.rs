//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::store::{ComponentStore, JsonFileStore, MemoryStore};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:3000")
    pub listen_addr: String,
    /// Origin allowed by CORS, or "*" for any
    pub allowed_origin: String,
    /// JSON datastore file; in-memory when unset
    pub store_path: Option<PathBuf>,
}

/// Application state shared across handlers.
pub struct AppState {
    pub store: Arc<dyn ComponentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ComponentStore>) -> Self {
        Self { store }
    }

    /// State with the datastore named by `config`.
    pub fn from_config(config: &ServerConfig) -> Self {
        let store: Arc<dyn ComponentStore> = match &config.store_path {
            Some(path) => Arc::new(JsonFileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        };
        Self::new(store)
    }
}
