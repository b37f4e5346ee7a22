//! Local template cache.
//!
//! A directory-backed key-value store with one slot, holding the payload being
//! edited. It is rewritten after every completed edit and read back at
//! startup. A missing or unreadable slot means "start empty".

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::schema::TemplatePayload;
use crate::error::LabelError;

/// Slot name of the current template.
pub const SLOT: &str = "template_payload_v1";

#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", SLOT))
    }

    /// Cached payload, if present and well-formed.
    pub fn load(&self) -> Option<TemplatePayload> {
        let path = self.slot_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read cached template");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring corrupt cached template");
                None
            }
        }
    }

    /// Replace the cached payload.
    pub fn store(&self, payload: &TemplatePayload) -> Result<(), LabelError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string(payload)?;
        // Replace the slot atomically
        let tmp = self.dir.join(format!("{}.json.tmp", SLOT));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.slot_path())?;
        Ok(())
    }

    /// Empty the slot.
    pub fn clear(&self) -> Result<(), LabelError> {
        match fs::remove_file(self.slot_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
