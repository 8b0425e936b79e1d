//! In-process store for tests and ephemeral hosts

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::StorageError;
use crate::store::KeyValueStore;
use crate::Result;

#[derive(Default)]
struct MemoryState {
    items: HashMap<String, String>,
    writes: usize,
    unavailable: Option<String>,
}

/// Non-durable key-value store held in memory.
///
/// Clones share the same contents. The store can be switched into an
/// unavailable mode where every read and write fails, mirroring a host
/// whose storage is disabled or over quota.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `StorageError::Unavailable`.
    pub fn set_unavailable(&self, reason: impl Into<String>) {
        self.state.write().unavailable = Some(reason.into());
    }

    pub fn set_available(&self) {
        self.state.write().unavailable = None;
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.state.read().writes
    }

    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let state = self.state.read();
        if let Some(reason) = &state.unavailable {
            return Err(StorageError::Unavailable(reason.clone()));
        }
        Ok(state.items.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.write();
        if let Some(reason) = &state.unavailable {
            return Err(StorageError::Unavailable(reason.clone()));
        }
        state.items.insert(key.to_string(), value.to_string());
        state.writes += 1;
        Ok(())
    }
}
