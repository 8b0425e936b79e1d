//! Bridge configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::program::MountTarget;

/// Storage key holding the serialized flashcard collection.
pub const DEFAULT_STORAGE_KEY: &str = "flashcards";

/// What to do when the stored document exists but is not valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedDocumentPolicy {
    /// Abort startup with `BridgeError::MalformedStoredDocument`.
    #[default]
    Fail,
    /// Start the core with an empty collection. The stored value is left
    /// untouched until the next export overwrites it.
    ResetToEmpty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the local storage database
    pub database_path: PathBuf,
    /// Key the flashcard collection is stored under
    pub storage_key: String,
    /// Rendering anchor handed to the core
    pub mount_target: MountTarget,
    pub on_malformed: MalformedDocumentPolicy,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("flashcards.db"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            mount_target: MountTarget::default(),
            on_malformed: MalformedDocumentPolicy::default(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Flashcards"))
            .unwrap_or_else(|| PathBuf::from(".flashcards"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
