//! Bridge error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Storage error: {0}")]
    Storage(#[from] flashcards_storage::StorageError),

    #[error("Stored document under '{key}' is not valid JSON: {source}")]
    MalformedStoredDocument {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bridge has already been started")]
    AlreadyRunning,
}
