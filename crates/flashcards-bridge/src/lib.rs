//! Flashcards Bridge
//!
//! Loads the persisted flashcard collection at startup, hands it to the
//! application core as init flags, and persists every collection the core
//! exports afterwards. Debug messages from the core are relayed to a
//! diagnostic sink.

mod bridge;
mod config;
mod error;
mod ports;
mod program;
mod sink;
mod state;

#[cfg(test)]
mod test_support;

pub use bridge::Bridge;
pub use config::{Config, MalformedDocumentPolicy, DEFAULT_STORAGE_KEY};
pub use error::BridgeError;
pub use ports::{OutboundMessage, Port, Ports};
pub use program::{CoreHandle, MountTarget, Program};
pub use sink::{DiagnosticSink, TracingSink};
pub use state::BridgeState;

pub use flashcards_storage::{Database, KeyValueStore, MemoryStore, StorageError};

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
