//! Persistence bridge between local storage and the application core

use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use flashcards_storage::{Database, KeyValueStore};

use crate::config::{Config, MalformedDocumentPolicy};
use crate::error::BridgeError;
use crate::program::{CoreHandle, Program};
use crate::sink::{DiagnosticSink, TracingSink};
use crate::state::BridgeState;
use crate::Result;

/// Shuttles the flashcard collection between storage and the core.
///
/// The collection is read once in [`Bridge::start`] and written once per
/// export the core emits afterwards.
pub struct Bridge {
    config: Config,
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn DiagnosticSink>,
    state: Arc<RwLock<BridgeState>>,
}

impl Bridge {
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            config,
            store,
            sink: Arc::new(TracingSink),
            state: Arc::new(RwLock::new(BridgeState::Uninitialized)),
        }
    }

    /// Open the durable store at `config.database_path`.
    pub fn open(config: Config) -> Result<Self> {
        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::new(config, Arc::new(db)))
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> BridgeState {
        *self.state.read()
    }

    /// Read and decode the stored collection.
    ///
    /// A missing entry yields `[]`. A stored value that is not JSON is
    /// handled according to `config.on_malformed`.
    pub fn load_flags(&self) -> Result<Value> {
        let key = &self.config.storage_key;

        let Some(json) = self.store.read(key)? else {
            tracing::debug!(key = %key, "No stored collection, starting empty");
            return Ok(Value::Array(Vec::new()));
        };

        match decode_document(&json) {
            Ok(flags) => Ok(flags),
            Err(source) => match self.config.on_malformed {
                MalformedDocumentPolicy::Fail => Err(BridgeError::MalformedStoredDocument {
                    key: key.clone(),
                    source,
                }),
                MalformedDocumentPolicy::ResetToEmpty => {
                    tracing::warn!(
                        key = %key,
                        error = %source,
                        "Stored collection is not valid JSON, starting empty"
                    );
                    Ok(Value::Array(Vec::new()))
                }
            },
        }
    }

    /// Boot the core with the stored collection and subscribe to its ports.
    ///
    /// Only one caller across all clones gets past the state check. On error
    /// the core is not constructed and the bridge returns to `Uninitialized`.
    pub fn start<P: Program>(&self, program: &P) -> Result<P::Handle> {
        {
            let mut state = self.state.write();
            if !state.can_transition_to(BridgeState::Starting) {
                return Err(BridgeError::AlreadyRunning);
            }
            *state = BridgeState::Starting;
        }

        match self.boot(program) {
            Ok(handle) => {
                *self.state.write() = BridgeState::Running;

                tracing::info!(
                    mount_target = %self.config.mount_target.id(),
                    key = %self.config.storage_key,
                    "Bridge running"
                );

                Ok(handle)
            }
            Err(e) => {
                *self.state.write() = BridgeState::Uninitialized;
                Err(e)
            }
        }
    }

    fn boot<P: Program>(&self, program: &P) -> Result<P::Handle> {
        let flags = self.load_flags()?;
        let handle = program.init(&self.config.mount_target, flags);

        let ports = handle.ports();

        let bridge = self.clone();
        ports.debug.subscribe(move |text: &String| bridge.relay_debug(text));

        let bridge = self.clone();
        ports
            .export_flashcards_json
            .subscribe(move |json: &Value| {
                if let Err(e) = bridge.export_flashcards(json) {
                    tracing::error!(
                        key = %bridge.config.storage_key,
                        "Failed to persist exported flashcards: {}",
                        e
                    );
                }
            });

        Ok(handle)
    }

    /// Forward core debug text to the diagnostic sink.
    pub fn relay_debug(&self, text: &str) {
        self.sink.debug(text);
    }

    /// Persist an exported collection, replacing the stored one.
    pub fn export_flashcards(&self, json: &Value) -> Result<()> {
        let serialized = serde_json::to_string(json)?;

        tracing::info!(
            key = %self.config.storage_key,
            bytes = serialized.len(),
            "exporting"
        );

        self.store.write(&self.config.storage_key, &serialized)?;
        Ok(())
    }
}

/// Parse a stored document with no nesting limit, so anything
/// `serde_json::to_string` produced can be read back.
fn decode_document(json: &str) -> serde_json::Result<Value> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

impl Clone for Bridge {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            store: Arc::clone(&self.store),
            sink: Arc::clone(&self.sink),
            state: Arc::clone(&self.state),
        }
    }
}
