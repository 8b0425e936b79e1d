//! Flashcards Storage Layer
//!
//! Synchronous local key-value storage for client state.
//! Every write overwrites the previous value for its key; there are no
//! retries and no value versioning.

mod database;
mod error;
mod memory;
mod migrations;
mod store;

pub use database::Database;
pub use error::StorageError;
pub use memory::MemoryStore;
pub use store::KeyValueStore;

pub type Result<T> = std::result::Result<T, StorageError>;
