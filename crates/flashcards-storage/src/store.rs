//! Key-value store contract

use crate::Result;

/// A synchronous string key-value store.
///
/// `read` of a key that was never written is `Ok(None)`, never an error.
/// `write` replaces any prior value unconditionally.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;
}
