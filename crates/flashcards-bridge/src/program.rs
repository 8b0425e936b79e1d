//! Application core contract
//!
//! The core is external: the bridge only constructs it with init flags and
//! listens on the ports its handle exposes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ports::Ports;

/// Opaque rendering anchor the core mounts into, identified by element id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MountTarget(String);

impl MountTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl Default for MountTarget {
    fn default() -> Self {
        Self::new("main")
    }
}

/// Something the bridge can boot with a JSON flag value.
pub trait Program {
    type Handle: CoreHandle;

    /// Construct the core. `flags` is always a well-formed JSON value.
    fn init(&self, mount: &MountTarget, flags: Value) -> Self::Handle;
}

/// A running core instance.
pub trait CoreHandle {
    fn ports(&self) -> &Ports;
}
