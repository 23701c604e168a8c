//! Handles created once per activation and passed to the loaded bar.

use std::sync::Arc;

use serde_json::Value;

use crate::transport::SecureTransport;

/// What the loaded bar receives from the bootstrap.
///
/// Cheap to clone; every clone shares the same transport.
#[derive(Debug, Clone)]
pub struct BarContext {
    transport: Arc<SecureTransport>,
    background_seed: Option<Value>,
}

impl BarContext {
    /// Creates a context from the activation's transport and seed.
    #[inline]
    #[must_use]
    pub fn new(transport: Arc<SecureTransport>, background_seed: Option<Value>) -> Self {
        Self {
            transport,
            background_seed,
        }
    }

    /// Returns the secure transport.
    #[inline]
    #[must_use]
    pub fn transport(&self) -> &Arc<SecureTransport> {
        &self.transport
    }

    /// Returns the background seed from the configuration record.
    #[inline]
    #[must_use]
    pub fn background_seed(&self) -> Option<&Value> {
        self.background_seed.as_ref()
    }
}
