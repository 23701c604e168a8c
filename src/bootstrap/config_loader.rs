//! Configuration retrieval.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{BarConfig, ConfigStore};
use crate::error::{Error, Result};

/// Fetches the configuration record once per activation.
pub struct ConfigLoader {
    store: Arc<dyn ConfigStore>,
}

impl ConfigLoader {
    /// Creates a loader reading from `store`.
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Retrieves the record. No retry, no fallback.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigRetrieval`] whatever the store's failure was.
    pub async fn load(&self) -> Result<BarConfig> {
        let config = self.store.get().await.map_err(|e| {
            warn!(error = %e, "Configuration retrieval failed");
            match e {
                Error::ConfigRetrieval { .. } => e,
                other => Error::config_retrieval(other.to_string()),
            }
        })?;

        debug!(
            has_seed = config.background_seed.is_some(),
            dapps = config.dapps.as_deref().unwrap_or_default(),
            "Configuration loaded"
        );

        Ok(config)
    }
}
