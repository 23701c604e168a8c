//! Bar configuration record and the stores that produce it.
//!
//! The privileged background process owns the configuration. The bar only
//! reads it once per activation through a [`ConfigStore`].
//!
//! # Format
//!
//! ```json
//! {
//!   "backgroundSeed": "...",
//!   "DAPPS": "127.0.0.1:8545",
//!   "UI": "127.0.0.1:8180"
//! }
//! ```
//!
//! Only `backgroundSeed` and `DAPPS` carry meaning for the bootstrap; every
//! other field is preserved untouched.

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Separator between the dapps interface and port.
const DAPPS_DELIMITER: char = ':';

// ============================================================================
// BarConfig
// ============================================================================

/// Configuration record served by the background process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarConfig {
    /// Seed handed to the loaded UI unchanged.
    #[serde(
        rename = "backgroundSeed",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub background_seed: Option<Value>,

    /// Combined `interface:port` of the dapps server.
    #[serde(rename = "DAPPS", default, skip_serializing_if = "Option::is_none")]
    pub dapps: Option<String>,

    /// Remaining fields, kept opaque.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BarConfig {
    /// Creates an empty configuration record.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the background seed.
    #[inline]
    #[must_use]
    pub fn with_background_seed(mut self, seed: impl Into<Value>) -> Self {
        self.background_seed = Some(seed.into());
        self
    }

    /// Sets the combined dapps endpoint string.
    #[inline]
    #[must_use]
    pub fn with_dapps(mut self, dapps: impl Into<String>) -> Self {
        self.dapps = Some(dapps.into());
        self
    }

    /// Parses a record from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the value is not an object of the
    /// expected shape.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns the dapps endpoint split into its components.
    #[must_use]
    pub fn dapps_endpoint(&self) -> DappsEndpoint {
        self.dapps
            .as_deref()
            .map(DappsEndpoint::parse)
            .unwrap_or_default()
    }
}

// ============================================================================
// DappsEndpoint
// ============================================================================

/// Interface and port of the dapps server.
///
/// Empty components are normalized to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DappsEndpoint {
    /// Interface (host) component.
    pub interface: Option<String>,
    /// Port component.
    pub port: Option<String>,
}

impl DappsEndpoint {
    /// Splits `interface:port` on `:`.
    ///
    /// The interface is the text before the first delimiter and the port the
    /// text between the first and second. Anything after a second delimiter
    /// is ignored. Without a delimiter the whole string is the interface.
    ///
    /// # Example
    ///
    /// ```
    /// use signer_bar::DappsEndpoint;
    ///
    /// let endpoint = DappsEndpoint::parse("127.0.0.1:8545");
    /// assert_eq!(endpoint.interface.as_deref(), Some("127.0.0.1"));
    /// assert_eq!(endpoint.port.as_deref(), Some("8545"));
    ///
    /// let endpoint = DappsEndpoint::parse("localhost");
    /// assert_eq!(endpoint.interface.as_deref(), Some("localhost"));
    /// assert_eq!(endpoint.port, None);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split(DAPPS_DELIMITER);
        let interface = parts.next().unwrap_or_default();
        let port = parts.next();

        Self {
            interface: non_empty(interface),
            port: port.and_then(non_empty),
        }
    }

    /// Returns `true` if neither component is present.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interface.is_none() && self.port.is_none()
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

// ============================================================================
// ConfigStore
// ============================================================================

/// Source of the bar configuration record.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Retrieves the configuration record.
    async fn get(&self) -> Result<BarConfig>;
}

// ============================================================================
// StaticConfigStore
// ============================================================================

/// Store serving a fixed, in-memory record.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigStore {
    config: BarConfig,
}

impl StaticConfigStore {
    /// Creates a store serving `config`.
    #[inline]
    #[must_use]
    pub fn new(config: BarConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigStore for StaticConfigStore {
    async fn get(&self) -> Result<BarConfig> {
        Ok(self.config.clone())
    }
}

// ============================================================================
// FileConfigStore
// ============================================================================

/// Store reading a JSON record from disk on every `get`.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Creates a store reading from `path`.
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get(&self) -> Result<BarConfig> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::config_retrieval(format!("{}: {e}", self.path.display()))
        })?;

        let config = serde_json::from_str(&text).map_err(|e| {
            Error::config_retrieval(format!("{}: {e}", self.path.display()))
        })?;

        debug!(path = %self.path.display(), "Configuration loaded from file");
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
