//! Bootstrap options.
//!
//! Provides a type-safe interface for the knobs of the activation protocol.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use signer_bar::BootstrapOptions;
//!
//! let options = BootstrapOptions::new()
//!     .with_extension_scheme("moz-extension")
//!     .with_response_timeout(Duration::from_secs(5));
//!
//! assert!(options.validate().is_ok());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};
use crate::identifiers::PortName;
use crate::page::TargetOrigin;
use crate::protocol::{CODE_PORT_NAME, SIGNER_HASH};

// ============================================================================
// Constants
// ============================================================================

/// Scheme of a Chrome extension page.
pub const CHROME_EXTENSION_SCHEME: &str = "chrome-extension";

/// Default wait for the code response.
const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// BootstrapOptions
// ============================================================================

/// Activation protocol options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// Scheme the page location must have for the bar to activate.
    pub extension_scheme: String,

    /// Background endpoint serving UI code.
    pub code_port: PortName,

    /// How long to wait for the code response. `None` waits forever.
    pub response_timeout: Option<Duration>,

    /// Parent origin allowed to receive visibility messages.
    pub target_origin: TargetOrigin,

    /// Hash fragment appended to the UI URL in the degraded notice.
    pub signer_hash: String,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            extension_scheme: CHROME_EXTENSION_SCHEME.to_string(),
            code_port: PortName::from(CODE_PORT_NAME),
            response_timeout: Some(DEFAULT_RESPONSE_TIMEOUT),
            target_origin: TargetOrigin::Any,
            signer_hash: SIGNER_HASH.to_string(),
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl BootstrapOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected extension scheme (without `:`).
    #[inline]
    #[must_use]
    pub fn with_extension_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.extension_scheme = scheme.into();
        self
    }

    /// Sets the code port name.
    #[inline]
    #[must_use]
    pub fn with_code_port(mut self, name: impl Into<PortName>) -> Self {
        self.code_port = name.into();
        self
    }

    /// Sets the code response timeout.
    #[inline]
    #[must_use]
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = Some(timeout);
        self
    }

    /// Waits for the code response indefinitely.
    #[inline]
    #[must_use]
    pub fn without_response_timeout(mut self) -> Self {
        self.response_timeout = None;
        self
    }

    /// Restricts visibility messages to `origin`.
    #[inline]
    #[must_use]
    pub fn with_target_origin(mut self, origin: TargetOrigin) -> Self {
        self.target_origin = origin;
        self
    }

    /// Sets the notice hash fragment.
    #[inline]
    #[must_use]
    pub fn with_signer_hash(mut self, hash: impl Into<String>) -> Self {
        self.signer_hash = hash.into();
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl BootstrapOptions {
    /// Checks the options for obvious mistakes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty or `:`-terminated scheme, an
    /// empty port name, or a zero timeout.
    pub fn validate(&self) -> Result<()> {
        if self.extension_scheme.is_empty() {
            return Err(Error::config("Extension scheme must not be empty."));
        }

        if self.extension_scheme.contains(':') {
            return Err(Error::config(format!(
                "Extension scheme must not contain ':' (got \"{}\").\n\
                 Example: .with_extension_scheme(\"chrome-extension\")",
                self.extension_scheme
            )));
        }

        if self.code_port.as_str().is_empty() {
            return Err(Error::config("Code port name must not be empty."));
        }

        if self.response_timeout == Some(Duration::ZERO) {
            return Err(Error::config(
                "Response timeout must be positive. Use .without_response_timeout() to wait forever.",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
