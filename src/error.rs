//! Error types for the Signer Bar bootstrap.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use signer_bar::{Activation, Bootstrap, Result};
//!
//! async fn example(bootstrap: Bootstrap) -> Result<()> {
//!     if let Activation::Active(bar) = bootstrap.run().await? {
//!         println!("state: {:?}", bar.state());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::ConfigRetrieval`], [`Error::Integration`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionClosed`], [`Error::PortDisconnected`] |
//! | Protocol | [`Error::Protocol`], [`Error::Rpc`] |
//! | Timing | [`Error::ResponseTimeout`], [`Error::RequestTimeout`] |
//! | Page | [`Error::ResourceLoad`], [`Error::Api`], [`Error::Page`] |
//! | External | [`Error::Json`], [`Error::Url`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;
use std::time::Duration;

use thiserror::Error;

use crate::identifiers::{PortName, RequestId};

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Bootstrap configuration error.
    ///
    /// Returned when the bootstrap is missing a collaborator or has
    /// invalid options.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// The configuration store failed to produce a record.
    #[error("Configuration retrieval failed: {message}")]
    ConfigRetrieval {
        /// Description of the retrieval failure.
        message: String,
    },

    /// The integration capability check failed.
    ///
    /// The gate treats this as "not enabled"; it never escapes `run`.
    #[error("Integration check failed: {message}")]
    Integration {
        /// Description of the failure.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// Opening a port to the background process failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// The secure transport connection closed.
    #[error("Connection closed")]
    ConnectionClosed,

    /// The remote end of a port went away before answering.
    #[error("Port {port} disconnected")]
    PortDisconnected {
        /// Name of the port.
        port: PortName,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Unexpected or malformed message.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// The node answered a transport request with an error.
    #[error("RPC error: {message}")]
    Rpc {
        /// Error message returned by the node.
        message: String,
    },

    // ========================================================================
    // Timing Errors
    // ========================================================================
    /// No code response arrived on a port in time.
    #[error("No response on port {port} after {timeout_ms}ms")]
    ResponseTimeout {
        /// Name of the port.
        port: PortName,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Secure transport request timeout.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Page Errors
    // ========================================================================
    /// An injected script or stylesheet failed to load.
    #[error("Resource {locator} failed to load: {message}")]
    ResourceLoad {
        /// Locator of the resource.
        locator: String,
        /// Description of the failure.
        message: String,
    },

    /// The loaded API object rejected configuration.
    #[error("API configuration failed: {message}")]
    Api {
        /// Description of the failure.
        message: String,
    },

    /// A page manipulation failed.
    #[error("Page error: {message}")]
    Page {
        /// Description of the failure.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a configuration retrieval error.
    #[inline]
    pub fn config_retrieval(message: impl Into<String>) -> Self {
        Self::ConfigRetrieval {
            message: message.into(),
        }
    }

    /// Creates an integration check error.
    #[inline]
    pub fn integration(message: impl Into<String>) -> Self {
        Self::Integration {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a port disconnected error.
    #[inline]
    pub fn port_disconnected(port: PortName) -> Self {
        Self::PortDisconnected { port }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an RPC error.
    #[inline]
    pub fn rpc(message: impl Into<String>) -> Self {
        Self::Rpc {
            message: message.into(),
        }
    }

    /// Creates a response timeout error.
    #[inline]
    pub fn response_timeout(port: PortName, timeout: Duration) -> Self {
        Self::ResponseTimeout {
            port,
            timeout_ms: saturating_millis(timeout),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout: Duration) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms: saturating_millis(timeout),
        }
    }

    /// Creates a resource load error.
    #[inline]
    pub fn resource_load(locator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ResourceLoad {
            locator: locator.into(),
            message: message.into(),
        }
    }

    /// Creates an API configuration error.
    #[inline]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Creates a page error.
    #[inline]
    pub fn page(message: impl Into<String>) -> Self {
        Self::Page {
            message: message.into(),
        }
    }
}

/// Milliseconds in `duration`, capped at `u64::MAX`.
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ResponseTimeout { .. } | Self::RequestTimeout { .. }
        )
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::ConnectionClosed | Self::PortDisconnected { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
