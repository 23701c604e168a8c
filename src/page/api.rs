//! API object exposed by the loaded bar script.

use serde::{Deserialize, Serialize};

use crate::config::DappsEndpoint;
use crate::error::{Error, Result};

// ============================================================================
// ApiConfiguration
// ============================================================================

/// Argument of [`SecureApi::configure`].
///
/// # Format
///
/// ```json
/// { "dappsInterface": "127.0.0.1", "dappsPort": "8545" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfiguration {
    /// Dapps server interface.
    pub dapps_interface: Option<String>,
    /// Dapps server port.
    pub dapps_port: Option<String>,
}

impl From<DappsEndpoint> for ApiConfiguration {
    fn from(endpoint: DappsEndpoint) -> Self {
        Self {
            dapps_interface: endpoint.interface,
            dapps_port: endpoint.port,
        }
    }
}

// ============================================================================
// SecureApi
// ============================================================================

/// The API object a loaded bar hands back.
///
/// Newer bars expose [`configure`](SecureApi::configure); older ones only
/// have the `_dappsInterface` / `_dappsPort` fields.
pub trait SecureApi: Send + Sync {
    /// Returns `true` if [`configure`](SecureApi::configure) is available.
    fn supports_configure(&self) -> bool {
        false
    }

    /// Applies the dapps configuration in one call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the API rejects the configuration or does
    /// not support it.
    fn configure(&self, _configuration: &ApiConfiguration) -> Result<()> {
        Err(Error::api("configure is not supported"))
    }

    /// Assigns `_dappsInterface`.
    fn set_dapps_interface(&self, interface: &str);

    /// Assigns `_dappsPort`.
    fn set_dapps_port(&self, port: &str);
}
