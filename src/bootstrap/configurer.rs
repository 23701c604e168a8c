//! Post-load API configuration.
//!
//! Once the bar script has loaded, its API object learns where the dapps
//! server lives. A `configure` method, when present, owns the whole step.
//! Otherwise only the non-empty components are written; absent ones keep
//! whatever value the API already had.

use tracing::debug;

use crate::config::BarConfig;
use crate::error::Result;
use crate::page::{ApiConfiguration, SecureApi};

// ============================================================================
// ConfigureStrategy
// ============================================================================

/// How the API was configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureStrategy {
    /// `configure` was called once.
    Method,

    /// Fields were assigned directly.
    Fields {
        /// `_dappsInterface` was assigned.
        interface: bool,
        /// `_dappsPort` was assigned.
        port: bool,
    },
}

// ============================================================================
// ApiConfigurer
// ============================================================================

/// Propagates the dapps endpoint into a loaded API object.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiConfigurer;

impl ApiConfigurer {
    /// Configures `api` from `config`.
    ///
    /// # Errors
    ///
    /// Returns whatever `configure` returns. Field assignment cannot fail.
    pub fn apply(config: &BarConfig, api: &dyn SecureApi) -> Result<ConfigureStrategy> {
        let endpoint = config.dapps_endpoint();

        if api.supports_configure() {
            api.configure(&ApiConfiguration::from(endpoint))?;
            debug!("API configured through configure()");
            return Ok(ConfigureStrategy::Method);
        }

        if let Some(interface) = &endpoint.interface {
            api.set_dapps_interface(interface);
        }

        if let Some(port) = &endpoint.port {
            api.set_dapps_port(port);
        }

        debug!(
            interface = endpoint.interface.is_some(),
            port = endpoint.port.is_some(),
            "API configured through fields"
        );

        Ok(ConfigureStrategy::Fields {
            interface: endpoint.interface.is_some(),
            port: endpoint.port.is_some(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
