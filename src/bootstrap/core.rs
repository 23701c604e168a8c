//! Bar activation coordinator.
//!
//! [`Bootstrap`] runs the whole activation once:
//!
//! 1. Integration gate; a closed gate ends the run without side effects
//! 2. Secure transport created, before any further suspension point
//! 3. Visibility relay installed
//! 4. Configuration retrieved
//! 5. Code exchanged over the code port and injected
//! 6. After the script loads, the API object is configured
//!
//! # Example
//!
//! ```no_run
//! use signer_bar::{Activation, Bootstrap, BarState};
//!
//! # async fn example(bootstrap: Bootstrap) -> signer_bar::Result<()> {
//! match bootstrap.run().await? {
//!     Activation::Inactive(decision) => println!("bar stays hidden: {decision:?}"),
//!     Activation::Active(bar) => {
//!         if let BarState::Degraded(notice) = bar.state() {
//!             println!("open {}", notice.href());
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{BarConfig, ConfigStore};
use crate::error::Result;
use crate::page::{BarContext, DegradedNotice, Page, ParentFrame, SecureApi};
use crate::transport::{PortConnector, SecureTransport};

use super::builder::BootstrapBuilder;
use super::config_loader::ConfigLoader;
use super::configurer::{ApiConfigurer, ConfigureStrategy};
use super::gate::{GateDecision, IntegrationCheck, IntegrationGate};
use super::options::BootstrapOptions;
use super::relay::{RelayHandle, ResizeEventRelay};
use super::script_loader::{LoadOutcome, PortScriptLoader};

// ============================================================================
// Bootstrap
// ============================================================================

/// Signer Bar activation.
pub struct Bootstrap {
    integration: Arc<dyn IntegrationCheck>,
    config_store: Arc<dyn ConfigStore>,
    connector: Arc<dyn PortConnector>,
    page: Arc<dyn Page>,
    parent: Arc<dyn ParentFrame>,
    options: BootstrapOptions,
}

impl fmt::Debug for Bootstrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bootstrap")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Bootstrap {
    /// Creates a builder.
    #[inline]
    #[must_use]
    pub fn builder() -> BootstrapBuilder {
        BootstrapBuilder::new()
    }

    /// Creates a bootstrap from validated parts.
    pub(crate) fn new(
        integration: Arc<dyn IntegrationCheck>,
        config_store: Arc<dyn ConfigStore>,
        connector: Arc<dyn PortConnector>,
        page: Arc<dyn Page>,
        parent: Arc<dyn ParentFrame>,
        options: BootstrapOptions,
    ) -> Self {
        Self {
            integration,
            config_store,
            connector,
            page,
            parent,
            options,
        }
    }

    /// Returns the protocol options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &BootstrapOptions {
        &self.options
    }
}

// ============================================================================
// Bootstrap - Activation
// ============================================================================

impl Bootstrap {
    /// Runs the activation.
    ///
    /// Resolves once the bar is configured or degraded. A script that is
    /// injected but never loads keeps this future pending.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigRetrieval`](crate::Error::ConfigRetrieval) if the
    ///   configuration cannot be read
    /// - Any error of [`PortScriptLoader::load`]
    /// - [`Error::ResourceLoad`](crate::Error::ResourceLoad) if the page
    ///   reports a script load failure
    /// - [`Error::Api`](crate::Error::Api) if the API rejects `configure`
    pub async fn run(&self) -> Result<Activation> {
        let gate = IntegrationGate::new(
            Arc::clone(&self.integration),
            self.options.extension_scheme.as_str(),
        );

        let decision = gate.evaluate(self.page.as_ref()).await;
        if !decision.is_open() {
            return Ok(Activation::Inactive(decision));
        }

        let transport = Arc::new(SecureTransport::new(Arc::clone(&self.connector)));
        debug!(port = %transport.port_name(), "Secure transport installed");

        let relay = ResizeEventRelay::install(
            Arc::clone(&self.page),
            Arc::clone(&self.parent),
            self.options.target_origin.clone(),
        )?;

        let config = ConfigLoader::new(Arc::clone(&self.config_store))
            .load()
            .await?;

        let context = BarContext::new(transport, config.background_seed.clone());

        let loader = PortScriptLoader::new(
            Arc::clone(&self.connector),
            Arc::clone(&self.page),
            self.options.code_port.clone(),
            self.options.response_timeout,
            self.options.signer_hash.as_str(),
        );

        let state = match loader.load(context.clone()).await? {
            LoadOutcome::Degraded(notice) => BarState::Degraded(notice),

            LoadOutcome::Loaded { script, .. } => {
                let locator = script.locator().to_string();
                let api = script.wait().await.inspect_err(|e| {
                    warn!(locator = %locator, error = %e, "Bar script failed to load");
                })?;

                let strategy = ApiConfigurer::apply(&config, api.as_ref())?;
                info!(locator = %locator, ?strategy, "Signer bar ready");

                BarState::Ready { api, strategy }
            }
        };

        Ok(Activation::Active(ActiveBar {
            context,
            config,
            relay,
            state,
        }))
    }
}

// ============================================================================
// Activation
// ============================================================================

/// Result of a completed run.
#[derive(Debug)]
pub enum Activation {
    /// The gate stayed shut; nothing else ran.
    Inactive(GateDecision),

    /// The protocol ran to a terminal state.
    Active(ActiveBar),
}

impl Activation {
    /// Returns the active bar, if any.
    #[inline]
    #[must_use]
    pub fn active(&self) -> Option<&ActiveBar> {
        match self {
            Self::Active(bar) => Some(bar),
            Self::Inactive(_) => None,
        }
    }
}

/// Terminal state of the bar.
pub enum BarState {
    /// Script loaded and API configured.
    Ready {
        /// The loaded API object.
        api: Arc<dyn SecureApi>,
        /// How it was configured.
        strategy: ConfigureStrategy,
    },

    /// Node too old; the notice is shown.
    Degraded(DegradedNotice),
}

impl fmt::Debug for BarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready { strategy, .. } => f
                .debug_struct("Ready")
                .field("strategy", strategy)
                .finish_non_exhaustive(),
            Self::Degraded(notice) => f.debug_tuple("Degraded").field(notice).finish(),
        }
    }
}

/// State kept alive after a successful activation.
#[derive(Debug)]
pub struct ActiveBar {
    context: BarContext,
    config: BarConfig,
    relay: RelayHandle,
    state: BarState,
}

impl ActiveBar {
    /// Returns the context handed to the bar script.
    #[inline]
    #[must_use]
    pub fn context(&self) -> &BarContext {
        &self.context
    }

    /// Returns the configuration captured at activation.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &BarConfig {
        &self.config
    }

    /// Returns the visibility relay.
    #[inline]
    #[must_use]
    pub fn relay(&self) -> &RelayHandle {
        &self.relay
    }

    /// Returns the terminal state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &BarState {
        &self.state
    }

    /// Returns `true` if the bar is degraded to the UI link.
    #[inline]
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self.state, BarState::Degraded(_))
    }

    /// Stops the relay and the secure transport.
    pub fn shutdown(&self) {
        self.relay.stop();
        self.context.transport().shutdown();
        debug!("Signer bar shut down");
    }
}

// ============================================================================
// Tests
// ============================================================================
