//! Builder pattern for bootstrap configuration.
//!
//! Collects the page-side collaborators and checks that none is missing.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use signer_bar::{Bootstrap, StaticConfigStore, StaticIntegration, BarConfig, listener};
//! # use signer_bar::{Page, ParentFrame};
//!
//! # fn example(page: Arc<dyn Page>, parent: Arc<dyn ParentFrame>) -> signer_bar::Result<()> {
//! let (connector, _background) = listener();
//!
//! let bootstrap = Bootstrap::builder()
//!     .integration(Arc::new(StaticIntegration::new(true)))
//!     .config_store(Arc::new(StaticConfigStore::new(BarConfig::new())))
//!     .connector(Arc::new(connector))
//!     .page(page)
//!     .parent(parent)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::config::ConfigStore;
use crate::error::{Error, Result};
use crate::page::{Page, ParentFrame};
use crate::transport::PortConnector;

use super::core::Bootstrap;
use super::gate::IntegrationCheck;
use super::options::BootstrapOptions;

// ============================================================================
// BootstrapBuilder
// ============================================================================

/// Builder for a [`Bootstrap`].
///
/// Use [`Bootstrap::builder()`] to create one.
#[derive(Default, Clone)]
pub struct BootstrapBuilder {
    integration: Option<Arc<dyn IntegrationCheck>>,
    config_store: Option<Arc<dyn ConfigStore>>,
    connector: Option<Arc<dyn PortConnector>>,
    page: Option<Arc<dyn Page>>,
    parent: Option<Arc<dyn ParentFrame>>,
    options: BootstrapOptions,
}

impl fmt::Debug for BootstrapBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapBuilder")
            .field("integration", &self.integration.is_some())
            .field("config_store", &self.config_store.is_some())
            .field("connector", &self.connector.is_some())
            .field("page", &self.page.is_some())
            .field("parent", &self.parent.is_some())
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// BootstrapBuilder Implementation
// ============================================================================

impl BootstrapBuilder {
    /// Creates an empty builder.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capability check.
    #[inline]
    #[must_use]
    pub fn integration(mut self, check: Arc<dyn IntegrationCheck>) -> Self {
        self.integration = Some(check);
        self
    }

    /// Sets the configuration store.
    #[inline]
    #[must_use]
    pub fn config_store(mut self, store: Arc<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    /// Sets the connector used for the code port and the secure transport.
    #[inline]
    #[must_use]
    pub fn connector(mut self, connector: Arc<dyn PortConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Sets the bar page.
    #[inline]
    #[must_use]
    pub fn page(mut self, page: Arc<dyn Page>) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the embedding parent frame.
    #[inline]
    #[must_use]
    pub fn parent(mut self, parent: Arc<dyn ParentFrame>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Replaces the protocol options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: BootstrapOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the bootstrap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a collaborator is missing or the options
    /// are invalid.
    pub fn build(self) -> Result<Bootstrap> {
        let integration = required(self.integration, "Integration check", "integration")?;
        let config_store = required(self.config_store, "Configuration store", "config_store")?;
        let connector = required(self.connector, "Port connector", "connector")?;
        let page = required(self.page, "Page", "page")?;
        let parent = required(self.parent, "Parent frame", "parent")?;

        self.options.validate()?;

        Ok(Bootstrap::new(
            integration,
            config_store,
            connector,
            page,
            parent,
            self.options,
        ))
    }
}

// ============================================================================
// Validation
// ============================================================================

fn required<T: ?Sized>(value: Option<Arc<T>>, what: &str, setter: &str) -> Result<Arc<T>> {
    value.ok_or_else(|| Error::config(format!("{what} is required. Use .{setter}() to set it.")))
}

// ============================================================================
// Tests
// ============================================================================
