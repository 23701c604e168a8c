//! Signer Bar - bootstrap protocol for the embedded signing overlay.
//!
//! The bar runs inside an isolated extension page embedded in a dapp. Before
//! it can show anything it has to find out whether it should activate, fetch
//! its configuration from the privileged background process, and pull its UI
//! code from the locally running node.
//!
//! # Architecture
//!
//! - **Bar page**: this crate, driving the activation through the [`Page`]
//!   and [`ParentFrame`] capabilities
//! - **Background**: answers on named ports (the code port and the secure
//!   transport port), reached through a [`PortConnector`]
//!
//! Key design principles:
//!
//! - Nothing runs unless the [`IntegrationGate`] opens
//! - The code port carries exactly one request and one response, then closes
//! - Handles are passed explicitly through [`BarContext`]; there are no globals
//! - Visibility changes are relayed to the parent for the page's lifetime
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use signer_bar::{
//!     Activation, BarConfig, Bootstrap, Result, StaticConfigStore, StaticIntegration, listener,
//! };
//! # use signer_bar::{Page, ParentFrame};
//!
//! # async fn example(page: Arc<dyn Page>, parent: Arc<dyn ParentFrame>) -> Result<()> {
//! let (connector, _background) = listener();
//!
//! let bootstrap = Bootstrap::builder()
//!     .integration(Arc::new(StaticIntegration::new(true)))
//!     .config_store(Arc::new(StaticConfigStore::new(
//!         BarConfig::new().with_dapps("127.0.0.1:8545"),
//!     )))
//!     .connector(Arc::new(connector))
//!     .page(page)
//!     .parent(parent)
//!     .build()?;
//!
//! if let Activation::Active(bar) = bootstrap.run().await? {
//!     println!("bar state: {:?}", bar.state());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bootstrap`] | Activation protocol: gate, loaders, configurer, relay |
//! | [`config`] | Configuration record and stores |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`page`] | Page-side capabilities and the degraded notice |
//! | [`protocol`] | Wire messages and constants |
//! | [`transport`] | Ports and the secure transport |

// ============================================================================
// Modules
// ============================================================================

/// Activation protocol.
///
/// Use [`Bootstrap::builder()`] to assemble one.
pub mod bootstrap;

/// Configuration record, dapps endpoint parsing and stores.
pub mod config;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Page-side capabilities.
///
/// The host implements [`Page`], [`ParentFrame`] and [`SecureApi`].
pub mod page;

/// Wire messages exchanged with the background and the parent frame.
pub mod protocol;

/// Named ports and the secure transport.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Bootstrap types
pub use bootstrap::{
    Activation, ActiveBar, ApiConfigurer, BarState, Bootstrap, BootstrapBuilder,
    BootstrapOptions, CHROME_EXTENSION_SCHEME, ConfigLoader, ConfigureStrategy, GateDecision,
    IntegrationCheck, IntegrationGate, LoadOutcome, PortScriptLoader, RelayHandle,
    ResizeEventRelay, StaticIntegration,
};

// Configuration types
pub use config::{BarConfig, ConfigStore, DappsEndpoint, FileConfigStore, StaticConfigStore};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{PortName, RequestId};

// Page types
pub use page::{
    ApiConfiguration, BarContext, DegradedNotice, Page, ParentFrame, ScriptLoad, SecureApi,
    TargetOrigin,
};

// Protocol types
pub use protocol::{CodeOutcome, CodeRequest, CodeResponse, SignerBarMessage, VisibilityEvent};

// Transport types
pub use transport::{
    LocalConnector, Port, PortConnector, PortListener, RemotePort, SecureTransport, duplex,
    listener,
};
