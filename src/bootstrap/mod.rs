//! Activation protocol.
//!
//! This module wires the bar's startup sequence together.
//!
//! # Components
//!
//! | Component | Role |
//! |-----------|------|
//! | [`IntegrationGate`] | Decides whether the bar activates |
//! | [`ConfigLoader`] | Fetches the configuration record |
//! | [`PortScriptLoader`] | Code request/response over a one-shot port |
//! | [`ApiConfigurer`] | Hands the dapps endpoint to the loaded API |
//! | [`ResizeEventRelay`] | Forwards visibility changes to the parent |
//! | [`Bootstrap`] | Runs all of the above in order |

// ============================================================================
// Submodules
// ============================================================================

/// Builder for [`Bootstrap`].
pub mod builder;

/// Configuration retrieval.
pub mod config_loader;

/// API configuration after load.
pub mod configurer;

/// Activation coordinator.
pub mod core;

/// Activation precondition.
pub mod gate;

/// Protocol options.
pub mod options;

/// Visibility relay.
pub mod relay;

/// Code exchange and injection.
pub mod script_loader;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::BootstrapBuilder;
pub use config_loader::ConfigLoader;
pub use configurer::{ApiConfigurer, ConfigureStrategy};
pub use core::{Activation, ActiveBar, BarState, Bootstrap};
pub use gate::{GateDecision, IntegrationCheck, IntegrationGate, StaticIntegration};
pub use options::{BootstrapOptions, CHROME_EXTENSION_SCHEME};
pub use relay::{RelayHandle, ResizeEventRelay};
pub use script_loader::{LoadOutcome, PortScriptLoader};
