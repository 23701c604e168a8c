//! Integration gate.
//!
//! Decides whether the bar activates at all. The gate opens only when the
//! integration is enabled and the page runs under the extension scheme.
//! Every other outcome, including a failing check, is a silent no-op.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::Result;
use crate::page::Page;

// ============================================================================
// IntegrationCheck
// ============================================================================

/// Capability check answering "is the integration enabled".
#[async_trait]
pub trait IntegrationCheck: Send + Sync {
    /// Returns whether the integration is enabled.
    async fn is_enabled(&self) -> Result<bool>;
}

/// Check with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticIntegration {
    enabled: bool,
}

impl StaticIntegration {
    /// Creates a check that always answers `enabled`.
    #[inline]
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl IntegrationCheck for StaticIntegration {
    async fn is_enabled(&self) -> Result<bool> {
        Ok(self.enabled)
    }
}

// ============================================================================
// GateDecision
// ============================================================================

/// Why the gate opened or stayed shut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Integration enabled and scheme matched.
    Open,

    /// The check answered `false`.
    Disabled,

    /// The check failed; treated as disabled.
    CheckFailed,

    /// The page location could not be read.
    LocationUnavailable,

    /// The page is not an extension page.
    WrongScheme {
        /// Scheme of the page location.
        scheme: String,
    },
}

impl GateDecision {
    /// Returns `true` if the protocol should run.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

// ============================================================================
// IntegrationGate
// ============================================================================

/// Evaluates the activation precondition once.
pub struct IntegrationGate {
    check: Arc<dyn IntegrationCheck>,
    expected_scheme: String,
}

impl IntegrationGate {
    /// Creates a gate for pages under `expected_scheme`.
    #[must_use]
    pub fn new(check: Arc<dyn IntegrationCheck>, expected_scheme: impl Into<String>) -> Self {
        Self {
            check,
            expected_scheme: expected_scheme.into(),
        }
    }

    /// Runs the check. The page location is only read if it passes.
    pub async fn evaluate(&self, page: &dyn Page) -> GateDecision {
        match self.check.is_enabled().await {
            Ok(true) => {}
            Ok(false) => {
                debug!("Integration disabled");
                return GateDecision::Disabled;
            }
            Err(e) => {
                warn!(error = %e, "Integration check failed, treating as disabled");
                return GateDecision::CheckFailed;
            }
        }

        let location = match page.location() {
            Ok(location) => location,
            Err(e) => {
                warn!(error = %e, "Page location unavailable");
                return GateDecision::LocationUnavailable;
            }
        };

        if location.scheme() != self.expected_scheme {
            debug!(
                scheme = location.scheme(),
                expected = %self.expected_scheme,
                "Not an extension page"
            );
            return GateDecision::WrongScheme {
                scheme: location.scheme().to_string(),
            };
        }

        debug!("Integration gate open");
        GateDecision::Open
    }
}

// ============================================================================
// Tests
// ============================================================================
