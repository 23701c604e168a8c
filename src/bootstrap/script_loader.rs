//! Port-based script loading.
//!
//! Fetches the bar's code over a single-use port and injects it.
//!
//! # Exchange
//!
//! ```text
//! PortOpen ──► RequestSent ──► AwaitingResponse ─┬─► Degraded (notice shown)
//!                                                └─► Loaded   (script/styles injected)
//! ```
//!
//! The port carries exactly one request and one response. It is closed once,
//! after the response has been handled, on whichever path was taken. With a
//! response timeout configured, a silent background closes the port and
//! reports [`Error::ResponseTimeout`] instead of stalling.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::identifiers::PortName;
use crate::page::{BarContext, DegradedNotice, Page, ScriptLoad};
use crate::protocol::{CodeOutcome, CodeRequest, CodeResponse};
use crate::transport::{Port, PortConnector};

// ============================================================================
// LoadOutcome
// ============================================================================

/// Terminal state of one code exchange.
pub enum LoadOutcome {
    /// Script (and stylesheet) injected; the script may still be loading.
    Loaded {
        /// Completion of the injected script.
        script: ScriptLoad,
        /// Injected stylesheet locator.
        stylesheet: Option<String>,
    },

    /// The node is too old; the notice replaced the placeholder.
    Degraded(DegradedNotice),
}

impl fmt::Debug for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { script, stylesheet } => f
                .debug_struct("Loaded")
                .field("script", &script.locator())
                .field("stylesheet", stylesheet)
                .finish(),
            Self::Degraded(notice) => f.debug_tuple("Degraded").field(notice).finish(),
        }
    }
}

// ============================================================================
// PortScriptLoader
// ============================================================================

/// Requests the bar code from the background and injects it.
pub struct PortScriptLoader {
    connector: Arc<dyn PortConnector>,
    page: Arc<dyn Page>,
    port_name: PortName,
    response_timeout: Option<Duration>,
    signer_hash: String,
}

impl PortScriptLoader {
    /// Creates a loader.
    #[must_use]
    pub fn new(
        connector: Arc<dyn PortConnector>,
        page: Arc<dyn Page>,
        port_name: PortName,
        response_timeout: Option<Duration>,
        signer_hash: impl Into<String>,
    ) -> Self {
        Self {
            connector,
            page,
            port_name,
            response_timeout,
            signer_hash: signer_hash.into(),
        }
    }

    /// Runs one request/response exchange.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if the port cannot be opened
    /// - [`Error::PortDisconnected`] if the background closes without answering
    /// - [`Error::ResponseTimeout`] if the answer does not arrive in time
    /// - [`Error::Protocol`] / [`Error::Json`] for a malformed answer
    /// - [`Error::Page`] if the page rejects the notice or an injection
    pub async fn load(&self, context: BarContext) -> Result<LoadOutcome> {
        let mut port = self.connector.connect(&self.port_name)?;
        debug!(port = %self.port_name, "Code port open");

        port.post(&CodeRequest::new())?;
        debug!(port = %self.port_name, "Code request sent");

        let outcome = match self.await_response(&mut port).await {
            Ok(response) => self.handle_response(response, context),
            Err(e) => Err(e),
        };

        port.disconnect();
        outcome
    }

    /// Waits for the single response.
    async fn await_response(&self, port: &mut Port) -> Result<CodeResponse> {
        let Some(limit) = self.response_timeout else {
            return port.recv_as().await;
        };

        let name = port.name().clone();
        match timeout(limit, port.recv_as()).await {
            Ok(result) => result,
            Err(_) => Err(Error::response_timeout(name, limit)),
        }
    }

    /// Takes the failure or success path.
    fn handle_response(&self, response: CodeResponse, context: BarContext) -> Result<LoadOutcome> {
        match response.into_outcome()? {
            CodeOutcome::VersionMismatch { ui } => {
                let notice = DegradedNotice::with_hash(&ui, &self.signer_hash);
                self.page.show_degraded_notice(&notice)?;

                info!(href = notice.href(), "Node too old for the bar, showing UI link");
                Ok(LoadOutcome::Degraded(notice))
            }

            CodeOutcome::Code { scripts, styles } => {
                let script = self.page.inject_script(&scripts, context)?;

                if let Some(styles) = &styles {
                    self.page.inject_stylesheet(styles)?;
                }

                info!(
                    scripts = %scripts,
                    styles = styles.as_deref().unwrap_or_default(),
                    "Bar code injected"
                );
                Ok(LoadOutcome::Loaded {
                    script,
                    stylesheet: styles,
                })
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
