//! Secure transport handed to the loaded bar.
//!
//! The transport tunnels node RPC calls through a long-lived `secureApi`
//! port to the background process, which holds the node credentials.
//!
//! # Event Loop
//!
//! The first call opens the port and spawns a tokio task that handles:
//!
//! - Incoming responses from the background
//! - Outgoing requests from the bar
//! - Request/response correlation by UUID

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::{PortName, RequestId};
use crate::protocol::{Request, Response, TRANSPORT_PORT_NAME};

use super::port::{Port, PortConnector};

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for a node request.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum pending requests before rejecting new ones.
const MAX_PENDING_REQUESTS: usize = 100;

// ============================================================================
// Types
// ============================================================================

/// Map of request IDs to response channels.
type CorrelationMap = FxHashMap<RequestId, oneshot::Sender<Result<Response>>>;

/// Internal commands for the event loop.
enum TransportCommand {
    /// Send a request and wait for response.
    Send {
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
    },
    /// Remove a timed-out correlation entry.
    RemoveCorrelation(RequestId),
    /// Close the port.
    Shutdown,
}

/// Handles to a running event loop.
#[derive(Clone)]
struct Link {
    command_tx: mpsc::UnboundedSender<TransportCommand>,
    correlation: Arc<Mutex<CorrelationMap>>,
}

// ============================================================================
// SecureTransport
// ============================================================================

/// Transport the loaded bar uses to reach the node.
///
/// Construction is synchronous and cannot fail; the port opens on first use.
/// Share it as `Arc<SecureTransport>`.
pub struct SecureTransport {
    connector: Arc<dyn PortConnector>,
    port_name: PortName,
    request_timeout: Duration,
    link: Mutex<Option<Link>>,
}

impl fmt::Debug for SecureTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureTransport")
            .field("port_name", &self.port_name)
            .field("request_timeout", &self.request_timeout)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl SecureTransport {
    /// Creates a transport that connects through `connector`.
    #[must_use]
    pub fn new(connector: Arc<dyn PortConnector>) -> Self {
        Self {
            connector,
            port_name: PortName::from(TRANSPORT_PORT_NAME),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            link: Mutex::new(None),
        }
    }

    /// Sets the per-request timeout.
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Returns the port name used for node traffic.
    #[inline]
    #[must_use]
    pub fn port_name(&self) -> &PortName {
        &self.port_name
    }

    /// Returns `true` while the event loop is running.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.link
            .lock()
            .as_ref()
            .is_some_and(|link| !link.command_tx.is_closed())
    }

    /// Returns the number of pending requests.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.link
            .lock()
            .as_ref()
            .map_or(0, |link| link.correlation.lock().len())
    }

    /// Calls `method` on the node and waits for the result.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if the port cannot be opened
    /// - [`Error::ConnectionClosed`] if the port closes before the answer
    /// - [`Error::RequestTimeout`] if no answer arrives in time
    /// - [`Error::Protocol`] if too many requests are pending
    /// - [`Error::Rpc`] if the node answers with an error
    pub async fn execute(&self, method: &str, params: Value) -> Result<Value> {
        let request = Request::new(method, params);
        let request_id = request.id;
        let link = self.link()?;

        {
            let correlation = link.correlation.lock();
            if correlation.len() >= MAX_PENDING_REQUESTS {
                warn!(
                    pending = correlation.len(),
                    max = MAX_PENDING_REQUESTS,
                    "Too many pending requests"
                );
                return Err(Error::protocol(format!(
                    "Too many pending requests: {}/{}",
                    correlation.len(),
                    MAX_PENDING_REQUESTS
                )));
            }
        }

        let (response_tx, response_rx) = oneshot::channel();

        link.command_tx
            .send(TransportCommand::Send {
                request,
                response_tx,
            })
            .map_err(|_| Error::ConnectionClosed)?;

        let response = match timeout(self.request_timeout, response_rx).await {
            Ok(Ok(result)) => result?,
            Ok(Err(_)) => return Err(Error::ConnectionClosed),
            Err(_) => {
                let _ = link
                    .command_tx
                    .send(TransportCommand::RemoveCorrelation(request_id));

                return Err(Error::request_timeout(request_id, self.request_timeout));
            }
        };

        response.into_result()
    }

    /// Closes the port. The next call reconnects.
    pub fn shutdown(&self) {
        if let Some(link) = self.link.lock().take() {
            let _ = link.command_tx.send(TransportCommand::Shutdown);
        }
    }

    /// Returns the running event loop, starting it if needed.
    fn link(&self) -> Result<Link> {
        let mut guard = self.link.lock();

        if let Some(link) = guard.as_ref()
            && !link.command_tx.is_closed()
        {
            return Ok(link.clone());
        }

        let port = self.connector.connect(&self.port_name)?;
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let correlation = Arc::new(Mutex::new(CorrelationMap::default()));

        tokio::spawn(Self::run_event_loop(
            port,
            command_rx,
            Arc::clone(&correlation),
        ));

        debug!(port = %self.port_name, "Secure transport connected");

        let link = Link {
            command_tx,
            correlation,
        };
        *guard = Some(link.clone());
        Ok(link)
    }

    /// Event loop that handles port I/O.
    async fn run_event_loop(
        mut port: Port,
        mut command_rx: mpsc::UnboundedReceiver<TransportCommand>,
        correlation: Arc<Mutex<CorrelationMap>>,
    ) {
        loop {
            tokio::select! {
                message = port.recv() => {
                    match message {
                        Some(value) => Self::handle_incoming_message(value, &correlation),
                        None => {
                            debug!(port = %port.name(), "Port closed by background");
                            break;
                        }
                    }
                }

                command = command_rx.recv() => {
                    match command {
                        Some(TransportCommand::Send { request, response_tx }) => {
                            Self::handle_send_command(request, response_tx, &port, &correlation);
                        }

                        Some(TransportCommand::RemoveCorrelation(request_id)) => {
                            correlation.lock().remove(&request_id);
                            debug!(%request_id, "Removed timed-out correlation");
                        }

                        Some(TransportCommand::Shutdown) | None => {
                            debug!("Secure transport shutting down");
                            break;
                        }
                    }
                }
            }
        }

        Self::fail_pending_requests(&correlation);
        port.disconnect();
    }

    /// Routes a response to its waiting caller.
    fn handle_incoming_message(value: Value, correlation: &Arc<Mutex<CorrelationMap>>) {
        let response = match serde_json::from_value::<Response>(value) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Failed to parse transport message");
                return;
            }
        };

        let tx = correlation.lock().remove(&response.id);
        match tx {
            Some(tx) => {
                let _ = tx.send(Ok(response));
            }
            None => warn!(id = %response.id, "Response for unknown request"),
        }
    }

    /// Registers and posts a request.
    fn handle_send_command(
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
        port: &Port,
        correlation: &Arc<Mutex<CorrelationMap>>,
    ) {
        let request_id = request.id;

        // Store correlation before sending
        correlation.lock().insert(request_id, response_tx);

        if let Err(e) = port.post(&request)
            && let Some(tx) = correlation.lock().remove(&request_id)
        {
            let _ = tx.send(Err(e));
        }

        trace!(%request_id, method = %request.method, "Request sent");
    }

    /// Fails all pending requests with ConnectionClosed error.
    fn fail_pending_requests(correlation: &Arc<Mutex<CorrelationMap>>) {
        let pending: Vec<_> = correlation.lock().drain().collect();
        let count = pending.len();

        for (_, tx) in pending {
            let _ = tx.send(Err(Error::ConnectionClosed));
        }

        if count > 0 {
            debug!(count, "Failed pending requests on shutdown");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
