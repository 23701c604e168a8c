//! Named duplex ports between the bar and the background process.
//!
//! A [`Port`] is the bar's end of a message channel; a [`RemotePort`] is the
//! background's end. Ports carry JSON values in both directions.
//!
//! # Connection Flow
//!
//! 1. The background calls [`listener()`] and keeps the [`PortListener`]
//! 2. The bar receives the [`LocalConnector`] as its [`PortConnector`]
//! 3. `connect(name)` creates a duplex pair and hands the remote end to the
//!    listener
//! 4. Either side drops its end to disconnect; the peer observes the close

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::identifiers::PortName;

// ============================================================================
// PortConnector
// ============================================================================

/// Opens named ports to the background process.
pub trait PortConnector: Send + Sync {
    /// Opens a port to the endpoint `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if no background process accepts it.
    fn connect(&self, name: &PortName) -> Result<Port>;
}

// ============================================================================
// Port
// ============================================================================

/// The bar's end of a duplex message channel.
///
/// Dropping or [`disconnect`](Port::disconnect)ing the port closes both
/// directions.
#[derive(Debug)]
pub struct Port {
    name: PortName,
    outbound: mpsc::UnboundedSender<Value>,
    inbound: mpsc::UnboundedReceiver<Value>,
}

impl Port {
    /// Returns the endpoint name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &PortName {
        &self.name
    }

    /// Posts a message to the background.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the message does not serialize
    /// - [`Error::PortDisconnected`] if the background end is gone
    pub fn post<T: Serialize>(&self, message: &T) -> Result<()> {
        let value = serde_json::to_value(message)?;
        self.outbound
            .send(value)
            .map_err(|_| Error::port_disconnected(self.name.clone()))?;

        trace!(port = %self.name, "Message posted");
        Ok(())
    }

    /// Waits for the next message. `None` once the background disconnects.
    pub async fn recv(&mut self) -> Option<Value> {
        self.inbound.recv().await
    }

    /// Waits for the next message and decodes it.
    ///
    /// # Errors
    ///
    /// - [`Error::PortDisconnected`] if the background disconnects first
    /// - [`Error::Json`] if the message has the wrong shape
    pub async fn recv_as<T: DeserializeOwned>(&mut self) -> Result<T> {
        let value = self
            .recv()
            .await
            .ok_or_else(|| Error::port_disconnected(self.name.clone()))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Closes the port.
    pub fn disconnect(self) {
        debug!(port = %self.name, "Port disconnected");
    }
}

// ============================================================================
// RemotePort
// ============================================================================

/// The background's end of a duplex message channel.
#[derive(Debug)]
pub struct RemotePort {
    name: PortName,
    outbound: mpsc::UnboundedSender<Value>,
    inbound: mpsc::UnboundedReceiver<Value>,
}

impl RemotePort {
    /// Returns the endpoint name the bar connected to.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &PortName {
        &self.name
    }

    /// Posts a message to the bar.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the message does not serialize
    /// - [`Error::PortDisconnected`] if the bar end is gone
    pub fn post<T: Serialize>(&self, message: &T) -> Result<()> {
        let value = serde_json::to_value(message)?;
        self.outbound
            .send(value)
            .map_err(|_| Error::port_disconnected(self.name.clone()))
    }

    /// Waits for the next message. `None` once the bar disconnects.
    pub async fn recv(&mut self) -> Option<Value> {
        self.inbound.recv().await
    }

    /// Waits for the next message and decodes it.
    ///
    /// # Errors
    ///
    /// - [`Error::PortDisconnected`] if the bar disconnects first
    /// - [`Error::Json`] if the message has the wrong shape
    pub async fn recv_as<T: DeserializeOwned>(&mut self) -> Result<T> {
        let value = self
            .recv()
            .await
            .ok_or_else(|| Error::port_disconnected(self.name.clone()))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Returns `true` once the bar has disconnected.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }

    /// Resolves when the bar disconnects.
    pub async fn closed(&self) {
        self.outbound.closed().await;
    }
}

// ============================================================================
// Duplex Construction
// ============================================================================

/// Creates a connected `(bar, background)` port pair.
#[must_use]
pub fn duplex(name: PortName) -> (Port, RemotePort) {
    let (to_remote, from_bar) = mpsc::unbounded_channel();
    let (to_bar, from_remote) = mpsc::unbounded_channel();

    let port = Port {
        name: name.clone(),
        outbound: to_remote,
        inbound: from_remote,
    };
    let remote = RemotePort {
        name,
        outbound: to_bar,
        inbound: from_bar,
    };

    (port, remote)
}

// ============================================================================
// LocalConnector / PortListener
// ============================================================================

/// In-process connector handing remote ends to a [`PortListener`].
#[derive(Debug, Clone)]
pub struct LocalConnector {
    accept_tx: mpsc::UnboundedSender<RemotePort>,
}

impl PortConnector for LocalConnector {
    fn connect(&self, name: &PortName) -> Result<Port> {
        let (port, remote) = duplex(name.clone());

        self.accept_tx
            .send(remote)
            .map_err(|_| Error::connection(format!("no background listening for {name}")))?;

        debug!(port = %name, "Port connected");
        Ok(port)
    }
}

/// Background side accepting ports opened through a [`LocalConnector`].
#[derive(Debug)]
pub struct PortListener {
    accept_rx: mpsc::UnboundedReceiver<RemotePort>,
}

impl PortListener {
    /// Waits for the next port. `None` once every connector is dropped.
    pub async fn accept(&mut self) -> Option<RemotePort> {
        self.accept_rx.recv().await
    }
}

/// Creates a connected connector/listener pair.
#[must_use]
pub fn listener() -> (LocalConnector, PortListener) {
    let (accept_tx, accept_rx) = mpsc::unbounded_channel();
    (LocalConnector { accept_tx }, PortListener { accept_rx })
}

// ============================================================================
// Tests
// ============================================================================
