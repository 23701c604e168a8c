//! Message transport between the bar and the background process.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Bar (page)     │         barScripts           │  Background     │
//! │                 │◄────────────────────────────►│                 │
//! │  Port           │   one request / one answer   │  RemotePort     │
//! │                 │                              │                 │
//! │ SecureTransport │◄────────────────────────────►│  node proxy     │
//! │                 │   secureApi (long-lived)     │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `port` | Named duplex ports and the in-process listener |
//! | `secure` | RPC transport exposed to the loaded bar |

// ============================================================================
// Submodules
// ============================================================================

/// Named duplex ports.
pub mod port;

/// Secure transport for node RPC.
pub mod secure;

// ============================================================================
// Re-exports
// ============================================================================

pub use port::{LocalConnector, Port, PortConnector, PortListener, RemotePort, duplex, listener};
pub use secure::SecureTransport;
