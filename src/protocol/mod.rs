//! Wire message types.
//!
//! This module defines every message the bar exchanges with the background
//! process and with its parent frame.
//!
//! # Protocol Overview
//!
//! | Message | Channel | Direction | Purpose |
//! |---------|---------|-----------|---------|
//! | `CodeRequest` | `barScripts` port | Bar → Background | Ask for UI code |
//! | `CodeResponse` | `barScripts` port | Background → Bar | Script/style locators or version mismatch |
//! | `Request` | `secureApi` port | Bar → Background | Node RPC call |
//! | `Response` | `secureApi` port | Background → Bar | Node RPC result |
//! | `SignerBarMessage` | parent frame | Bar → Parent | Visibility change |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `code` | Code request/response exchange |
//! | `event` | Visibility events and the relayed parent message |
//! | `request` | Secure transport request/response |

// ============================================================================
// Submodules
// ============================================================================

/// Code request/response exchange.
pub mod code;

/// Visibility event types.
pub mod event;

/// Secure transport request and response types.
pub mod request;

// ============================================================================
// Constants
// ============================================================================

/// Type tag of the code request.
pub const EV_BAR_CODE: &str = "PARITY_BAR_CODE";

/// Type tag of the message relayed to the parent frame.
pub const EV_SIGNER_BAR: &str = "PARITY_SIGNER_BAR";

/// DOM event fired on the document body when the bar opens or closes.
pub const VISIBILITY_EVENT: &str = "parity.bar.visibility";

/// Background endpoint serving UI code.
pub const CODE_PORT_NAME: &str = "barScripts";

/// Background endpoint carrying secure transport traffic.
pub const TRANSPORT_PORT_NAME: &str = "secureApi";

/// Hash fragment of the signer view in the full UI.
pub const SIGNER_HASH: &str = "/#/signer";

// ============================================================================
// Re-exports
// ============================================================================

pub use code::{CodeOutcome, CodeRequest, CodeResponse};
pub use event::{SignerBarMessage, VisibilityEvent};
pub use request::{Request, Response};
