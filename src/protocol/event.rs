//! Visibility events and the message relayed to the parent frame.
//!
//! The loaded bar fires [`VISIBILITY_EVENT`](super::VISIBILITY_EVENT) on the
//! document body whenever it opens or closes. The relay forwards each one
//! to the embedding frame as a [`SignerBarMessage`].

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::EV_SIGNER_BAR;

// ============================================================================
// VisibilityEvent
// ============================================================================

/// A bar visibility change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityEvent {
    /// Whether the bar is now open.
    pub opened: bool,
}

impl VisibilityEvent {
    /// Creates a visibility event.
    #[inline]
    #[must_use]
    pub const fn new(opened: bool) -> Self {
        Self { opened }
    }

    /// Reads the event from a DOM `CustomEvent.detail` payload.
    ///
    /// A missing or non-boolean `opened` reads as `false`.
    #[must_use]
    pub fn from_detail(detail: &Value) -> Self {
        Self {
            opened: detail
                .get("opened")
                .and_then(Value::as_bool)
                .unwrap_or_default(),
        }
    }
}

// ============================================================================
// SignerBarMessage
// ============================================================================

/// Message posted to the parent frame.
///
/// # Format
///
/// ```json
/// { "type": "PARITY_SIGNER_BAR", "opened": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerBarMessage {
    /// Type tag, always [`EV_SIGNER_BAR`].
    #[serde(rename = "type")]
    pub message_type: String,

    /// Whether the bar is now open.
    pub opened: bool,
}

impl From<VisibilityEvent> for SignerBarMessage {
    fn from(event: VisibilityEvent) -> Self {
        Self {
            message_type: EV_SIGNER_BAR.to_string(),
            opened: event.opened,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
