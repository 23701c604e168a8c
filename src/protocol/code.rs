//! Code request/response exchange on the `barScripts` port.
//!
//! # Format
//!
//! Request:
//! ```json
//! { "type": "PARITY_BAR_CODE" }
//! ```
//!
//! Success:
//! ```json
//! { "success": true, "scripts": "http://127.0.0.1:8180/parity-bar.js", "styles": "..." }
//! ```
//!
//! Version mismatch:
//! ```json
//! { "success": false, "ui": "http://127.0.0.1:8180" }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::EV_BAR_CODE;

// ============================================================================
// CodeRequest
// ============================================================================

/// The single request sent on a code port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRequest {
    /// Type tag, always [`EV_BAR_CODE`].
    #[serde(rename = "type")]
    pub message_type: String,
}

impl Default for CodeRequest {
    fn default() -> Self {
        Self {
            message_type: EV_BAR_CODE.to_string(),
        }
    }
}

impl CodeRequest {
    /// Creates the code request.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// CodeResponse
// ============================================================================

/// Answer to a [`CodeRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeResponse {
    /// Whether the node serves a compatible bar.
    #[serde(default)]
    pub success: bool,

    /// Base URL of the full UI (failure only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<String>,

    /// Script locator (success only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<String>,

    /// Stylesheet locator (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<String>,
}

impl CodeResponse {
    /// Creates a success response carrying a script locator.
    #[inline]
    #[must_use]
    pub fn loaded(scripts: impl Into<String>) -> Self {
        Self {
            success: true,
            scripts: Some(scripts.into()),
            ..Default::default()
        }
    }

    /// Creates a version mismatch response pointing at the full UI.
    #[inline]
    #[must_use]
    pub fn version_mismatch(ui: impl Into<String>) -> Self {
        Self {
            success: false,
            ui: Some(ui.into()),
            ..Default::default()
        }
    }

    /// Adds a stylesheet locator.
    #[inline]
    #[must_use]
    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = Some(styles.into());
        self
    }

    /// Classifies the response.
    ///
    /// An empty `styles` counts as absent. A failure without `ui` yields an
    /// empty base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] for a success response without a script
    /// locator.
    pub fn into_outcome(self) -> Result<CodeOutcome> {
        if !self.success {
            return Ok(CodeOutcome::VersionMismatch {
                ui: self.ui.unwrap_or_default(),
            });
        }

        let scripts = self
            .scripts
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::protocol("code response is missing `scripts`"))?;

        Ok(CodeOutcome::Code {
            scripts,
            styles: self.styles.filter(|s| !s.is_empty()),
        })
    }
}

// ============================================================================
// CodeOutcome
// ============================================================================

/// Classified code response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeOutcome {
    /// Compatible code is available.
    Code {
        /// Script locator.
        scripts: String,
        /// Stylesheet locator.
        styles: Option<String>,
    },

    /// The node is too old to serve the bar.
    VersionMismatch {
        /// Base URL of the full UI.
        ui: String,
    },
}

// ============================================================================
// Tests
// ============================================================================
