//! Degraded-mode notice.
//!
//! Shown in place of the loading placeholder when the node is too old to
//! serve the bar. It links to the signer view of the full UI instead.

use html_escape::encode_double_quoted_attribute;

use crate::protocol::SIGNER_HASH;

// ============================================================================
// Constants
// ============================================================================

/// Notice text. Contains markup.
const NOTICE_MESSAGE: &str =
    "Your Parity version is older than 1.5. <br />You need to open the UI to sign transactions.";

/// Link target of the notice.
const NOTICE_TARGET: &str = "_blank";

/// Class added to the placeholder.
const PLACEHOLDER_CLASS: &str = "version";

// ============================================================================
// DegradedNotice
// ============================================================================

/// Link to the full UI replacing the loading placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedNotice {
    href: String,
}

impl DegradedNotice {
    /// Creates the notice for the UI served at `ui`.
    ///
    /// `ui` is used verbatim as the link prefix.
    #[must_use]
    pub fn for_ui(ui: &str) -> Self {
        Self::with_hash(ui, SIGNER_HASH)
    }

    /// Creates the notice with a custom hash fragment.
    #[must_use]
    pub fn with_hash(ui: &str, hash: &str) -> Self {
        Self {
            href: format!("{ui}{hash}"),
        }
    }

    /// Returns the link target URL.
    #[inline]
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Returns the link `target` attribute.
    #[inline]
    #[must_use]
    pub fn target(&self) -> &'static str {
        NOTICE_TARGET
    }

    /// Returns the link content (HTML).
    #[inline]
    #[must_use]
    pub fn message_html(&self) -> &'static str {
        NOTICE_MESSAGE
    }

    /// Returns the class the placeholder gains.
    #[inline]
    #[must_use]
    pub fn placeholder_class(&self) -> &'static str {
        PLACEHOLDER_CLASS
    }

    /// Renders the anchor element.
    #[must_use]
    pub fn to_html(&self) -> String {
        format!(
            "<a href=\"{}\" target=\"{}\">{}</a>",
            encode_double_quoted_attribute(&self.href),
            self.target(),
            self.message_html()
        )
    }
}
