//! Parent frame messaging.
//!
//! The bar page is embedded in an `iframe`. Messages to the embedding frame
//! go through an explicit [`ParentFrame`] capability, and the receiving
//! origin is an explicit [`TargetOrigin`]. The default is
//! [`TargetOrigin::Any`]: any embedder may read visibility changes.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use url::Url;

use crate::error::Result;
use crate::protocol::SignerBarMessage;

// ============================================================================
// ParentFrame
// ============================================================================

/// Outbound message channel to the embedding frame.
pub trait ParentFrame: Send + Sync {
    /// Posts `message` to the parent, restricted to `target_origin`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Page`](crate::Error::Page) if there is no parent.
    fn post_message(&self, message: &SignerBarMessage, target_origin: &TargetOrigin) -> Result<()>;
}

// ============================================================================
// TargetOrigin
// ============================================================================

/// Which parent origin may receive relayed messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TargetOrigin {
    /// Any origin (`"*"`).
    #[default]
    Any,

    /// Only the origin of this URL.
    Exact(Url),
}

impl TargetOrigin {
    /// Parses `"*"` or a URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`](crate::Error::Url) for anything else that is
    /// not a valid URL.
    pub fn parse(origin: &str) -> Result<Self> {
        if origin == "*" {
            return Ok(Self::Any);
        }
        Ok(Self::Exact(Url::parse(origin)?))
    }

    /// Returns `true` for [`TargetOrigin::Any`].
    #[inline]
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl fmt::Display for TargetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Exact(url) => f.write_str(&url.origin().ascii_serialization()),
        }
    }
}
