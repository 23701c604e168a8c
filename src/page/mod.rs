//! Page-side collaborators of the bootstrap.
//!
//! The bootstrap never touches a DOM directly. It drives the hosting page
//! through these seams:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Page`] | Location, resource injection, placeholder and container |
//! | [`ParentFrame`] | Outbound channel to the embedding frame |
//! | [`SecureApi`] | API object exposed by the loaded bar script |
//! | [`BarContext`] | Handles passed to the loaded bar |
//! | [`DegradedNotice`] | Fallback link shown on version mismatch |

// ============================================================================
// Submodules
// ============================================================================

/// API object exposed by the loaded script.
pub mod api;

/// Handles passed to the loaded bar.
pub mod context;

/// The hosting document.
pub mod document;

/// Parent frame messaging.
pub mod frame;

/// Degraded-mode notice.
pub mod notice;

// ============================================================================
// Re-exports
// ============================================================================

pub use api::{ApiConfiguration, SecureApi};
pub use context::BarContext;
pub use document::{Page, ScriptLoad};
pub use frame::{ParentFrame, TargetOrigin};
pub use notice::DegradedNotice;
