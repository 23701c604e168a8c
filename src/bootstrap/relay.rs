//! Visibility relay.
//!
//! Forwards every bar visibility change to the parent frame for as long as
//! the page lives, after letting the bar container grow to full height.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::page::{Page, ParentFrame, TargetOrigin};
use crate::protocol::SignerBarMessage;

// ============================================================================
// ResizeEventRelay
// ============================================================================

/// Installs the visibility listener.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeEventRelay;

impl ResizeEventRelay {
    /// Subscribes to visibility events and spawns the forwarding task.
    ///
    /// The task ends when the page stops producing events or the returned
    /// handle is stopped. Dropping the handle leaves it running.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Page`](crate::Error::Page) if the subscription fails.
    pub fn install(
        page: Arc<dyn Page>,
        parent: Arc<dyn ParentFrame>,
        target_origin: TargetOrigin,
    ) -> Result<RelayHandle> {
        let mut events = page.visibility_events()?;

        if target_origin.is_broadcast() {
            debug!("Visibility relay posts to any parent origin");
        }

        let task = tokio::spawn(async move {
            let mut relayed = 0_u64;

            while let Some(event) = events.recv().await {
                if let Err(e) = page.expand_container() {
                    warn!(error = %e, "Failed to expand bar container");
                }

                let message = SignerBarMessage::from(event);
                match parent.post_message(&message, &target_origin) {
                    Ok(()) => {
                        relayed += 1;
                        trace!(opened = message.opened, %target_origin, "Visibility relayed");
                    }
                    Err(e) => warn!(error = %e, "Failed to post visibility to parent"),
                }
            }

            debug!(relayed, "Visibility relay stopped");
        });

        Ok(RelayHandle { task })
    }
}

// ============================================================================
// RelayHandle
// ============================================================================

/// Handle to the running relay task.
#[derive(Debug)]
pub struct RelayHandle {
    task: JoinHandle<()>,
}

impl RelayHandle {
    /// Returns `true` while the relay is forwarding events.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Removes the listener.
    pub fn stop(&self) {
        self.task.abort();
    }
}

// ============================================================================
// Tests
// ============================================================================
