//! The hosting document.
//!
//! [`Page`] abstracts the extension page the bar runs in: its location, the
//! loading placeholder, the bar container, and script/stylesheet injection.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::VisibilityEvent;

use super::{BarContext, DegradedNotice, SecureApi};

// ============================================================================
// Page
// ============================================================================

/// The extension page hosting the bar.
pub trait Page: Send + Sync {
    /// Returns the page location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if the location does not parse.
    fn location(&self) -> Result<Url>;

    /// Replaces the loading placeholder's content with `notice`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Page`] if the placeholder is missing.
    fn show_degraded_notice(&self, notice: &DegradedNotice) -> Result<()>;

    /// Appends a script element for `locator` to the body.
    ///
    /// The returned [`ScriptLoad`] resolves with the API object the script
    /// exposes once it has loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Page`] if the element cannot be created.
    fn inject_script(&self, locator: &str, context: BarContext) -> Result<ScriptLoad>;

    /// Appends a stylesheet link for `locator` to the head.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Page`] if the element cannot be created.
    fn inject_stylesheet(&self, locator: &str) -> Result<()>;

    /// Lets the bar container grow to the full viewport height.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Page`] if the container is missing.
    fn expand_container(&self) -> Result<()>;

    /// Subscribes to visibility events fired on the document body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Page`] if the listener cannot be registered.
    fn visibility_events(&self) -> Result<mpsc::UnboundedReceiver<VisibilityEvent>>;
}

// ============================================================================
// ScriptLoad
// ============================================================================

/// Completion of an injected script.
///
/// Resolves once, when the script signals `load`. A script that never loads
/// never resolves.
pub struct ScriptLoad {
    locator: String,
    completion: BoxFuture<'static, Result<Arc<dyn SecureApi>>>,
}

impl fmt::Debug for ScriptLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptLoad")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

impl ScriptLoad {
    /// Wraps a completion future.
    #[must_use]
    pub fn new<F>(locator: impl Into<String>, completion: F) -> Self
    where
        F: Future<Output = Result<Arc<dyn SecureApi>>> + Send + 'static,
    {
        Self {
            locator: locator.into(),
            completion: completion.boxed(),
        }
    }

    /// Completes when `rx` receives the load result.
    ///
    /// A dropped sender reports [`Error::ResourceLoad`].
    #[must_use]
    pub fn from_receiver(
        locator: impl Into<String>,
        rx: oneshot::Receiver<Result<Arc<dyn SecureApi>>>,
    ) -> Self {
        let locator = locator.into();
        let failed = locator.clone();

        Self::new(locator, async move {
            rx.await
                .map_err(|_| Error::resource_load(failed, "script element was discarded"))?
        })
    }

    /// Completes immediately with `api`.
    #[must_use]
    pub fn ready(locator: impl Into<String>, api: Arc<dyn SecureApi>) -> Self {
        Self::new(locator, async move { Ok(api) })
    }

    /// Returns the script locator.
    #[inline]
    #[must_use]
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Waits for the script to load.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceLoad`] if the page reports a load failure.
    pub async fn wait(self) -> Result<Arc<dyn SecureApi>> {
        self.completion.await
    }
}

// ============================================================================
// Tests
// ============================================================================
