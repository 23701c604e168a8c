//! Shared fakes for integration tests.
//!
//! Provides in-memory stand-ins for every collaborator of the bootstrap:
//! - A recording page and parent frame
//! - API objects with and without `configure`
//! - Counting integration check, configuration store and connector
//! - A background that answers the code port once

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;
use url::Url;

use signer_bar::{
    ApiConfiguration, BarConfig, BarContext, Bootstrap, BootstrapOptions, CodeResponse,
    ConfigStore, DegradedNotice, Error, IntegrationCheck, LocalConnector, Page, ParentFrame, Port,
    PortConnector, PortListener, PortName, Result, ScriptLoad, SecureApi, SignerBarMessage,
    TargetOrigin, VisibilityEvent, listener,
};

// ============================================================================
// Logging
// ============================================================================

/// Installs a test subscriber once; later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("signer_bar=debug")),
        )
        .with_test_writer()
        .with_target(false)
        .try_init();
}

// ============================================================================
// API Objects
// ============================================================================

/// API object without `configure`.
#[derive(Default)]
pub struct FieldApi {
    pub interface: Mutex<Option<String>>,
    pub port: Mutex<Option<String>>,
}

impl SecureApi for FieldApi {
    fn set_dapps_interface(&self, interface: &str) {
        *self.interface.lock() = Some(interface.to_string());
    }

    fn set_dapps_port(&self, port: &str) {
        *self.port.lock() = Some(port.to_string());
    }
}

/// API object with `configure`.
#[derive(Default)]
pub struct ConfigurableApi {
    pub configured: Mutex<Vec<ApiConfiguration>>,
    pub fields_touched: AtomicUsize,
}

impl SecureApi for ConfigurableApi {
    fn supports_configure(&self) -> bool {
        true
    }

    fn configure(&self, configuration: &ApiConfiguration) -> Result<()> {
        self.configured.lock().push(configuration.clone());
        Ok(())
    }

    fn set_dapps_interface(&self, _interface: &str) {
        self.fields_touched.fetch_add(1, Ordering::SeqCst);
    }

    fn set_dapps_port(&self, _port: &str) {
        self.fields_touched.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// FakePage
// ============================================================================

/// Page recording every side effect.
pub struct FakePage {
    location: String,
    api: Arc<dyn SecureApi>,
    visibility_rx: Mutex<Option<mpsc::UnboundedReceiver<VisibilityEvent>>>,
    pub visibility_tx: mpsc::UnboundedSender<VisibilityEvent>,
    pub location_reads: AtomicUsize,
    pub subscriptions: AtomicUsize,
    pub expansions: AtomicUsize,
    pub notices: Mutex<Vec<DegradedNotice>>,
    pub placeholder: Mutex<String>,
    pub scripts: Mutex<Vec<String>>,
    pub stylesheets: Mutex<Vec<String>>,
    pub contexts: Mutex<Vec<BarContext>>,
}

impl FakePage {
    /// Extension page whose script exposes `api`.
    pub fn new(api: Arc<dyn SecureApi>) -> Self {
        Self::at("chrome-extension://abcdef/bar.html", api)
    }

    /// Page at `location` whose script exposes `api`.
    pub fn at(location: &str, api: Arc<dyn SecureApi>) -> Self {
        let (visibility_tx, visibility_rx) = mpsc::unbounded_channel();
        Self {
            location: location.to_string(),
            api,
            visibility_rx: Mutex::new(Some(visibility_rx)),
            visibility_tx,
            location_reads: AtomicUsize::new(0),
            subscriptions: AtomicUsize::new(0),
            expansions: AtomicUsize::new(0),
            notices: Mutex::new(Vec::new()),
            placeholder: Mutex::new("Loading...".to_string()),
            scripts: Mutex::new(Vec::new()),
            stylesheets: Mutex::new(Vec::new()),
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// Returns `true` if no side effect happened at all.
    pub fn untouched(&self) -> bool {
        self.location_reads.load(Ordering::SeqCst) == 0
            && self.subscriptions.load(Ordering::SeqCst) == 0
            && self.notices.lock().is_empty()
            && self.scripts.lock().is_empty()
            && self.stylesheets.lock().is_empty()
    }
}

impl Page for FakePage {
    fn location(&self) -> Result<Url> {
        self.location_reads.fetch_add(1, Ordering::SeqCst);
        Ok(Url::parse(&self.location)?)
    }

    fn show_degraded_notice(&self, notice: &DegradedNotice) -> Result<()> {
        *self.placeholder.lock() = notice.to_html();
        self.notices.lock().push(notice.clone());
        Ok(())
    }

    fn inject_script(&self, locator: &str, context: BarContext) -> Result<ScriptLoad> {
        self.scripts.lock().push(locator.to_string());
        self.contexts.lock().push(context);
        Ok(ScriptLoad::ready(locator, Arc::clone(&self.api)))
    }

    fn inject_stylesheet(&self, locator: &str) -> Result<()> {
        self.stylesheets.lock().push(locator.to_string());
        Ok(())
    }

    fn expand_container(&self) -> Result<()> {
        self.expansions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn visibility_events(&self) -> Result<mpsc::UnboundedReceiver<VisibilityEvent>> {
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        self.visibility_rx
            .lock()
            .take()
            .ok_or_else(|| Error::page("visibility listener already installed"))
    }
}

// ============================================================================
// FakeParent
// ============================================================================

/// Parent frame recording posted messages.
#[derive(Default)]
pub struct FakeParent {
    pub messages: Mutex<Vec<(SignerBarMessage, String)>>,
}

impl ParentFrame for FakeParent {
    fn post_message(&self, message: &SignerBarMessage, target_origin: &TargetOrigin) -> Result<()> {
        self.messages
            .lock()
            .push((message.clone(), target_origin.to_string()));
        Ok(())
    }
}

impl FakeParent {
    /// Waits until `count` messages arrived.
    pub async fn wait_for(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.messages.lock().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("parent messages");
    }
}

// ============================================================================
// Counting Collaborators
// ============================================================================

/// Integration check with a fixed answer, counting calls.
pub struct CountingIntegration {
    enabled: bool,
    pub calls: AtomicUsize,
}

impl CountingIntegration {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl IntegrationCheck for CountingIntegration {
    async fn is_enabled(&self) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.enabled)
    }
}

/// Configuration store counting reads. `None` fails every read.
pub struct CountingStore {
    config: Option<BarConfig>,
    pub reads: AtomicUsize,
}

impl CountingStore {
    pub fn new(config: BarConfig) -> Self {
        Self {
            config: Some(config),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            config: None,
            reads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ConfigStore for CountingStore {
    async fn get(&self) -> Result<BarConfig> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.config
            .clone()
            .ok_or_else(|| Error::connection("background not reachable"))
    }
}

/// Connector recording the name of every opened port.
pub struct CountingConnector {
    inner: LocalConnector,
    pub opened: Mutex<Vec<String>>,
}

impl PortConnector for CountingConnector {
    fn connect(&self, name: &PortName) -> Result<Port> {
        self.opened.lock().push(name.to_string());
        self.inner.connect(name)
    }
}

// ============================================================================
// Background
// ============================================================================

/// What the background observed on the code port.
#[derive(Debug)]
pub struct CodeExchange {
    /// The request the bar sent.
    pub request: Value,
    /// The port was still open when the response was posted.
    pub open_at_response: bool,
    /// Messages after the request, before the bar hung up.
    pub extra_messages: usize,
}

/// Answers the first accepted port with `response`, then waits for the bar
/// to hang up.
pub fn serve_code(mut listener: PortListener, response: CodeResponse) -> JoinHandle<CodeExchange> {
    tokio::spawn(async move {
        let mut remote = listener.accept().await.expect("code port");
        let request = remote.recv().await.expect("code request");
        let open_at_response = !remote.is_closed();
        remote.post(&response).expect("post response");

        let mut extra_messages = 0;
        while remote.recv().await.is_some() {
            extra_messages += 1;
        }

        CodeExchange {
            request,
            open_at_response,
            extra_messages,
        }
    })
}

// ============================================================================
// Assembly
// ============================================================================

/// Everything a bootstrap test needs.
pub struct Fixture {
    pub bootstrap: Bootstrap,
    pub page: Arc<FakePage>,
    pub parent: Arc<FakeParent>,
    pub integration: Arc<CountingIntegration>,
    pub store: Arc<CountingStore>,
    pub connector: Arc<CountingConnector>,
    pub listener: PortListener,
}

/// Builds a bootstrap over fakes.
pub fn fixture(
    enabled: bool,
    store: CountingStore,
    page: FakePage,
    options: BootstrapOptions,
) -> Fixture {
    init_logging();

    let (inner, listener) = listener();
    let page = Arc::new(page);
    let parent = Arc::new(FakeParent::default());
    let integration = Arc::new(CountingIntegration::new(enabled));
    let store = Arc::new(store);
    let connector = Arc::new(CountingConnector {
        inner,
        opened: Mutex::new(Vec::new()),
    });

    let bootstrap = Bootstrap::builder()
        .integration(integration.clone())
        .config_store(store.clone())
        .connector(connector.clone())
        .page(page.clone())
        .parent(parent.clone())
        .options(options)
        .build()
        .expect("bootstrap");

    Fixture {
        bootstrap,
        page,
        parent,
        integration,
        store,
        connector,
        listener,
    }
}
