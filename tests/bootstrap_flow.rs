//! End-to-end activation tests over in-memory fakes.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::json;

use signer_bar::protocol::{EV_BAR_CODE, EV_SIGNER_BAR};
use signer_bar::{
    Activation, ApiConfiguration, BarConfig, BarState, BootstrapOptions, CodeResponse,
    ConfigureStrategy, Error, GateDecision, TargetOrigin, VisibilityEvent,
};

use common::{ConfigurableApi, CountingStore, FakePage, FieldApi, fixture, serve_code};

// ============================================================================
// Gate
// ============================================================================

#[tokio::test]
async fn disabled_integration_runs_nothing() {
    let f = fixture(
        false,
        CountingStore::new(BarConfig::new().with_dapps("127.0.0.1:8545")),
        FakePage::new(Arc::new(FieldApi::default())),
        BootstrapOptions::default(),
    );

    let activation = f.bootstrap.run().await.expect("run");

    assert!(matches!(activation, Activation::Inactive(GateDecision::Disabled)));
    assert_eq!(f.integration.calls.load(Ordering::SeqCst), 1);
    assert_eq!(f.store.reads.load(Ordering::SeqCst), 0);
    assert!(f.connector.opened.lock().is_empty());
    assert!(f.page.untouched());
    assert!(f.parent.messages.lock().is_empty());
}

#[tokio::test]
async fn non_extension_page_stays_inactive() {
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new()),
        FakePage::at("https://dapp.example/", Arc::new(FieldApi::default())),
        BootstrapOptions::default(),
    );

    let activation = f.bootstrap.run().await.expect("run");

    assert!(matches!(
        activation,
        Activation::Inactive(GateDecision::WrongScheme { ref scheme }) if scheme == "https"
    ));
    assert_eq!(f.store.reads.load(Ordering::SeqCst), 0);
    assert!(f.connector.opened.lock().is_empty());
}

// ============================================================================
// Degraded Path
// ============================================================================

#[tokio::test]
async fn version_mismatch_links_to_signer() {
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new()),
        FakePage::new(Arc::new(FieldApi::default())),
        BootstrapOptions::default(),
    );
    let background = serve_code(f.listener, CodeResponse::version_mismatch("http://example:8180"));

    let activation = f.bootstrap.run().await.expect("run");
    let exchange = background.await.expect("background");

    let bar = activation.active().expect("active");
    let BarState::Degraded(notice) = bar.state() else {
        panic!("expected degraded state, got {:?}", bar.state());
    };
    assert_eq!(notice.href(), "http://example:8180/#/signer");
    assert_eq!(notice.target(), "_blank");

    let placeholder = f.page.placeholder.lock().clone();
    assert!(!placeholder.contains("Loading"));
    assert!(placeholder.contains("http://example:8180/#/signer"));

    assert!(f.page.scripts.lock().is_empty());
    assert!(f.page.stylesheets.lock().is_empty());

    assert_eq!(exchange.request, json!({ "type": EV_BAR_CODE }));
    assert!(exchange.open_at_response);
    assert_eq!(exchange.extra_messages, 0);
}

#[tokio::test]
async fn version_mismatch_without_ui() {
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new()),
        FakePage::new(Arc::new(FieldApi::default())),
        BootstrapOptions::default(),
    );
    let background = serve_code(
        f.listener,
        CodeResponse {
            success: false,
            ..Default::default()
        },
    );

    let activation = f.bootstrap.run().await.expect("run");
    background.await.expect("background");

    let BarState::Degraded(notice) = activation.active().expect("active").state() else {
        panic!("expected degraded state");
    };
    assert_eq!(notice.href(), "/#/signer");
}

// ============================================================================
// Success Path
// ============================================================================

#[tokio::test]
async fn success_without_styles_injects_exactly_one_script() {
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new()),
        FakePage::new(Arc::new(FieldApi::default())),
        BootstrapOptions::default(),
    );
    let background = serve_code(f.listener, CodeResponse::loaded("S"));

    let activation = f.bootstrap.run().await.expect("run");
    let exchange = background.await.expect("background");

    assert!(matches!(
        activation.active().map(|bar| bar.state()),
        Some(BarState::Ready { .. })
    ));
    assert_eq!(*f.page.scripts.lock(), vec!["S".to_string()]);
    assert!(f.page.stylesheets.lock().is_empty());
    assert!(f.page.notices.lock().is_empty());
    assert!(exchange.open_at_response);
}

#[tokio::test]
async fn success_with_styles_injects_both() {
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new()),
        FakePage::new(Arc::new(FieldApi::default())),
        BootstrapOptions::default(),
    );
    let background = serve_code(
        f.listener,
        CodeResponse::loaded("http://127.0.0.1:8180/bar.js").with_styles("http://127.0.0.1:8180/bar.css"),
    );

    f.bootstrap.run().await.expect("run");
    background.await.expect("background");

    assert_eq!(f.page.scripts.lock().len(), 1);
    assert_eq!(
        *f.page.stylesheets.lock(),
        vec!["http://127.0.0.1:8180/bar.css".to_string()]
    );
}

#[tokio::test]
async fn only_the_code_port_is_opened_during_activation() {
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new()),
        FakePage::new(Arc::new(FieldApi::default())),
        BootstrapOptions::default(),
    );
    let background = serve_code(f.listener, CodeResponse::loaded("S"));

    f.bootstrap.run().await.expect("run");
    background.await.expect("background");

    assert_eq!(*f.connector.opened.lock(), vec!["barScripts".to_string()]);
}

#[tokio::test]
async fn background_seed_reaches_the_script() {
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new().with_background_seed(json!("0xseed"))),
        FakePage::new(Arc::new(FieldApi::default())),
        BootstrapOptions::default(),
    );
    let background = serve_code(f.listener, CodeResponse::loaded("S"));

    let activation = f.bootstrap.run().await.expect("run");
    background.await.expect("background");

    let contexts = f.page.contexts.lock();
    assert_eq!(contexts.len(), 1);
    assert_eq!(contexts[0].background_seed(), Some(&json!("0xseed")));

    let bar = activation.active().expect("active");
    assert!(Arc::ptr_eq(bar.context().transport(), contexts[0].transport()));
    assert_eq!(f.store.reads.load(Ordering::SeqCst), 1);
}

// ============================================================================
// API Configuration
// ============================================================================

#[tokio::test]
async fn configure_method_receives_endpoint() {
    let api = Arc::new(ConfigurableApi::default());
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new().with_dapps("127.0.0.1:8545")),
        FakePage::new(api.clone()),
        BootstrapOptions::default(),
    );
    let background = serve_code(f.listener, CodeResponse::loaded("S"));

    let activation = f.bootstrap.run().await.expect("run");
    background.await.expect("background");

    assert!(matches!(
        activation.active().map(|bar| bar.state()),
        Some(BarState::Ready {
            strategy: ConfigureStrategy::Method,
            ..
        })
    ));
    assert_eq!(
        *api.configured.lock(),
        vec![ApiConfiguration {
            dapps_interface: Some("127.0.0.1".into()),
            dapps_port: Some("8545".into()),
        }]
    );
    assert_eq!(api.fields_touched.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fields_fallback_assigns_both_components() {
    let api = Arc::new(FieldApi::default());
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new().with_dapps("localhost:8080")),
        FakePage::new(api.clone()),
        BootstrapOptions::default(),
    );
    let background = serve_code(f.listener, CodeResponse::loaded("S"));

    f.bootstrap.run().await.expect("run");
    background.await.expect("background");

    assert_eq!(api.interface.lock().as_deref(), Some("localhost"));
    assert_eq!(api.port.lock().as_deref(), Some("8080"));
}

#[tokio::test]
async fn absent_dapps_assigns_nothing() {
    let api = Arc::new(FieldApi::default());
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new()),
        FakePage::new(api.clone()),
        BootstrapOptions::default(),
    );
    let background = serve_code(f.listener, CodeResponse::loaded("S"));

    let activation = f.bootstrap.run().await.expect("run");
    background.await.expect("background");

    assert!(matches!(
        activation.active().map(|bar| bar.state()),
        Some(BarState::Ready {
            strategy: ConfigureStrategy::Fields {
                interface: false,
                port: false
            },
            ..
        })
    ));
    assert!(api.interface.lock().is_none());
    assert!(api.port.lock().is_none());
}

// ============================================================================
// Visibility Relay
// ============================================================================

#[tokio::test]
async fn visibility_changes_reach_the_parent() {
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new()),
        FakePage::new(Arc::new(FieldApi::default())),
        BootstrapOptions::default(),
    );
    let background = serve_code(f.listener, CodeResponse::loaded("S"));

    let activation = f.bootstrap.run().await.expect("run");
    background.await.expect("background");

    f.page.visibility_tx.send(VisibilityEvent::new(true)).expect("send");
    f.page.visibility_tx.send(VisibilityEvent::new(false)).expect("send");
    f.parent.wait_for(2).await;

    let messages = f.parent.messages.lock().clone();
    assert_eq!(messages[0].0.message_type, EV_SIGNER_BAR);
    assert!(messages[0].0.opened);
    assert!(!messages[1].0.opened);
    assert!(messages.iter().all(|(_, origin)| origin == "*"));
    assert_eq!(f.page.expansions.load(Ordering::SeqCst), 2);
    assert_eq!(f.page.subscriptions.load(Ordering::SeqCst), 1);

    let bar = activation.active().expect("active");
    assert!(bar.relay().is_running());
    bar.shutdown();
}

#[tokio::test]
async fn relay_honours_restricted_origin() {
    let origin = TargetOrigin::parse("http://127.0.0.1:8180").expect("origin");
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new()),
        FakePage::new(Arc::new(FieldApi::default())),
        BootstrapOptions::new().with_target_origin(origin),
    );
    let background = serve_code(f.listener, CodeResponse::version_mismatch("http://127.0.0.1:8180"));

    let _activation = f.bootstrap.run().await.expect("run");
    background.await.expect("background");

    f.page.visibility_tx.send(VisibilityEvent::new(true)).expect("send");
    f.parent.wait_for(1).await;

    assert_eq!(f.parent.messages.lock()[0].1, "http://127.0.0.1:8180");
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn config_failure_is_reported_before_any_port_opens() {
    let f = fixture(
        true,
        CountingStore::failing(),
        FakePage::new(Arc::new(FieldApi::default())),
        BootstrapOptions::default(),
    );

    let err = f.bootstrap.run().await.unwrap_err();

    assert!(matches!(err, Error::ConfigRetrieval { .. }));
    assert!(f.connector.opened.lock().is_empty());
    assert!(f.page.scripts.lock().is_empty());
}

#[tokio::test]
async fn silent_background_times_out_and_closes_port() {
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new()),
        FakePage::new(Arc::new(FieldApi::default())),
        BootstrapOptions::new().with_response_timeout(Duration::from_millis(50)),
    );
    let mut listener = f.listener;
    let background = tokio::spawn(async move {
        let mut remote = listener.accept().await.expect("code port");
        let _request = remote.recv().await.expect("code request");
        remote.closed().await;
    });

    let err = f.bootstrap.run().await.unwrap_err();

    assert!(err.is_timeout());
    assert!(matches!(err, Error::ResponseTimeout { .. }));
    tokio::time::timeout(Duration::from_secs(1), background)
        .await
        .expect("port closed")
        .expect("background");
    assert!(f.page.scripts.lock().is_empty());
}

#[tokio::test]
async fn malformed_success_is_a_protocol_error() -> anyhow::Result<()> {
    let f = fixture(
        true,
        CountingStore::new(BarConfig::new()),
        FakePage::new(Arc::new(FieldApi::default())),
        BootstrapOptions::default(),
    );
    let background = serve_code(
        f.listener,
        CodeResponse {
            success: true,
            ..Default::default()
        },
    );

    let err = f.bootstrap.run().await.unwrap_err();
    let exchange = background.await?;

    assert!(matches!(err, Error::Protocol { .. }));
    assert!(exchange.open_at_response);
    assert!(f.page.scripts.lock().is_empty());
    Ok(())
}
