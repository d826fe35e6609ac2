mod common;

use common::{file_url, FakeHost, FakeTransport, HostAction};
use ra_companion::{
    commands::{status_uri, StatusView, STATUS_SCHEME},
    lsp_ext::AnalyzerStatus,
};

#[tokio::test]
async fn render_without_active_document_sends_unscoped_request() {
    let transport = FakeTransport::new().respond::<AnalyzerStatus>(&"idle".to_string());
    let host = FakeHost::new();
    let view = StatusView::new();

    let body = view.render(&transport, &host).await;

    assert_eq!(body, "idle");
    let requests = transport.requests_sent();
    assert_eq!(requests.len(), 1);
    let (method, params) = &requests[0];
    assert_eq!(method, "rust-analyzer/analyzerStatus");
    assert!(params.get("textDocument").is_none());
}

#[tokio::test]
async fn render_with_active_document_scopes_the_request() {
    let transport = FakeTransport::new().respond::<AnalyzerStatus>(&"loaded".to_string());
    let host = FakeHost::with_active_editor(file_url("/demo/src/lib.rs"), 0, 0);
    let view = StatusView::new();

    let body = view.render(&transport, &host).await;

    assert_eq!(body, "loaded");
    let (_, params) = &transport.requests_sent()[0];
    assert_eq!(params["textDocument"]["uri"], "file:///demo/src/lib.rs");
}

#[tokio::test]
async fn render_failure_yields_empty_body() {
    let transport = FakeTransport::new().fail_on::<AnalyzerStatus>();
    let host = FakeHost::new();
    let view = StatusView::new();

    assert_eq!(view.render(&transport, &host).await, "");
}

#[test]
fn open_registers_once_and_signals_change_every_time() {
    let mut host = FakeHost::new();
    let mut view = StatusView::new();

    view.open(&mut host).unwrap();
    view.open(&mut host).unwrap();

    let registrations = host.registrations();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].1, STATUS_SCHEME);

    let uri = status_uri();
    let shows = host
        .actions
        .iter()
        .filter(|a| **a == HostAction::ShowedDocument(uri.clone()))
        .count();
    let changes = host
        .actions
        .iter()
        .filter(|a| **a == HostAction::EmittedChange(uri.clone()))
        .count();
    assert_eq!(shows, 2);
    assert_eq!(changes, 2);
}

#[test]
fn dispose_releases_the_registration_exactly_once() {
    let mut host = FakeHost::new();
    let mut view = StatusView::new();

    view.open(&mut host).unwrap();
    assert!(view.is_registered());
    let handle = host.registrations()[0].0;

    view.dispose(&mut host);
    view.dispose(&mut host);

    assert!(!view.is_registered());
    assert_eq!(host.releases(), [handle]);
}

#[test]
fn dispose_before_open_is_a_no_op() {
    let mut host = FakeHost::new();
    let mut view = StatusView::new();

    view.dispose(&mut host);

    assert!(host.actions.is_empty());
}
