use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::test;

use gateway::client::{GatewayClient, GatewayConfig};
use gateway::error::GatewayError;
use gateway::nav::Navigator;

use stub::{
    RecordingNavigator, RecordingNotifier, StaticSession, dead_endpoint, spawn_black_hole,
    spawn_script,
};

struct Harness {
    session: Arc<StaticSession>,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
    client: GatewayClient,
}

fn harness(base: &str, session: StaticSession, route: &str) -> Harness {
    let session = Arc::new(session);
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::at(route));

    let client = GatewayClient::new(
        GatewayConfig::new(base),
        session.clone(),
        notifier.clone(),
        navigator.clone(),
    )
    .unwrap();

    Harness {
        session,
        notifier,
        navigator,
        client,
    }
}

#[test]
async fn bearer_token_is_attached_at_dispatch_time() {
    let (base, mut rx) = spawn_script(vec![(200, r#"{"ok": true}"#.into())]).await;
    let h = harness(&base, StaticSession::with_token("tok-1"), "/dashboard");

    let _: serde_json::Value = h.client.get("/classes/").await.unwrap();

    let req = rx.recv().await.unwrap();
    assert_eq!(req.request_line, "GET /classes/ HTTP/1.1");
    assert!(req.has_header("authorization", "Bearer tok-1"));
}

#[test]
async fn anonymous_requests_carry_no_authorization_header() {
    let (base, mut rx) = spawn_script(vec![(200, r#"{"ok": true}"#.into())]).await;
    let h = harness(&base, StaticSession::anonymous(), "/");

    let _: serde_json::Value = h.client.get("/classes/").await.unwrap();

    let req = rx.recv().await.unwrap();
    assert!(req.header("authorization").is_none());
}

#[test]
async fn rejected_token_clears_session_and_redirects_once() {
    let (base, _rx) = spawn_script(vec![
        (401, r#"{"msg": "Token has expired"}"#.into()),
        (401, r#"{"msg": "Token has expired"}"#.into()),
    ])
    .await;
    let h = harness(&base, StaticSession::with_token("tok-1"), "/dashboard");

    let err = h.client.get::<serde_json::Value>("/grades/").await.unwrap_err();
    assert!(matches!(err, GatewayError::SessionExpired { .. }));
    assert_eq!(err.status(), Some(401));

    assert!(h.session.token().is_none());
    assert_eq!(h.session.cleared.load(Ordering::SeqCst), 1);
    assert_eq!(h.navigator.redirects.load(Ordering::SeqCst), 1);
    assert_eq!(h.navigator.current_route(), "/login");
    assert!(h.notifier.contains("Session expired. Please log in again."));

    // Already on /login now: a second 401 must not redirect or clear again.
    let err = h.client.get::<serde_json::Value>("/grades/").await.unwrap_err();
    assert!(matches!(err, GatewayError::SessionExpired { .. }));
    assert_eq!(h.session.cleared.load(Ordering::SeqCst), 1);
    assert_eq!(h.navigator.redirects.load(Ordering::SeqCst), 1);
}

#[test]
async fn forbidden_notifies_but_keeps_the_session() {
    let (base, _rx) = spawn_script(vec![(
        403,
        r#"{"msg": "Only admins can assign teachers"}"#.into(),
    )])
    .await;
    let h = harness(&base, StaticSession::with_token("tok-1"), "/classes/3");

    let err = h
        .client
        .post::<_, serde_json::Value>("/classes/3/assign-teacher", &serde_json::json!({"teacher_id": 9}))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::PermissionDenied { .. }));
    assert_eq!(err.status(), Some(403));
    assert!(h.notifier.contains("Only admins can assign teachers"));

    // The token is still usable; 403 is about this action, not the session.
    assert_eq!(h.session.token().as_deref(), Some("tok-1"));
    assert_eq!(h.navigator.redirects.load(Ordering::SeqCst), 0);
}

#[test]
async fn validation_failure_surfaces_each_field_message() {
    let body = r#"{
        "msg": "Validation failed",
        "errors": {
            "email": ["Email already registered"],
            "name": ["name is required"]
        }
    }"#;
    let (base, _rx) = spawn_script(vec![(422, body.into())]).await;
    let h = harness(&base, StaticSession::with_token("tok-1"), "/classes");

    let err = h
        .client
        .post::<_, serde_json::Value>("/classes/", &serde_json::json!({"name": ""}))
        .await
        .unwrap_err();

    assert_eq!(err.field_errors().map(|f| f.len()), Some(2));
    assert!(h.notifier.contains("Email already registered"));
    assert!(h.notifier.contains("name is required"));
}

#[test]
async fn rate_limit_and_server_errors_get_generic_notices() {
    let (base, _rx) = spawn_script(vec![(429, "{}".into()), (500, "{}".into())]).await;
    let h = harness(&base, StaticSession::with_token("tok-1"), "/");

    let err = h.client.get::<serde_json::Value>("/classes/").await.unwrap_err();
    assert!(matches!(err, GatewayError::RateLimited { .. }));
    assert!(h.notifier.contains("Too many requests. Please try again later."));

    let err = h.client.get::<serde_json::Value>("/classes/").await.unwrap_err();
    assert!(matches!(err, GatewayError::ServerError { status: 500, .. }));
    assert!(h.notifier.contains("Server error. Please try again later."));

    // Neither status touches the session.
    assert_eq!(h.session.cleared.load(Ordering::SeqCst), 0);
}

#[test]
async fn not_found_is_returned_without_a_notice() {
    let (base, _rx) = spawn_script(vec![(404, r#"{"msg": "Class not found"}"#.into())]).await;
    let h = harness(&base, StaticSession::with_token("tok-1"), "/");

    let err = h.client.get::<serde_json::Value>("/classes/999").await.unwrap_err();

    assert!(matches!(err, GatewayError::NotFound { .. }));
    assert_eq!(h.notifier.len(), 0);
}

#[test]
async fn timeout_is_reported_distinctly() {
    let base = spawn_black_hole().await;

    let session = Arc::new(StaticSession::with_token("tok-1"));
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::at("/"));
    let client = GatewayClient::new(
        GatewayConfig::new(&base).with_timeout(Duration::from_millis(200)),
        session.clone(),
        notifier.clone(),
        navigator,
    )
    .unwrap();

    let err = client.get::<serde_json::Value>("/classes/").await.unwrap_err();

    assert!(matches!(err, GatewayError::Timeout));
    assert!(notifier.contains("Request timeout"));
    // A slow server is not an auth failure.
    assert_eq!(session.cleared.load(Ordering::SeqCst), 0);
}

#[test]
async fn connection_refused_is_a_connectivity_error() {
    let base = dead_endpoint().await;
    let h = harness(&base, StaticSession::with_token("tok-1"), "/");

    let err = h.client.get::<serde_json::Value>("/classes/").await.unwrap_err();

    assert!(matches!(err, GatewayError::Connectivity(_)));
    assert!(h.notifier.contains("Network error"));
    assert_eq!(h.session.cleared.load(Ordering::SeqCst), 0);
}
