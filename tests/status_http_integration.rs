//! Integration tests for the HTTP status source and onboarding view.
//!
//! Each test spins up an Axum stub of the portal API on a random port and
//! exercises the real request/decode path through reqwest.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use supplier_portal::config::PortalConfig;
use supplier_portal::error::{FetchError, FetchErrorKind};
use supplier_portal::onboarding::{
    HistoryNavigator, HttpStatusSource, NextStep, OnboardingRouter, OnboardingView,
    RouteDecision, RouterOptions, StatusSource, resolve_next_step,
};
use supplier_portal::stores::{AuthStore, SessionStores, ThemeMode};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

const VALID_TOKEN: &str = "Bearer good-token";

fn pending_pan() -> Value {
    json!({
        "supplierType": "INDIVIDUAL",
        "steps": {
            "supplierTypeSelected": true,
            "emailOtpVerified": true,
            "individualPan": { "status": "PENDING" },
            "profileCompleted": false
        },
        "nextStep": null
    })
}

/// Status endpoint that requires `VALID_TOKEN`.
async fn guarded_status(headers: HeaderMap) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == VALID_TOKEN);
    if authorized {
        (StatusCode::OK, Json(pending_pan())).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": "TOKEN_EXPIRED", "message": "Session expired" })),
        )
            .into_response()
    }
}

async fn done_status() -> impl IntoResponse {
    Json(json!({ "data": { "nextStep": "DONE" } }))
}

async fn broken_status() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable")
}

async fn null_status() -> impl IntoResponse {
    Json(json!({ "data": null }))
}

async fn garbled_status() -> impl IntoResponse {
    (StatusCode::OK, "<html>maintenance</html>")
}

async fn slow_status() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(pending_pan())
}

/// Start the stub API on a random port and return its base URL.
async fn start_server() -> String {
    let app = Router::new()
        .route("/status", get(guarded_status))
        .route("/done", get(done_status))
        .route("/broken", get(broken_status))
        .route("/empty", get(null_status))
        .route("/garbled", get(garbled_status))
        .route("/slow", get(slow_status));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{port}")
}

fn config(base_url: &str, path: &str) -> PortalConfig {
    PortalConfig {
        api_base_url: base_url.to_string(),
        status_path: path.to_string(),
        request_timeout: Duration::from_millis(500),
        ..PortalConfig::default()
    }
}

async fn signed_in() -> Arc<AuthStore> {
    let auth = Arc::new(AuthStore::new());
    auth.sign_in("good-token", "supplier@example.test").await;
    auth
}

#[tokio::test]
async fn authorized_fetch_decodes_snapshot() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let source = HttpStatusSource::new(&config(&base, "/status"), signed_in().await).unwrap();

        let snapshot = source.fetch_status().await.unwrap().unwrap();
        assert_eq!(resolve_next_step(&snapshot), NextStep::VerifyPan);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn missing_token_surfaces_unauthorized() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let auth = Arc::new(AuthStore::new());
        let source = HttpStatusSource::new(&config(&base, "/status"), auth).unwrap();

        let err = source.fetch_status().await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Unauthorized {
                status: 401,
                code: Some("TOKEN_EXPIRED".into()),
                message: "Session expired".into(),
            }
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn server_error_is_decoded_once() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let source = HttpStatusSource::new(&config(&base, "/broken"), signed_in().await).unwrap();

        let err = source.fetch_status().await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Server);
        assert_eq!(err.status(), 500);
        assert_eq!(
            err.to_string(),
            "Status request failed (500): database unavailable"
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn garbled_body_is_decode_error() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let source = HttpStatusSource::new(&config(&base, "/garbled"), signed_in().await).unwrap();

        let err = source.fetch_status().await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Decode);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn slow_server_times_out_as_network_error() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let source = HttpStatusSource::new(&config(&base, "/slow"), signed_in().await).unwrap();

        let err = source.fetch_status().await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Network);
        assert_eq!(err.status(), 0);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    timeout(TEST_TIMEOUT, async {
        // Reserve a port, then free it so nothing is listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let base = format!("http://127.0.0.1:{port}");
        let source = HttpStatusSource::new(&config(&base, "/status"), signed_in().await).unwrap();
        let err = source.fetch_status().await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Network);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn expired_session_view_redirects_to_login() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let stores = SessionStores::init(ThemeMode::Light);
        let cfg = config(&base, "/status");
        let source = Arc::new(HttpStatusSource::new(&cfg, Arc::clone(&stores.auth)).unwrap());

        let nav = Arc::new(HistoryNavigator::new("/dashboard"));
        let router = OnboardingRouter::new(cfg.routes.clone(), RouterOptions::new(), nav.clone());
        let view = OnboardingView::new(source, router);

        let decision = view.mount().await.unwrap();
        assert_eq!(
            decision,
            RouteDecision::RedirectToLogin {
                route: "/auth/login".into(),
                reason: Some(FetchErrorKind::Unauthenticated),
            }
        );
        assert_eq!(nav.current(), "/auth/login");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn signed_in_view_follows_session_through_logout() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let stores = SessionStores::init(ThemeMode::System);
        stores.auth.sign_in("good-token", "supplier@example.test").await;

        let cfg = config(&base, "/status");
        let source = Arc::new(HttpStatusSource::new(&cfg, Arc::clone(&stores.auth)).unwrap());
        let nav = Arc::new(HistoryNavigator::new("/dashboard"));
        let router = OnboardingRouter::new(cfg.routes.clone(), RouterOptions::new(), nav.clone());
        let view = OnboardingView::new(source, router);

        view.mount().await.unwrap();
        assert_eq!(nav.current(), "/onboarding/verify-pan");

        stores.clear_on_logout().await;
        let decision = view.refetch().await.unwrap();
        assert!(matches!(decision, RouteDecision::RedirectToLogin { .. }));
        assert_eq!(nav.current(), "/auth/login");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn done_status_renders_without_navigation() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let cfg = config(&base, "/done");
        let source = Arc::new(HttpStatusSource::new(&cfg, signed_in().await).unwrap());

        let nav = Arc::new(HistoryNavigator::new("/dashboard"));
        let router = OnboardingRouter::new(cfg.routes.clone(), RouterOptions::new(), nav.clone());
        let view = OnboardingView::new(source, router);

        assert_eq!(view.mount().await.unwrap(), RouteDecision::Render);
        assert!(view.status().await.is_complete);
        assert_eq!(nav.entries(), vec!["/dashboard"]);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn null_status_redirects_to_login_without_error() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let cfg = config(&base, "/empty");
        let source = Arc::new(HttpStatusSource::new(&cfg, signed_in().await).unwrap());
        assert_eq!(source.fetch_status().await.unwrap(), None);

        let nav = Arc::new(HistoryNavigator::new("/dashboard"));
        let router = OnboardingRouter::new(cfg.routes.clone(), RouterOptions::new(), nav.clone());
        let view = OnboardingView::new(source, router);

        let decision = view.mount().await.unwrap();
        assert_eq!(
            decision,
            RouteDecision::RedirectToLogin {
                route: "/auth/login".into(),
                reason: None,
            }
        );
        let status = view.status().await;
        assert!(status.data.is_none());
        assert!(status.error.is_none());
        assert_eq!(nav.current(), "/auth/login");
    })
    .await
    .expect("test timed out");
}
