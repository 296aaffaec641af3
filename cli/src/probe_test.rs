use axum::Router;
use axum::http::{HeaderMap, StatusCode as AxumStatus};
use axum::routing::{get, post};
use serde_json::{Value, json};

use super::*;

const TOKEN: &str = "tok-123";

fn user_json() -> Value {
    json!({ "email": "analyst@example.com", "role": "analyst", "name": "Ana" })
}

async fn nested_login(axum::Json(body): axum::Json<Value>) -> (AxumStatus, axum::Json<Value>) {
    if body["password"] == "secret" {
        let body = json!({
            "success": true,
            "message": "ok",
            "data": { "token": TOKEN, "user": user_json() },
        });
        (AxumStatus::OK, axum::Json(body))
    } else {
        (AxumStatus::UNAUTHORIZED, axum::Json(json!({ "success": false, "message": "Invalid credentials" })))
    }
}

async fn flat_login() -> axum::Json<Value> {
    axum::Json(json!({ "token": TOKEN, "user": user_json() }))
}

async fn me(headers: HeaderMap) -> (AxumStatus, axum::Json<Value>) {
    let authorized = headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer tok-123");
    if authorized {
        (AxumStatus::OK, axum::Json(user_json()))
    } else {
        (AxumStatus::UNAUTHORIZED, axum::Json(json!({ "message": "token expired" })))
    }
}

async fn summarize_echo(axum::Json(body): axum::Json<Value>) -> axum::Json<Value> {
    axum::Json(json!({ "summary": "2 rows", "received": body }))
}

async fn forbidden() -> (AxumStatus, &'static str) {
    (AxumStatus::FORBIDDEN, "forbidden")
}

async fn broken() -> (AxumStatus, axum::Json<Value>) {
    (AxumStatus::INTERNAL_SERVER_ERROR, axum::Json(json!({ "error": "summarizer offline" })))
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "late"
}

fn mock_api(login: Router) -> Router {
    login
        .route("/api/auth/me", get(me))
        .route("/api/summarize", post(summarize_echo))
        .route("/api/admin", get(forbidden))
        .route("/api/broken", get(broken))
        .route("/api/slow", get(slow))
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn nested_server() -> String {
    serve(mock_api(Router::new().route("/api/auth/login", post(nested_login)))).await
}

async fn flat_server() -> String {
    serve(mock_api(Router::new().route("/api/auth/login", post(flat_login)))).await
}

fn probe(base_url: &str) -> Probe {
    Probe::new(base_url, Duration::from_secs(2)).unwrap()
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_normalizes_nested_envelope() {
    let base = nested_server().await;
    let outcome = probe(&base).login("analyst@example.com", "secret").await.unwrap();

    assert_eq!(outcome.shape, EnvelopeShape::Nested);
    assert_eq!(outcome.payload.token, TOKEN);
    assert_eq!(outcome.payload.user.email, "analyst@example.com");
}

#[tokio::test]
async fn login_normalizes_flat_envelope() {
    let base = flat_server().await;
    let outcome = probe(&base).login("analyst@example.com", "anything").await.unwrap();

    assert_eq!(outcome.shape, EnvelopeShape::Flat);
    assert_eq!(outcome.payload.token, TOKEN);
    assert_eq!(outcome.payload.user.role.as_deref(), Some("analyst"));
}

#[tokio::test]
async fn both_envelopes_yield_the_same_payload() {
    let nested = probe(&nested_server().await).login("a", "secret").await.unwrap();
    let flat = probe(&flat_server().await).login("a", "secret").await.unwrap();
    assert_eq!(nested.payload, flat.payload);
}

#[tokio::test]
async fn login_rejection_is_unauthorized() {
    let base = nested_server().await;
    let err = probe(&base).login("analyst@example.com", "wrong").await.unwrap_err();

    match err {
        CliError::Unauthorized { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected unauthorized, got {other:?}"),
    }
}

#[test]
fn login_report_omits_token() {
    let outcome = LoginOutcome {
        shape: EnvelopeShape::Nested,
        payload: contracts::normalize_login_response(json!({ "token": TOKEN, "user": user_json() })).unwrap(),
    };
    let report = outcome.report();
    assert_eq!(report["envelope"], "nested");
    assert_eq!(report["token_present"], true);
    assert!(!report.to_string().contains(TOKEN));
}

// =============================================================================
// protected / summarize
// =============================================================================

#[tokio::test]
async fn protected_sends_bearer_token() {
    let base = nested_server().await;
    let body = probe(&base).protected(TOKEN, contracts::PROFILE_PATH).await.unwrap();
    assert_eq!(body["email"], "analyst@example.com");
}

#[tokio::test]
async fn protected_with_stale_token_is_unauthorized() {
    let base = nested_server().await;
    let err = probe(&base).protected("stale", "/api/auth/me").await.unwrap_err();
    assert!(matches!(err, CliError::Unauthorized { status: 401, .. }));
    assert_eq!(err.exit_status(), crate::EXIT_UNAUTHORIZED);
}

#[tokio::test]
async fn forbidden_counts_as_unauthorized() {
    let base = nested_server().await;
    let err = probe(&base).protected(TOKEN, "api/admin").await.unwrap_err();
    assert!(matches!(err, CliError::Unauthorized { status: 403, .. }));
}

#[tokio::test]
async fn server_error_carries_message() {
    let base = nested_server().await;
    let err = probe(&base).protected(TOKEN, "/api/broken").await.unwrap_err();
    match err {
        CliError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "summarizer offline");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn summarize_posts_chart_config_key() {
    let base = nested_server().await;
    let request = SummarizeRequest {
        data: vec![json!({ "month": "Jan", "sales": 10 }), json!({ "month": "Feb", "sales": 12 })],
        chart_config: serde_json::from_value(json!({ "type": "bar" })).unwrap(),
    };

    let body = probe(&base).summarize(TOKEN, &request).await.unwrap();
    assert_eq!(body["summary"], "2 rows");
    assert_eq!(body["received"]["chartConfig"]["type"], "bar");
    assert_eq!(body["received"]["data"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn timeout_applies_to_requests() {
    let base = nested_server().await;
    let probe = Probe::new(&base, Duration::from_millis(200)).unwrap();
    let err = probe.protected(TOKEN, "/api/slow").await.unwrap_err();
    match err {
        CliError::Http(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}

// =============================================================================
// construction
// =============================================================================

#[test]
fn base_url_requires_http_scheme() {
    assert!(matches!(Probe::new("localhost:3000", Duration::from_secs(1)), Err(CliError::InvalidBaseUrl(_))));
}

#[test]
fn url_joins_with_single_slash() {
    let probe = probe("http://127.0.0.1:3000/");
    assert_eq!(probe.url("/api/auth/me"), "http://127.0.0.1:3000/api/auth/me");
    assert_eq!(probe.url("api/auth/me"), "http://127.0.0.1:3000/api/auth/me");
}

// =============================================================================
// inspect_token
// =============================================================================

#[test]
fn inspect_token_reports_claims() {
    let token = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJ1c2VyLTQyIiwiZXhwIjoxNzAwMDAwMDAwfQ.sig";
    let report = inspect_token(token, 1_800_000_000).unwrap();
    assert_eq!(report["subject"], "user-42");
    assert_eq!(report["expires_at"], 1_700_000_000);
    assert_eq!(report["expired"], true);
}

#[test]
fn inspect_token_rejects_opaque_token() {
    let err = inspect_token("not-a-jwt", 0).unwrap_err();
    assert!(matches!(err, CliError::Token(_)));
    assert_eq!(err.exit_status(), crate::EXIT_FAILURE);
}
