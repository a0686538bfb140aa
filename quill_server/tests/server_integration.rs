//! Integration tests for the authentication HTTP surface.
//!
//! Exercises the bootstrap signup flow, cookie-pair sessions, the
//! session and bearer gates, and bearer token issuance end to end over
//! an in-memory database.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use quill::auth::{BearerTokenManager, SessionManager, UserStore};
use quill::db::{Database, DatabaseConfig};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method

const TEST_PEPPER: &str = "test_pepper_for_testing_only";
const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_only";

/// Build a router over a fresh in-memory database.
async fn create_test_server() -> axum::Router {
    let db = Database::new(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to create test database");
    let pool = Arc::new(db.pool().clone());

    let state = quill_server::api::AppState {
        sessions: Arc::new(SessionManager::new(pool.clone(), TEST_PEPPER.to_string())),
        bearer: Arc::new(BearerTokenManager::new(TEST_JWT_SECRET)),
        users: Arc::new(UserStore::new(pool.clone())),
        pool,
    };

    quill_server::api::create_router(state)
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Collect the raw Set-Cookie header values of a response.
fn set_cookie_headers(response: &axum::response::Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// Extract the `name=value` pairs from Set-Cookie headers, joined into a
/// Cookie header line for follow-up requests.
fn cookie_line(response: &axum::response::Response) -> String {
    set_cookie_headers(response)
        .iter()
        .map(|c| c.split(';').next().unwrap().trim().to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

const SIGNUP_FORM: &str =
    "email=admin@example.com&name=Admin&password=secret1&re-password=secret1";

/// Run the bootstrap signup and return the session cookie line.
async fn bootstrap_admin(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(form_request("/signup/", SIGNUP_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    cookie_line(&response)
}

// ============================================================================
// Health Check
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_server().await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}

// ============================================================================
// Bootstrap Signup
// ============================================================================

#[tokio::test]
async fn test_signup_page_hidden_after_bootstrap() {
    let app = create_test_server().await;

    let page = |app: &axum::Router| {
        app.clone().oneshot(
            Request::builder()
                .uri("/signup/")
                .body(Body::empty())
                .unwrap(),
        )
    };

    let response = page(&app).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    bootstrap_admin(&app).await;

    let response = page(&app).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_succeeds_once_and_sets_cookie_pair() {
    let app = create_test_server().await;

    let response = app
        .clone()
        .oneshot(form_request("/signup/", SIGNUP_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookie_headers(&response);
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().any(|c| c.starts_with("token-user=")));
    assert!(cookies.iter().any(|c| c.starts_with("token-value=")));
    // No remember-me: browser-session cookies, no Max-Age.
    assert!(cookies.iter().all(|c| !c.contains("Max-Age")));

    let body = body_json(response).await;
    assert_eq!(body["status"], "success");

    // Second signup is refused regardless of payload.
    let response = app
        .clone()
        .oneshot(form_request(
            "/signup/",
            "email=second@example.com&name=Second&password=secret2&re-password=secret2",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["msg"], "Signup is closed");
}

#[tokio::test]
async fn test_closed_signup_wins_over_invalid_payload() {
    let app = create_test_server().await;
    bootstrap_admin(&app).await;

    // Invalid email AND closed flow: the gate answers first.
    let response = app
        .clone()
        .oneshot(form_request(
            "/signup/",
            "email=garbage&name=x&password=a&re-password=b",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["msg"], "Signup is closed");
}

#[tokio::test]
async fn test_signup_validation_messages() {
    let app = create_test_server().await;

    let cases = [
        (
            "email=garbage&name=Admin&password=secret1&re-password=secret1",
            "Invalid email address.",
        ),
        (
            "email=admin@example.com&name=Al&password=secret1&re-password=secret1",
            "Name is too short.",
        ),
        (
            "email=admin@example.com&name=Admin&password=abcd&re-password=abcd",
            "Password is too short.",
        ),
        (
            "email=admin@example.com&name=Admin&password=aaaaaaaaaaaaaaaaaaaaa&re-password=aaaaaaaaaaaaaaaaaaaaa",
            "Password is too long.",
        ),
        (
            "email=admin@example.com&name=Admin&password=secret1&re-password=secret2",
            "Password does not match.",
        ),
    ];

    for (form, expected_msg) in cases {
        let response = app
            .clone()
            .oneshot(form_request("/signup/", form))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "form {form:?} should be a validation failure"
        );
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["msg"], expected_msg);
    }

    // None of the rejected submissions created a user: signup stays open.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/signup/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Login / Logout
// ============================================================================

#[tokio::test]
async fn test_login_success_and_failure() {
    let app = create_test_server().await;
    bootstrap_admin(&app).await;

    let response = app
        .clone()
        .oneshot(form_request(
            "/login/",
            "email=admin@example.com&password=secret1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(set_cookie_headers(&response).len(), 2);

    // Wrong password and unknown email get the same generic answer.
    for form in [
        "email=admin@example.com&password=wrong1",
        "email=nobody@example.com&password=secret1",
    ] {
        let response = app.clone().oneshot(form_request("/login/", form)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["msg"], "Invalid email or password");
    }
}

#[tokio::test]
async fn test_remember_me_extends_cookie_lifetime() {
    let app = create_test_server().await;
    bootstrap_admin(&app).await;

    let response = app
        .clone()
        .oneshot(form_request(
            "/login/",
            "email=admin@example.com&password=secret1&remember-me=on",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookie_headers(&response);
    assert_eq!(cookies.len(), 2);
    // 3 days, in seconds.
    assert!(cookies.iter().all(|c| c.contains("Max-Age=259200")));
}

#[tokio::test]
async fn test_logout_clears_cookies_and_invalidates_session() {
    let app = create_test_server().await;
    let cookie = bootstrap_admin(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/logout/")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login/");

    let cleared = set_cookie_headers(&response);
    assert_eq!(cleared.len(), 2);
    // Negative Max-Age: immediate expiry, not browser-session lifetime.
    assert!(cleared.iter().all(|c| c.contains("Max-Age=-3600")));

    // The old pair no longer authenticates: the token is gone server-side.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

// ============================================================================
// Session Gate
// ============================================================================

#[tokio::test]
async fn test_admin_requires_session_cookies() {
    let app = create_test_server().await;
    bootstrap_admin(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Browsers get a redirect, not a status code.
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login/");
}

#[tokio::test]
async fn test_admin_resolves_session_user() {
    let app = create_test_server().await;
    let cookie = bootstrap_admin(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["email"], "admin@example.com");
    assert_eq!(body["name"], "Admin");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_admin_rejects_tampered_cookie_pair() {
    let app = create_test_server().await;
    let cookie = bootstrap_admin(&app).await;

    // Unknown token value.
    let forged = format!("token-user=1; token-value={}", "0".repeat(64));
    // Token owned by user 1 but the pair claims another user.
    let value = cookie
        .split("; ")
        .find_map(|c| c.strip_prefix("token-value="))
        .unwrap();
    let mismatched = format!("token-user=999; token-value={value}");

    for line in [forged, mismatched] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/admin/")
                    .header(header::COOKIE, &line)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::SEE_OTHER,
            "cookie line {line:?} must be rejected"
        );
    }
}

#[tokio::test]
async fn test_change_password_flow() {
    let app = create_test_server().await;
    let cookie = bootstrap_admin(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/password/")
                .header(header::COOKIE, &cookie)
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from("old-password=secret1&new-password=secret2"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer logs in; the new one does.
    let response = app
        .clone()
        .oneshot(form_request(
            "/login/",
            "email=admin@example.com&password=secret1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(form_request(
            "/login/",
            "email=admin@example.com&password=secret2",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Bearer Tokens
// ============================================================================

async fn issue_bearer_token(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "/auth",
            json!({"email": "admin@example.com", "password": "secret1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    body["token"].as_str().expect("token in response").to_string()
}

#[tokio::test]
async fn test_bearer_issue_and_validate() {
    let app = create_test_server().await;
    bootstrap_admin(&app).await;

    let token = issue_bearer_token(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["email"], "admin@example.com");
}

#[tokio::test]
async fn test_bearer_issue_rejects_bad_credentials() {
    let app = create_test_server().await;
    bootstrap_admin(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "/auth",
            json!({"email": "admin@example.com", "password": "wrong1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_api_gate_accepts_bearer_and_rejects_everything_else() {
    let app = create_test_server().await;
    let session_cookie = bootstrap_admin(&app).await;
    let token = issue_bearer_token(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["email"], "admin@example.com");

    // No Authorization header: 401, no redirect.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A valid session cookie is not a bearer token: no fallback.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header(header::COOKIE, &session_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage token.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header(header::AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_cookies_do_not_open_api_and_vice_versa() {
    let app = create_test_server().await;
    bootstrap_admin(&app).await;
    let token = issue_bearer_token(&app).await;

    // A bearer token in the Authorization header does not open /admin/.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login/");
}

// ============================================================================
// Request ID
// ============================================================================

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_server().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "test-id-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "test-id-123");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
