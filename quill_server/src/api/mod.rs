//! HTTP API for the Quill server.
//!
//! # Architecture
//!
//! Two authentication schemes protect two statically separated route
//! classes; the gate never falls back from one scheme to the other:
//!
//! - **Admin pages** (`/admin/...`): browser sessions carried by the
//!   `token-user` / `token-value` cookie pair, validated against the
//!   token store. Failures redirect to `/login/`.
//! - **API endpoints** (`/api/...`): stateless bearer tokens in the
//!   `Authorization` header. Failures answer `401`.
//!
//! # Endpoints Overview
//!
//! ## Public
//! - `GET  /health` - Health check
//! - `GET  /login/` - Login page
//! - `POST /login/` - Login with credentials, sets the cookie pair
//! - `GET  /signup/` - Signup page, hidden once an admin exists
//! - `POST /signup/` - One-time bootstrap signup
//! - `GET  /logout/` - Erase cookies, invalidate the session
//! - `POST /auth`    - Issue a bearer token from credentials
//! - `GET  /auth`    - Validate a bearer token
//!
//! ## Session-gated
//! - `GET  /admin/`          - Current admin user
//! - `POST /admin/password/` - Change password
//!
//! ## Bearer-gated
//! - `GET  /api/me` - User resolved from the bearer token

pub mod admin;
pub mod auth;
pub mod cookies;
pub mod middleware;
pub mod request_id;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use quill::auth::{BearerTokenManager, SessionManager, UserStore};
use serde_json::json;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request (cheap due to Arc wrappers).
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub bearer: Arc<BearerTokenManager>,
    pub users: Arc<UserStore>,
    pub pool: Arc<SqlitePool>,
}

/// Create the complete API router with all endpoints and middleware.
///
/// Each protected route class is bound to exactly one authentication
/// scheme at registration time; handlers behind a gate read the
/// resolved identity from request extensions and never re-validate.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/login/", get(auth::login_page).post(auth::login))
        .route("/signup/", get(auth::signup_page).post(auth::signup))
        .route("/logout/", get(auth::logout))
        .route("/auth", post(auth::api_login).get(auth::api_validate));

    let admin_routes = Router::new()
        .route("/admin/", get(admin::current_user))
        .route("/admin/password/", post(admin::change_password))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_auth,
        ));

    let api_routes = Router::new()
        .route("/api/me", get(users::me))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::bearer_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .merge(api_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the database answers, `503` otherwise.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = sqlx::query("SELECT 1")
        .fetch_one(&*state.pool)
        .await
        .is_ok();

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
