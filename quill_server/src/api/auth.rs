//! Authentication HTTP handlers.
//!
//! Browser endpoints (login, signup, logout) speak the cookie-pair
//! session scheme; `POST /auth` / `GET /auth` issue and validate the
//! stateless bearer tokens used by API clients. All endpoints answer
//! with the `{"status": "success"|"error", "msg": ...}` envelope.

use axum::{
    Form, Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Redirect, Response},
};
use quill::auth::{AuthError, LoginRequest, SignupRequest, User};
use serde::{Deserialize, Serialize};

use super::{AppState, cookies};
use crate::logging::log_security_event;

/// Structured success/error payload.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success",
            msg: None,
        }
    }

    pub fn error(msg: String) -> Self {
        Self {
            status: "error",
            msg: Some(msg),
        }
    }
}

/// Map an auth failure onto a status code and a client-safe body.
///
/// Validation failures keep their specific message (400); credential
/// and signup-gate failures are 403 with the generic message; store and
/// JWT failures are logged with detail and surfaced as an opaque 500.
pub(crate) fn error_response(err: AuthError) -> (StatusCode, Json<StatusResponse>) {
    let status = if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        match &err {
            AuthError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AuthError::Database(_) | AuthError::HashingFailed => {
                tracing::error!("auth store failure: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::FORBIDDEN,
        }
    };
    (status, Json(StatusResponse::error(err.client_message())))
}

/// `GET /login/` - login page.
///
/// Template rendering lives outside this subsystem; the route exists as
/// the redirect target for rejected sessions.
pub async fn login_page() -> impl IntoResponse {
    (StatusCode::OK, "Log in")
}

/// `POST /login/` - authenticate and set the session cookie pair.
pub async fn login(
    State(state): State<AppState>,
    Form(request): Form<LoginRequest>,
) -> Response {
    let remember_me = request.remember_me_requested();

    match state.sessions.login(request).await {
        Ok((_user, token)) => (
            cookies::set_session_cookies(&token, remember_me),
            Json(StatusResponse::success()),
        )
            .into_response(),
        Err(err) => {
            if matches!(err, AuthError::InvalidCredentials) {
                log_security_event("failed_login", "Login with invalid credentials");
            }
            error_response(err).into_response()
        }
    }
}

/// `GET /signup/` - signup page, visible only while no admin exists.
pub async fn signup_page(State(state): State<AppState>) -> Response {
    match state.sessions.signup_open().await {
        Ok(true) => (StatusCode::OK, "Sign up").into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// `POST /signup/` - one-time bootstrap signup.
///
/// On success the new admin is logged in immediately: the session
/// cookie pair is set exactly as on login.
pub async fn signup(
    State(state): State<AppState>,
    Form(request): Form<SignupRequest>,
) -> Response {
    let remember_me = request.remember_me_requested();

    match state.sessions.signup(request).await {
        Ok((_user, token)) => (
            cookies::set_session_cookies(&token, remember_me),
            Json(StatusResponse::success()),
        )
            .into_response(),
        Err(err) => {
            if matches!(err, AuthError::SignupClosed) {
                log_security_event("signup_probe", "Signup attempted after bootstrap");
            }
            error_response(err).into_response()
        }
    }
}

/// `GET /logout/` - invalidate the session and erase the cookie pair.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(value) = cookies::cookie_value(&headers, cookies::TOKEN_VALUE) {
        if let Err(err) = state.sessions.logout(&value).await {
            tracing::error!("failed to invalidate session on logout: {err}");
        }
    }

    (cookies::clear_session_cookies(), Redirect::to("/login/")).into_response()
}

/// Credentials payload for bearer token issuance.
#[derive(Debug, Deserialize)]
pub struct ApiLoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub status: &'static str,
    pub token: String,
}

/// `POST /auth` - issue a bearer token from email/password.
pub async fn api_login(
    State(state): State<AppState>,
    Json(payload): Json<ApiLoginPayload>,
) -> Response {
    let user = match state
        .sessions
        .verify_credentials(&payload.email, &payload.password)
        .await
    {
        Ok(user) => user,
        Err(err) => {
            if matches!(err, AuthError::InvalidCredentials) {
                log_security_event("failed_login", "Bearer issuance with invalid credentials");
            }
            return error_response(err).into_response();
        }
    };

    match state.bearer.issue(&user) {
        Ok(token) => Json(TokenResponse {
            status: "success",
            token,
        })
        .into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// `GET /auth` - validate a bearer token and return its user.
pub async fn api_validate(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(StatusResponse::error("Missing bearer token".to_string())),
        )
            .into_response();
    };

    let claims = match state.bearer.validate(token) {
        Ok(claims) => claims,
        Err(err) => return error_response(err).into_response(),
    };

    match state.users.get_by_id(claims.sub).await {
        Ok(Some(user)) => Json(UserResponse::from(&user)).into_response(),
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(StatusResponse::error("Authentication failed".to_string())),
        )
            .into_response(),
        Err(err) => error_response(err.into()).into_response(),
    }
}

/// Public view of a user record.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}
