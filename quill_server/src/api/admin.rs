//! Session-gated admin handlers.
//!
//! These routes sit behind [`super::middleware::session_auth`], which
//! injects the resolved [`User`] into request extensions.

use axum::{
    Extension, Form, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use quill::auth::User;
use serde::Deserialize;

use super::{
    AppState,
    auth::{StatusResponse, UserResponse, error_response},
};

/// `GET /admin/` - the admin user resolved from the session.
pub async fn current_user(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// Password change form.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    #[serde(rename = "old-password")]
    pub old_password: String,
    #[serde(rename = "new-password")]
    pub new_password: String,
}

/// `POST /admin/password/` - change the admin password.
///
/// Requires the current password; the new one is held to the signup
/// length policy. Existing session tokens stay valid.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Form(form): Form<ChangePasswordForm>,
) -> Response {
    match state
        .sessions
        .change_password(user.id, &form.old_password, &form.new_password)
        .await
    {
        Ok(()) => Json(StatusResponse::success()).into_response(),
        Err(err) => error_response(err).into_response(),
    }
}
