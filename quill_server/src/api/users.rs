//! Bearer-gated user handlers.

use axum::{Extension, Json};
use quill::auth::User;

use super::auth::UserResponse;

/// `GET /api/me` - the user resolved from the bearer token.
pub async fn me(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
