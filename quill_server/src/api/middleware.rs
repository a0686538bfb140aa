//! Authentication middleware for the two protected route classes.
//!
//! Each gate is bound to exactly one scheme. `session_auth` reads the
//! `token-user` / `token-value` cookie pair and redirects browsers to
//! `/login/` on any failure; `bearer_auth` reads the `Authorization`
//! header and answers `401`. Neither gate falls back to the other
//! scheme. Both inject the resolved [`User`] into request extensions,
//! so downstream handlers extract it with `Extension<User>` and never
//! re-validate.

use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use quill::auth::{AuthError, User, UserId};

use super::{AppState, cookies};
use crate::logging::log_security_event;

/// Session gate for `/admin/...` routes.
///
/// Requires both cookies of the pair to be present, the `token-user`
/// value to parse as a user ID, and the token store to confirm an
/// unexpired token owned by that user. Any failure redirects to the
/// login page rather than answering with a status code, since the
/// clients behind this gate are browsers.
pub async fn session_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();

    let user_id = cookies::cookie_value(headers, cookies::TOKEN_USER)
        .and_then(|raw| raw.parse::<UserId>().ok());
    let token_value = cookies::cookie_value(headers, cookies::TOKEN_VALUE);

    let (Some(user_id), Some(token_value)) = (user_id, token_value) else {
        return Redirect::to("/login/").into_response();
    };

    match state.sessions.validate(user_id, &token_value).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(AuthError::Database(err)) => {
            tracing::error!("session validation store failure: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(err) => {
            if matches!(err, AuthError::SessionNotFound) {
                log_security_event("session_rejected", "Cookie pair failed validation");
            }
            Redirect::to("/login/").into_response()
        }
    }
}

/// Bearer gate for `/api/...` routes.
///
/// Validates the signed token from the `Authorization: Bearer <token>`
/// header without touching the token store, then resolves the `sub`
/// claim against the credential store so a token outliving its user
/// does not authenticate.
pub async fn bearer_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let claims = state.bearer.validate(token).map_err(|_| {
        log_security_event("bearer_rejected", "Bearer token failed validation");
        StatusCode::UNAUTHORIZED
    })?;

    let user = state
        .users
        .get_by_id(claims.sub)
        .await
        .map_err(|err| {
            tracing::error!("bearer user lookup failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
