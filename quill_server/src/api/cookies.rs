//! Session cookie pair handling.
//!
//! The pair is `token-user` (the user ID, cleartext) and `token-value`
//! (the token's secret). Both are HttpOnly. With "remember me" the
//! cookies carry a Max-Age matching the token's 3-day TTL; without it
//! they are browser-session cookies while the stored token still
//! expires server-side after an hour - the server-side check stays the
//! single source of truth, so a cookie outliving its token simply
//! fails validation.

use axum::http::{HeaderMap, HeaderName, header::SET_COOKIE};
use axum::response::AppendHeaders;
use quill::auth::SessionToken;

/// Cookie carrying the user ID.
pub const TOKEN_USER: &str = "token-user";
/// Cookie carrying the session token's secret value.
pub const TOKEN_VALUE: &str = "token-value";

/// Build the Set-Cookie headers for a fresh session.
pub fn set_session_cookies(
    token: &SessionToken,
    remember_me: bool,
) -> AppendHeaders<[(HeaderName, String); 2]> {
    let max_age = remember_me.then(|| (token.expires_at - token.created_at).num_seconds());
    AppendHeaders([
        (SET_COOKIE, cookie(TOKEN_USER, &token.user_id.to_string(), max_age)),
        (SET_COOKIE, cookie(TOKEN_VALUE, &token.value, max_age)),
    ])
}

/// Build the Set-Cookie headers that erase the pair client-side.
///
/// A zero or absent Max-Age means browser-session lifetime, so erasure
/// uses a negative value: already expired, delete immediately.
pub fn clear_session_cookies() -> AppendHeaders<[(HeaderName, String); 2]> {
    AppendHeaders([
        (SET_COOKIE, cookie(TOKEN_USER, "", Some(-3600))),
        (SET_COOKIE, cookie(TOKEN_VALUE, "", Some(-3600))),
    ])
}

fn cookie(name: &str, value: &str, max_age: Option<i64>) -> String {
    match max_age {
        Some(secs) => format!("{name}={value}; Path=/; HttpOnly; Max-Age={secs}"),
        None => format!("{name}={value}; Path=/; HttpOnly"),
    }
}

/// Extract a cookie value from the Cookie header.
///
/// Handles both quoted and unquoted values.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get("cookie")?.to_str().ok()?;

    for cookie in cookies.split(';') {
        let cookie = cookie.trim();

        if let Some(value) = cookie.strip_prefix(name) {
            let Some(value) = value.strip_prefix('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            let value = if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
                &value[1..value.len() - 1]
            } else {
                value
            };

            return Some(value.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};

    fn token() -> SessionToken {
        let created_at = Utc::now();
        SessionToken {
            value: "cafe".repeat(16),
            user_id: 1,
            created_at,
            expires_at: created_at + Duration::days(3),
        }
    }

    fn header_map(cookie_line: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_str(cookie_line).unwrap());
        headers
    }

    #[test]
    fn test_remember_me_cookies_carry_max_age() {
        let AppendHeaders([(_, user), (_, value)]) = set_session_cookies(&token(), true);
        assert!(user.contains("token-user=1"));
        assert!(user.contains("Max-Age=259200"));
        assert!(value.contains("Max-Age=259200"));
        assert!(value.contains("HttpOnly"));
    }

    #[test]
    fn test_session_cookies_have_no_max_age() {
        let AppendHeaders([(_, user), (_, value)]) = set_session_cookies(&token(), false);
        assert!(!user.contains("Max-Age"));
        assert!(!value.contains("Max-Age"));
    }

    #[test]
    fn test_clear_cookies_use_negative_max_age() {
        let AppendHeaders([(_, user), (_, value)]) = clear_session_cookies();
        assert!(user.starts_with("token-user=;"));
        // Zero would mean browser-session lifetime; erasure must be
        // strictly negative.
        assert!(user.contains("Max-Age=-3600"));
        assert!(value.contains("Max-Age=-3600"));
    }

    #[test]
    fn test_cookie_value_parses_the_pair() {
        let headers = header_map("token-user=7; token-value=abc123");
        assert_eq!(cookie_value(&headers, TOKEN_USER).as_deref(), Some("7"));
        assert_eq!(cookie_value(&headers, TOKEN_VALUE).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_cookie_value_handles_quotes_and_absence() {
        let headers = header_map(r#"token-value="abc123""#);
        assert_eq!(cookie_value(&headers, TOKEN_VALUE).as_deref(), Some("abc123"));
        assert_eq!(cookie_value(&headers, TOKEN_USER), None);
    }
}
