//! Authentication data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User ID type
pub type UserId = i64;

/// User model
///
/// Created only through the bootstrap signup flow; the password hash is
/// a PHC-format Argon2id string and never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// One authenticated browser session.
///
/// `value` is the opaque secret half of the session cookie pair and the
/// store's lookup key. Tokens are never mutated after creation; they
/// are invalidated by deletion or by natural expiry, checked lazily at
/// read time.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionToken {
    pub value: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Whether the token is still valid. This check is the single
    /// source of truth for session validity.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Validity at a given instant. Expiry is inclusive: the token is
    /// still valid at exactly `expires_at` and invalid any tick after.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        at <= self.expires_at
    }
}

/// Bootstrap signup submission.
///
/// Field names follow the signup form: `re-password` is the
/// confirmation field and `remember-me` carries the "on" sentinel when
/// the checkbox is set.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(rename = "re-password")]
    pub re_password: String,
    #[serde(rename = "remember-me")]
    pub remember_me: Option<String>,
}

impl SignupRequest {
    pub fn remember_me_requested(&self) -> bool {
        self.remember_me.as_deref() == Some("on")
    }
}

/// Login form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "remember-me")]
    pub remember_me: Option<String>,
}

impl LoginRequest {
    pub fn remember_me_requested(&self) -> bool {
        self.remember_me.as_deref() == Some("on")
    }
}

/// JWT claims for API bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BearerClaims {
    pub sub: UserId, // User ID
    pub exp: i64,    // Expiration timestamp
    pub iat: i64,    // Issued at timestamp
}
