//! Bearer token manager for API clients.
//!
//! Issues and validates short-lived signed tokens (HS256 JWTs) carrying
//! the user ID and an expiry claim. Validation is stateless: signature
//! and expiry only, no store lookup. The flip side is that a bearer
//! token cannot be revoked before its natural expiry; that is an
//! accepted property of this scheme, not a bug.

use super::{
    errors::AuthResult,
    models::{BearerClaims, User},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// Bearer token manager
///
/// Holds the signing key material for the process lifetime. The secret
/// is handed in at construction rather than read from ambient state, so
/// tests can supply ephemeral keys.
pub struct BearerTokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl BearerTokenManager {
    /// Create a new bearer token manager
    ///
    /// # Arguments
    ///
    /// * `secret` - HMAC signing secret, process-wide configuration
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(1),
        }
    }

    /// Issue a signed token for a user.
    pub fn issue(&self, user: &User) -> AuthResult<String> {
        let now = Utc::now();
        let claims = BearerClaims {
            sub: user.id,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// Fails for tokens signed with a different key, expired tokens,
    /// and structurally malformed tokens.
    pub fn validate(&self, token: &str) -> AuthResult<BearerClaims> {
        let token_data =
            decode::<BearerClaims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}
