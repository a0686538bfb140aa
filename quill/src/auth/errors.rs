//! Authentication error types.

use thiserror::Error;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// Bad credentials: unknown email or wrong password. A single
    /// variant on purpose, so responses cannot be used to enumerate
    /// which factor was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Session token not found, or owned by a different user
    #[error("Session not found")]
    SessionNotFound,

    /// Session token past its expiry
    #[error("Session expired")]
    SessionExpired,

    /// Signup attempted after the bootstrap admin exists
    #[error("Signup is closed")]
    SignupClosed,

    /// JWT token error
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Email does not match the address grammar
    #[error("Invalid email address.")]
    InvalidEmail,

    /// Display name shorter than 3 characters
    #[error("Name is too short.")]
    NameTooShort,

    /// Password shorter than 5 characters
    #[error("Password is too short.")]
    PasswordTooShort,

    /// Password longer than 20 characters
    #[error("Password is too long.")]
    PasswordTooLong,

    /// Password confirmation mismatch
    #[error("Password does not match.")]
    PasswordMismatch,
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Database and JWT errors are sanitized to prevent information
    /// disclosure about the internal system structure.
    pub fn client_message(&self) -> String {
        match self {
            // Sanitize database errors - don't expose SQL details
            AuthError::Database(_) | AuthError::HashingFailed => {
                "Internal server error".to_string()
            }
            // Sanitize JWT errors - don't expose token structure
            AuthError::Jwt(_) => "Authentication failed".to_string(),
            // All other errors are safe to expose
            _ => self.to_string(),
        }
    }

    /// Whether this is a user-correctable signup validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidEmail
                | AuthError::NameTooShort
                | AuthError::PasswordTooShort
                | AuthError::PasswordTooLong
                | AuthError::PasswordMismatch
        )
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
