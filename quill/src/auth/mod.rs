//! Authentication module providing the signup bootstrap, browser
//! sessions, and stateless API bearer tokens.
//!
//! This module implements:
//! - Argon2id password hashing with a server-side pepper
//! - Opaque session tokens (256-bit random values) stored server-side,
//!   carried by the `token-user` / `token-value` cookie pair
//! - A "remember me" login variant extending session validity from
//!   1 hour to 3 days
//! - Stateless HS256 bearer tokens for API clients
//! - A one-shot signup bootstrap: exactly one admin account may be
//!   created while the user table is empty, enforced atomically at the
//!   store layer
//!
//! ## Example
//!
//! ```no_run
//! use quill::auth::{SessionManager, SignupRequest};
//! use quill::db::{Database, DatabaseConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::default_dev()).await?;
//!     let sessions = SessionManager::new(
//!         Arc::new(db.pool().clone()),
//!         "secret_pepper".to_string(),
//!     );
//!
//!     let request = SignupRequest {
//!         email: "admin@example.com".to_string(),
//!         name: "Admin".to_string(),
//!         password: "secret1".to_string(),
//!         re_password: "secret1".to_string(),
//!         remember_me: None,
//!     };
//!
//!     let (user, token) = sessions.signup(request).await?;
//!     println!("Bootstrapped admin {} with session {}", user.email, token.value);
//!     Ok(())
//! }
//! ```

pub mod bearer;
pub mod errors;
pub mod manager;
pub mod models;
pub mod store;

pub use bearer::BearerTokenManager;
pub use errors::{AuthError, AuthResult};
pub use manager::SessionManager;
pub use models::{BearerClaims, LoginRequest, SessionToken, SignupRequest, User, UserId};
pub use store::{TokenStore, UserStore};
