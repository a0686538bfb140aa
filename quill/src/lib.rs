//! # Quill
//!
//! The backend library for the Quill content-management system.
//!
//! Quill is a single-admin blog engine. Most of its HTTP surface is
//! routine CRUD plumbing; the designed core of this library is the
//! authentication subsystem, which serves two different client types
//! behind one credential store:
//!
//! - **Browser sessions**: opaque server-stored tokens carried by a
//!   `token-user` / `token-value` cookie pair, with a "remember me"
//!   option extending validity from 1 hour to 3 days.
//! - **API clients**: stateless, self-verifying signed bearer tokens
//!   that never touch the token store.
//!
//! Account creation is restricted to a one-time bootstrap flow: exactly
//! one admin may sign up while the credential store is empty, and the
//! flow closes permanently afterwards.
//!
//! ## Core Modules
//!
//! - [`auth`]: credential verification, session and bearer token
//!   management, signup bootstrap
//! - [`db`]: SQLite connection pooling and schema bootstrap

/// Authentication: credential store, session tokens, bearer tokens.
pub mod auth;
pub use auth::{
    AuthError, AuthResult, BearerClaims, BearerTokenManager, LoginRequest, SessionManager,
    SessionToken, SignupRequest, TokenStore, User, UserId, UserStore,
};

/// Database connection pooling and utilities.
pub mod db;
pub use db::{Database, DatabaseConfig};
