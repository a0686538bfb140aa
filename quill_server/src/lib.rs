//! HTTP server for the Quill content-management backend.
//!
//! Exposes the authentication surface: browser login/signup/logout with
//! cookie-pair sessions, bearer-token issue/validate for API clients,
//! and the middleware gates protecting the admin and API route classes.

pub mod api;
pub mod config;
pub mod logging;
