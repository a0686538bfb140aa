//! Quill content-management backend server.
//!
//! Wires the authentication subsystem (cookie-pair browser sessions and
//! stateless bearer tokens over one credential store) into an HTTP
//! server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use pico_args::Arguments;
use quill::{
    auth::{BearerTokenManager, SessionManager, UserStore},
    db::Database,
};
use quill_server::{api, config::ServerConfig, logging};

const HELP: &str = "\
Run the Quill content-management backend server

USAGE:
  quill_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8000]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or sqlite://quill.db?mode=rwc]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8000)
  DATABASE_URL             SQLite connection string
  JWT_SECRET               Bearer token signing secret (required)
  PASSWORD_PEPPER          Password hashing pepper (required)
  (See .env file for all configuration options)
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.database_url)?;

    tracing::info!("Connecting to database: {}", config.database.database_url);
    let db = Database::new(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
    tracing::info!("Database connected successfully");

    let pool = Arc::new(db.pool().clone());
    let sessions = Arc::new(SessionManager::new(
        pool.clone(),
        config.security.password_pepper.clone(),
    ));
    let bearer = Arc::new(BearerTokenManager::new(&config.security.jwt_secret));
    let users = Arc::new(UserStore::new(pool.clone()));

    if sessions.signup_open().await? {
        tracing::info!("No admin account yet; signup is open at /signup/");
    }

    let state = api::AppState {
        sessions,
        bearer,
        users,
        pool,
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    tracing::info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    tracing::info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
