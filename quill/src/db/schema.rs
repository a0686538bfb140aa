//! Schema bootstrap.
//!
//! Tables are created on startup with `IF NOT EXISTS`, so applying the
//! schema is idempotent and a fresh database file needs no separate
//! migration step.

use sqlx::SqlitePool;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL
)
"#;

const CREATE_TOKENS: &str = r#"
CREATE TABLE IF NOT EXISTS tokens (
    value      TEXT PRIMARY KEY,
    user_id    INTEGER NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
)
"#;

/// Apply the schema to a freshly opened pool.
pub(crate) async fn apply(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_USERS).execute(pool).await?;
    sqlx::query(CREATE_TOKENS).execute(pool).await?;
    Ok(())
}
