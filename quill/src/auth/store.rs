//! Credential and token stores.
//!
//! Both stores are thin record stores over the shared pool: create,
//! fetch and delete by key. All synchronization is the pool's own; the
//! managers above never assume exclusive access.

use super::models::{SessionToken, User, UserId};
use chrono::{Duration, Utc};
use rand::Rng;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Store of user credential records.
#[derive(Clone)]
pub struct UserStore {
    pool: Arc<SqlitePool>,
}

impl UserStore {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Number of user records. Used solely to gate bootstrap signup.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users")
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(row.get("n"))
    }

    /// Fetch a user by email. Emails are stored lowercased, so the
    /// lookup is case-insensitive.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(self.pool.as_ref())
        .await
    }

    /// Fetch a user by ID.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await
    }

    /// Create the bootstrap admin, but only while the table is empty.
    ///
    /// The guard is a single statement, so two concurrent first signups
    /// cannot both observe an empty table and both commit: the insert
    /// that loses the race affects zero rows and yields `None`.
    pub async fn create_first(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let email = email.to_lowercase();
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, name, password_hash, created_at)
            SELECT ?1, ?2, ?3, ?4
            WHERE NOT EXISTS (SELECT 1 FROM users)
            "#,
        )
        .bind(&email)
        .bind(name)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_email(&email).await
    }

    /// Replace a user's password hash.
    pub async fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET password_hash = ?1 WHERE id = ?2")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}

/// Store of session token records, keyed by the opaque secret value.
#[derive(Clone)]
pub struct TokenStore {
    pool: Arc<SqlitePool>,
}

impl TokenStore {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Create a session token for a user with the given time to live.
    ///
    /// The value is 32 bytes from the OS CSPRNG, hex-encoded: 256 bits
    /// of entropy against a UNIQUE column, so collision handling is a
    /// store error rather than a retry loop.
    pub async fn create(
        &self,
        user_id: UserId,
        ttl: Duration,
    ) -> Result<SessionToken, sqlx::Error> {
        let mut bytes = [0u8; 32];
        rand::rng().fill(&mut bytes);

        let created_at = Utc::now();
        let token = SessionToken {
            value: hex::encode(bytes),
            user_id,
            created_at,
            expires_at: created_at + ttl,
        };

        sqlx::query(
            r#"
            INSERT INTO tokens (value, user_id, created_at, expires_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&token.value)
        .bind(token.user_id)
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(token)
    }

    /// Fetch a token by its secret value.
    pub async fn get(&self, value: &str) -> Result<Option<SessionToken>, sqlx::Error> {
        sqlx::query_as::<_, SessionToken>(
            r#"
            SELECT value, user_id, created_at, expires_at
            FROM tokens
            WHERE value = ?1
            "#,
        )
        .bind(value)
        .fetch_optional(self.pool.as_ref())
        .await
    }

    /// Invalidate a token by deleting it. Deleting an absent token is
    /// not an error.
    pub async fn delete(&self, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM tokens WHERE value = ?1")
            .bind(value)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    /// Delete all expired tokens, returning how many were removed.
    ///
    /// Optional housekeeping: expiry is checked lazily at read time, so
    /// skipping this changes nothing observable.
    pub async fn purge_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tokens WHERE expires_at < ?1")
            .bind(Utc::now())
            .execute(self.pool.as_ref())
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            log::debug!("purged {purged} expired session tokens");
        }
        Ok(purged)
    }
}
