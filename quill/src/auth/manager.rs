//! Session manager implementation.

use super::{
    errors::{AuthError, AuthResult},
    models::{LoginRequest, SessionToken, SignupRequest, User, UserId},
    store::{TokenStore, UserStore},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Duration;
use regex::Regex;
use sqlx::SqlitePool;
use std::sync::{Arc, LazyLock};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Session manager: credential verification, bootstrap signup, and the
/// lifecycle of server-stored browser session tokens.
#[derive(Clone)]
pub struct SessionManager {
    users: UserStore,
    tokens: TokenStore,
    pepper: String,
    session_ttl: Duration,
    remember_me_ttl: Duration,
}

impl SessionManager {
    /// Create a new session manager
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `pepper` - Server-side pepper for password hashing
    pub fn new(pool: Arc<SqlitePool>, pepper: String) -> Self {
        Self {
            users: UserStore::new(pool.clone()),
            tokens: TokenStore::new(pool),
            pepper,
            session_ttl: Duration::hours(1),
            remember_me_ttl: Duration::days(3),
        }
    }

    /// Whether the bootstrap signup flow is still open, i.e. no user
    /// record exists yet.
    pub async fn signup_open(&self) -> AuthResult<bool> {
        Ok(self.users.count().await? == 0)
    }

    /// Bootstrap signup: create the first (and only) admin account and
    /// log it in.
    ///
    /// Validation is ordered and short-circuits on the first failure:
    /// email grammar, name length, password length bounds, password
    /// confirmation. The create itself is a guarded single-statement
    /// insert, so a concurrent first signup that loses the race gets
    /// `SignupClosed` even after passing the early emptiness check.
    ///
    /// # Errors
    ///
    /// * `AuthError::SignupClosed` - an admin account already exists
    /// * `AuthError::InvalidEmail` / `NameTooShort` / `PasswordTooShort`
    ///   / `PasswordTooLong` / `PasswordMismatch` - validation failures
    pub async fn signup(&self, request: SignupRequest) -> AuthResult<(User, SessionToken)> {
        if !self.signup_open().await? {
            return Err(AuthError::SignupClosed);
        }

        validate_signup(&request)?;

        let password_hash = self.hash_password(&request.password)?;
        let user = self
            .users
            .create_first(&request.email, &request.name, &password_hash)
            .await?
            .ok_or(AuthError::SignupClosed)?;

        log::info!("bootstrap admin created: {}", user.email);

        let token = self
            .tokens
            .create(user.id, self.token_ttl(request.remember_me_requested()))
            .await?;
        Ok((user, token))
    }

    /// Verify an email/password pair against the credential store.
    ///
    /// An unknown email and a wrong password both map to the same
    /// generic `InvalidCredentials`, so the response cannot be used to
    /// probe which accounts exist.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> AuthResult<User> {
        let user = match self.users.get_by_email(email).await? {
            Some(user) => user,
            None => {
                log::warn!("login failed: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        self.verify_password(password, &user.password_hash)
            .map_err(|err| {
                log::warn!("login failed for user {}: bad password", user.id);
                err
            })?;

        Ok(user)
    }

    /// Login with email and password, creating a session token.
    ///
    /// The token lives 3 days when "remember me" was requested and
    /// 1 hour otherwise.
    pub async fn login(&self, request: LoginRequest) -> AuthResult<(User, SessionToken)> {
        let user = self
            .verify_credentials(&request.email, &request.password)
            .await?;

        let token = self
            .tokens
            .create(user.id, self.token_ttl(request.remember_me_requested()))
            .await?;
        Ok((user, token))
    }

    /// Validate a session cookie pair and resolve the owning user.
    ///
    /// Fails if the token is unknown, expired, or belongs to a user
    /// other than the one the `token-user` cookie claims. Expired
    /// tokens are deleted on read.
    pub async fn validate(&self, user_id: UserId, token_value: &str) -> AuthResult<User> {
        let token = self
            .tokens
            .get(token_value)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if !token.is_valid() {
            self.tokens.delete(token_value).await?;
            return Err(AuthError::SessionExpired);
        }

        if token.user_id != user_id {
            log::warn!(
                "cookie pair mismatch: token owned by {} but cookie claims {}",
                token.user_id,
                user_id
            );
            return Err(AuthError::SessionNotFound);
        }

        self.users
            .get_by_id(token.user_id)
            .await?
            .ok_or(AuthError::SessionNotFound)
    }

    /// Logout by invalidating the session token server-side. The cookie
    /// erasure happens at the HTTP layer; deleting the token here
    /// prevents replay of a stolen pair until natural expiry.
    pub async fn logout(&self, token_value: &str) -> AuthResult<()> {
        self.tokens.delete(token_value).await?;
        Ok(())
    }

    /// Change a user's password after verifying the current one. The
    /// new password is held to the same length policy as signup.
    pub async fn change_password(
        &self,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        self.verify_password(old_password, &user.password_hash)?;
        validate_password(new_password)?;

        let password_hash = self.hash_password(new_password)?;
        self.users.update_password(user_id, &password_hash).await?;
        Ok(())
    }

    fn token_ttl(&self, remember_me: bool) -> Duration {
        if remember_me {
            self.remember_me_ttl
        } else {
            self.session_ttl
        }
    }

    /// Hash password with Argon2id + pepper
    fn hash_password(&self, password: &str) -> AuthResult<String> {
        let peppered = format!("{}{}", password, self.pepper);
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        Ok(argon2
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Verify password against hash
    fn verify_password(&self, password: &str, hash: &str) -> AuthResult<()> {
        let peppered = format!("{}{}", password, self.pepper);
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
        let argon2 = Argon2::default();

        argon2
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    }
}

/// Ordered signup validation; the first failing rule wins.
fn validate_signup(request: &SignupRequest) -> AuthResult<()> {
    if !EMAIL_PATTERN.is_match(&request.email) {
        return Err(AuthError::InvalidEmail);
    }
    if request.name.chars().count() < 3 {
        return Err(AuthError::NameTooShort);
    }
    validate_password(&request.password)?;
    if request.password != request.re_password {
        return Err(AuthError::PasswordMismatch);
    }
    Ok(())
}

fn validate_password(password: &str) -> AuthResult<()> {
    let len = password.chars().count();
    if len < 5 {
        return Err(AuthError::PasswordTooShort);
    }
    if len > 20 {
        return Err(AuthError::PasswordTooLong);
    }
    Ok(())
}
