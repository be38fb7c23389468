//! Password auth: signup validation, argon2 hashing, credential checks.
//!
//! DESIGN
//! ======
//! Validation runs before any database access and yields the message shown
//! to the user. Nickname and email uniqueness are enforced by case-insensitive
//! unique indexes; a violation is mapped back to a specific error by index
//! name.

use std::sync::LazyLock;

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::Rng;
use regex::Regex;
use serde::Deserialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("nickname is already taken")]
    NicknameTaken,
    #[error("email is already registered")]
    EmailTaken,
    #[error("invalid nickname or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// A signup that passed validation, with fields trimmed.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidSignup {
    pub nickname: String,
    pub email: String,
    pub password: String,
}

/// Check a signup form in the order the user sees the messages.
///
/// # Errors
///
/// Returns `AuthError::Validation` with the first failing rule.
pub fn validate_signup(req: &SignupRequest) -> Result<ValidSignup, AuthError> {
    let nickname = req.nickname.trim();
    let email = req.email.trim();
    if nickname.is_empty() || email.is_empty() || req.password.trim().is_empty() || req.confirm_password.trim().is_empty()
    {
        return Err(AuthError::Validation("Please fill in all fields."));
    }
    if req.password != req.confirm_password {
        return Err(AuthError::Validation("Passwords do not match."));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation("Password must be at least 6 characters."));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(AuthError::Validation("Please enter a valid email address."));
    }
    Ok(ValidSignup { nickname: nickname.to_owned(), email: email.to_owned(), password: req.password.trim().to_owned() })
}

/// Hash a password with argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::Hash` if the KDF rejects its inputs.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hash(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Check a password against a stored PHC hash string.
///
/// # Errors
///
/// Returns `InvalidCredentials` on mismatch and `Hash` if the stored value is
/// not a valid PHC string.
pub fn verify_password(password: &str, stored: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored).map_err(|e| AuthError::Hash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|e| match e {
            argon2::password_hash::Error::Password => AuthError::InvalidCredentials,
            other => AuthError::Hash(other.to_string()),
        })
}

/// Create a password user. Returns the new user's id.
pub async fn signup(pool: &PgPool, signup: &ValidSignup) -> Result<Uuid, AuthError> {
    let hash = hash_password(&signup.password)?;
    let row = sqlx::query(
        r"INSERT INTO users (nickname, email, password_hash)
          VALUES ($1, $2, $3)
          RETURNING id",
    )
    .bind(&signup.nickname)
    .bind(&signup.email)
    .bind(hash)
    .fetch_one(pool)
    .await
    .map_err(map_unique_violation)?;
    Ok(row.get("id"))
}

pub(crate) fn map_unique_violation(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db) = &err {
        match db.constraint() {
            Some("users_nickname_lower_idx") => return AuthError::NicknameTaken,
            Some("users_email_lower_idx") => return AuthError::EmailTaken,
            _ => {}
        }
    }
    AuthError::Db(err)
}

/// Verify credentials. `identifier` is an email when it contains `@`,
/// otherwise a nickname; both match case-insensitively.
pub async fn login(pool: &PgPool, identifier: &str, password: &str) -> Result<Uuid, AuthError> {
    let identifier = identifier.trim();
    let password = password.trim();
    if identifier.is_empty() || password.is_empty() {
        return Err(AuthError::Validation("Please enter your nickname and password."));
    }

    let sql = if identifier.contains('@') {
        "SELECT id, password_hash FROM users WHERE lower(email) = lower($1)"
    } else {
        "SELECT id, password_hash FROM users WHERE lower(nickname) = lower($1)"
    };
    let row = sqlx::query(sql).bind(identifier).fetch_optional(pool).await?;

    let Some(row) = row else {
        return Err(AuthError::InvalidCredentials);
    };
    let stored: Option<String> = row.get("password_hash");
    let stored = stored.ok_or(AuthError::InvalidCredentials)?;
    verify_password(password, &stored)?;
    Ok(row.get("id"))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
