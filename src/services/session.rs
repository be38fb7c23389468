//! Session tokens and one-time confirmation tickets.
//!
//! ARCHITECTURE
//! ============
//! HTTP auth uses long-lived random session tokens stored in a cookie.
//! Destructive actions use short-lived tickets that are stored hashed and
//! consumed with `DELETE ... RETURNING`, so each ticket works exactly once.

use std::fmt::Write;
use std::time::Duration;

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Generate a 16-byte hex confirmation ticket.
#[must_use]
pub(crate) fn generate_ticket() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// SHA-256 of a ticket, hex encoded. Only hashes are stored.
#[must_use]
pub(crate) fn hash_ticket(ticket: &str) -> String {
    bytes_to_hex(&Sha256::digest(ticket.trim().as_bytes()))
}

/// User row returned from session validation.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub nickname: String,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub is_public: bool,
    /// `"google"` or `"password"`.
    pub auth_method: String,
}

/// Create a session for the given user, returning the token.
pub async fn create_session(pool: &PgPool, user_id: Uuid, ttl_days: i64) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query(
        r"INSERT INTO sessions (token, user_id, expires_at)
          VALUES ($1, $2, now() + make_interval(days => $3))",
    )
    .bind(&token)
    .bind(user_id)
    .bind(i32::try_from(ttl_days).unwrap_or(i32::MAX))
    .execute(pool)
    .await?;
    Ok(token)
}

/// Validate a session token and return the associated user.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT
              u.id,
              u.nickname,
              u.email,
              u.photo_url,
              u.is_public,
              CASE WHEN u.google_sub IS NOT NULL THEN 'google' ELSE 'password' END AS auth_method
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SessionUser {
        id: r.get("id"),
        nickname: r.get("nickname"),
        email: r.get("email"),
        photo_url: r.get("photo_url"),
        is_public: r.get("is_public"),
        auth_method: r.get("auth_method"),
    }))
}

/// Delete a session by token.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Drop expired sessions and delete tickets. Returns the number removed.
pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let sessions = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
        .execute(pool)
        .await?;
    let tickets = sqlx::query("DELETE FROM journal_delete_tickets WHERE expires_at <= now()")
        .execute(pool)
        .await?;
    Ok(sessions.rows_affected() + tickets.rows_affected())
}

/// Spawn the hourly expiry sweep. Returns a handle for shutdown.
pub fn spawn_purge_task(pool: PgPool) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(PURGE_INTERVAL);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tick.tick().await;
            match purge_expired(&pool).await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "purged expired sessions and tickets"),
                Err(e) => tracing::warn!(error = %e, "expiry sweep failed"),
            }
        }
    })
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
