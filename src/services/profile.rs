//! User profiles, visibility, and nickname search.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::auth::{AuthError, map_unique_violation};

pub const SEARCH_LIMIT: i64 = 20;
const MAX_NICKNAME_CHARS: usize = 40;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("user not found")]
    NotFound,
    #[error("{0}")]
    Validation(&'static str),
    #[error("nickname is already taken")]
    NicknameTaken,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub nickname: String,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub is_public: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub journal_count: i64,
    pub last_journal_date: Option<Date>,
}

/// Partial update; absent fields are left unchanged. An empty `photoUrl`
/// clears the photo.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub nickname: Option<String>,
    pub photo_url: Option<String>,
    pub is_public: Option<bool>,
}

/// One row of the user search results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub nickname: String,
    pub photo_url: Option<String>,
    pub journal_count: i64,
    pub last_journal_date: Option<Date>,
}

const PROFILE_SELECT: &str = r"SELECT
        u.id, u.nickname, u.email, u.photo_url, u.is_public, u.created_at,
        (SELECT COUNT(*) FROM investment_journals j WHERE j.user_id = u.id) AS journal_count,
        (SELECT MAX(j.date) FROM investment_journals j WHERE j.user_id = u.id) AS last_journal_date
    FROM users u";

fn profile_from_row(row: &PgRow) -> Profile {
    Profile {
        id: row.get("id"),
        nickname: row.get("nickname"),
        email: row.get("email"),
        photo_url: row.get("photo_url"),
        is_public: row.get("is_public"),
        created_at: row.get("created_at"),
        journal_count: row.get("journal_count"),
        last_journal_date: row.get("last_journal_date"),
    }
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Profile, ProfileError> {
    let row = sqlx::query(&format!("{PROFILE_SELECT} WHERE u.id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(profile_from_row).ok_or(ProfileError::NotFound)
}

/// Another user's profile, visible only when they made it public. Email is
/// never exposed to other users.
pub async fn get_public_profile(pool: &PgPool, viewer: Uuid, user_id: Uuid) -> Result<Profile, ProfileError> {
    let mut profile = get_profile(pool, user_id).await?;
    if profile.id != viewer {
        if !profile.is_public {
            return Err(ProfileError::NotFound);
        }
        profile.email = None;
    }
    Ok(profile)
}

/// Trim and check a requested nickname.
///
/// # Errors
///
/// Returns `Validation` when blank, too long, or containing `@`.
pub fn validate_nickname(raw: &str) -> Result<String, ProfileError> {
    let nickname = raw.trim();
    if nickname.is_empty() {
        return Err(ProfileError::Validation("Nickname cannot be empty."));
    }
    if nickname.chars().count() > MAX_NICKNAME_CHARS {
        return Err(ProfileError::Validation("Nickname must be 40 characters or fewer."));
    }
    if nickname.contains('@') {
        return Err(ProfileError::Validation("Nickname cannot contain '@'."));
    }
    Ok(nickname.to_owned())
}

pub async fn update_profile(pool: &PgPool, user_id: Uuid, update: ProfileUpdate) -> Result<Profile, ProfileError> {
    let nickname = update.nickname.as_deref().map(validate_nickname).transpose()?;
    let photo_url = update.photo_url.map(|p| p.trim().to_owned());

    let result = sqlx::query(
        r"UPDATE users SET
              nickname = COALESCE($2, nickname),
              photo_url = CASE WHEN $3::text IS NULL THEN photo_url ELSE NULLIF($3, '') END,
              is_public = COALESCE($4, is_public),
              updated_at = now()
          WHERE id = $1",
    )
    .bind(user_id)
    .bind(nickname)
    .bind(photo_url)
    .bind(update.is_public)
    .execute(pool)
    .await
    .map_err(|e| match map_unique_violation(e) {
        AuthError::Db(e) => ProfileError::Db(e),
        _ => ProfileError::NicknameTaken,
    })?;
    if result.rows_affected() == 0 {
        return Err(ProfileError::NotFound);
    }
    get_profile(pool, user_id).await
}

/// Escape `LIKE` metacharacters so user input matches literally.
#[must_use]
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Case-insensitive substring search over public users' nicknames.
pub async fn search_users(pool: &PgPool, query: &str, limit: i64) -> Result<Vec<UserSummary>, ProfileError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let pattern = format!("%{}%", escape_like(query));
    let rows = sqlx::query(
        r"SELECT
              u.id, u.nickname, u.photo_url,
              COUNT(j.id) AS journal_count,
              MAX(j.date) AS last_journal_date
          FROM users u
          LEFT JOIN investment_journals j ON j.user_id = u.id
          WHERE u.is_public AND u.nickname ILIKE $1 ESCAPE '\'
          GROUP BY u.id
          ORDER BY lower(u.nickname)
          LIMIT $2",
    )
    .bind(pattern)
    .bind(limit.clamp(1, 100))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| UserSummary {
            id: r.get("id"),
            nickname: r.get("nickname"),
            photo_url: r.get("photo_url"),
            journal_count: r.get("journal_count"),
            last_journal_date: r.get("last_journal_date"),
        })
        .collect())
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
