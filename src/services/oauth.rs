//! Google OAuth service: authorize URL, code exchange, profile fetch, user upsert.

use reqwest::Url;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::config::GoogleConfig;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SUB_SUFFIX_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("invalid authorize url: {0}")]
    Url(String),
    #[error("google token exchange failed: {0}")]
    TokenExchange(String),
    #[error("google api error: {0}")]
    GoogleApi(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Build the Google authorization URL carrying the CSRF `state`.
///
/// # Errors
///
/// Returns an error if the base URL cannot be parsed.
pub fn authorize_url(config: &GoogleConfig, state: &str) -> Result<String, OAuthError> {
    let url = Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", "openid email profile"),
            ("state", state),
            ("prompt", "select_account"),
        ],
    )
    .map_err(|e| OAuthError::Url(e.to_string()))?;
    Ok(url.into())
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct GoogleUser {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Exchange an authorization code for an access token.
pub async fn exchange_code(http: &reqwest::Client, config: &GoogleConfig, code: &str) -> Result<String, OAuthError> {
    let resp = http
        .post(TOKEN_URL)
        .form(&[
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| OAuthError::TokenExchange(e.to_string()))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| OAuthError::TokenExchange(e.to_string()))?;
    if !status.is_success() {
        return Err(OAuthError::TokenExchange(format!("{status}: {body}")));
    }
    let token: TokenResponse =
        serde_json::from_str(&body).map_err(|_| OAuthError::TokenExchange(format!("unexpected response: {body}")))?;
    Ok(token.access_token)
}

/// Fetch the signed-in Google account's OpenID profile.
pub async fn fetch_google_user(http: &reqwest::Client, access_token: &str) -> Result<GoogleUser, OAuthError> {
    let resp = http
        .get(USERINFO_URL)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| OAuthError::GoogleApi(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(OAuthError::GoogleApi(format!("{status}: {body}")));
    }

    resp.json::<GoogleUser>()
        .await
        .map_err(|e| OAuthError::GoogleApi(e.to_string()))
}

/// Nickname for a first Google sign-in: email local part (or display name)
/// plus the tail of the subject id, so two `john@` accounts do not collide.
#[must_use]
pub fn nickname_for(user: &GoogleUser) -> String {
    let base = user
        .email
        .as_deref()
        .and_then(|e| e.split('@').next())
        .filter(|local| !local.trim().is_empty())
        .or_else(|| user.name.as_deref().filter(|n| !n.trim().is_empty()))
        .unwrap_or("user")
        .trim();
    let tail: String = {
        let chars: Vec<char> = user.sub.chars().collect();
        chars[chars.len().saturating_sub(SUB_SUFFIX_LEN)..].iter().collect()
    };
    format!("{base}-{tail}")
}

/// Upsert a user from their Google profile. The nickname is only set on
/// first sign-in so later renames survive. Returns the user's UUID.
pub async fn upsert_user(pool: &PgPool, user: &GoogleUser) -> Result<Uuid, OAuthError> {
    let row = sqlx::query(
        r"INSERT INTO users (google_sub, nickname, email, photo_url)
          VALUES ($1, $2, $3, $4)
          ON CONFLICT (google_sub) DO UPDATE
              SET photo_url = COALESCE(users.photo_url, EXCLUDED.photo_url),
                  updated_at = now()
          RETURNING id",
    )
    .bind(&user.sub)
    .bind(nickname_for(user))
    .bind(&user.email)
    .bind(&user.picture)
    .fetch_one(pool)
    .await?;
    Ok(row.get("id"))
}

#[cfg(test)]
#[path = "oauth_test.rs"]
mod tests;
