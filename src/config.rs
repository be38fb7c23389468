//! Typed configuration loaded from environment variables.
//!
//! DESIGN
//! ======
//! `from_lookup` takes any key → value function so tests can supply a map
//! instead of mutating the process environment. Only `DATABASE_URL` is
//! required; every other knob falls back to a default when unset or invalid.

use std::time::Duration;

use time::UtcOffset;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_USD_KRW: f64 = 1320.0;
const DEFAULT_EXCHANGE_RATE_TTL_SECS: u64 = 3600;
const DEFAULT_MARKET_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SESSION_TTL_DAYS: i64 = 30;
const DEFAULT_UTC_OFFSET_HOURS: i8 = 9;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Google OAuth client settings. Absent when any of the three keys is unset.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// Fallback USD/KRW rate when no live or cached rate is available.
    pub default_usd_krw: f64,
    pub exchange_rate_ttl: Duration,
    pub market_http_timeout: Duration,
    pub alpha_vantage_key: Option<String>,
    pub google: Option<GoogleConfig>,
    pub cookie_secure: bool,
    pub session_ttl_days: i64,
    /// Offset used to decide what "today" is for new journals and periods.
    pub utc_offset: UtcOffset,
}

impl AppConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a value is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a value is out of range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = non_empty(&lookup, "DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let default_usd_krw = env_parse(&lookup, "DEFAULT_USD_KRW", DEFAULT_USD_KRW);
        if !default_usd_krw.is_finite() || default_usd_krw <= 0.0 {
            return Err(ConfigError::Invalid { key: "DEFAULT_USD_KRW", reason: "must be a positive number".into() });
        }

        let offset_hours = env_parse(&lookup, "APP_UTC_OFFSET_HOURS", DEFAULT_UTC_OFFSET_HOURS);
        let utc_offset = UtcOffset::from_hms(offset_hours, 0, 0)
            .map_err(|e| ConfigError::Invalid { key: "APP_UTC_OFFSET_HOURS", reason: e.to_string() })?;

        let google = match (
            non_empty(&lookup, "GOOGLE_CLIENT_ID"),
            non_empty(&lookup, "GOOGLE_CLIENT_SECRET"),
            non_empty(&lookup, "GOOGLE_REDIRECT_URI"),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_uri)) => {
                Some(GoogleConfig { client_id, client_secret, redirect_uri })
            }
            _ => None,
        };

        let cookie_secure = env_bool(&lookup, "COOKIE_SECURE").unwrap_or_else(|| {
            google
                .as_ref()
                .is_some_and(|g| g.redirect_uri.starts_with("https://"))
        });

        Ok(Self {
            database_url,
            port: env_parse(&lookup, "PORT", DEFAULT_PORT),
            db_max_connections: env_parse(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            default_usd_krw,
            exchange_rate_ttl: Duration::from_secs(env_parse(
                &lookup,
                "EXCHANGE_RATE_TTL_SECS",
                DEFAULT_EXCHANGE_RATE_TTL_SECS,
            )),
            market_http_timeout: Duration::from_secs(env_parse(
                &lookup,
                "MARKET_HTTP_TIMEOUT_SECS",
                DEFAULT_MARKET_HTTP_TIMEOUT_SECS,
            )),
            alpha_vantage_key: non_empty(&lookup, "ALPHA_VANTAGE_API_KEY"),
            google,
            cookie_secure,
            session_ttl_days: env_parse(&lookup, "SESSION_TTL_DAYS", DEFAULT_SESSION_TTL_DAYS).max(1),
            utc_offset,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

pub(crate) fn env_parse<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_bool<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
