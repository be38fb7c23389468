use std::collections::HashMap;

use super::*;

fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    AppConfig::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn defaults_apply_with_only_database_url() {
    let config = load(&[("DATABASE_URL", "postgres://localhost/journal")]).unwrap();
    assert_eq!(config.port, 3000);
    assert_eq!(config.db_max_connections, 5);
    assert!((config.default_usd_krw - 1320.0).abs() < f64::EPSILON);
    assert_eq!(config.exchange_rate_ttl, Duration::from_secs(3600));
    assert_eq!(config.market_http_timeout, Duration::from_secs(10));
    assert_eq!(config.session_ttl_days, 30);
    assert_eq!(config.utc_offset.whole_hours(), 9);
    assert!(config.google.is_none());
    assert!(config.alpha_vantage_key.is_none());
    assert!(!config.cookie_secure);
}

#[test]
fn missing_database_url_is_error() {
    assert!(matches!(load(&[]), Err(ConfigError::Missing("DATABASE_URL"))));
    assert!(matches!(load(&[("DATABASE_URL", "  ")]), Err(ConfigError::Missing("DATABASE_URL"))));
}

#[test]
fn invalid_numbers_fall_back_to_defaults() {
    let config = load(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty"), ("DB_MAX_CONNECTIONS", "-1")]).unwrap();
    assert_eq!(config.port, 3000);
    assert_eq!(config.db_max_connections, 5);
}

#[test]
fn non_positive_default_rate_is_rejected() {
    let err = load(&[("DATABASE_URL", "postgres://x"), ("DEFAULT_USD_KRW", "0")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "DEFAULT_USD_KRW", .. }));
}

#[test]
fn out_of_range_offset_is_rejected() {
    let err = load(&[("DATABASE_URL", "postgres://x"), ("APP_UTC_OFFSET_HOURS", "30")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "APP_UTC_OFFSET_HOURS", .. }));
}

#[test]
fn google_requires_all_three_keys() {
    let partial = load(&[
        ("DATABASE_URL", "postgres://x"),
        ("GOOGLE_CLIENT_ID", "id"),
        ("GOOGLE_CLIENT_SECRET", "secret"),
    ])
    .unwrap();
    assert!(partial.google.is_none());

    let full = load(&[
        ("DATABASE_URL", "postgres://x"),
        ("GOOGLE_CLIENT_ID", "id"),
        ("GOOGLE_CLIENT_SECRET", "secret"),
        ("GOOGLE_REDIRECT_URI", "https://journal.example/auth/google/callback"),
    ])
    .unwrap();
    let google = full.google.unwrap();
    assert_eq!(google.client_id, "id");
    assert!(full.cookie_secure, "https redirect implies secure cookies");
}

#[test]
fn explicit_cookie_secure_wins() {
    let config = load(&[
        ("DATABASE_URL", "postgres://x"),
        ("COOKIE_SECURE", "off"),
        ("GOOGLE_CLIENT_ID", "id"),
        ("GOOGLE_CLIENT_SECRET", "secret"),
        ("GOOGLE_REDIRECT_URI", "https://journal.example/cb"),
    ])
    .unwrap();
    assert!(!config.cookie_secure);
}

#[test]
fn env_bool_accepts_common_spellings() {
    let lookup = |key: &str| match key {
        "A" => Some("YES".to_owned()),
        "B" => Some("0".to_owned()),
        "C" => Some("maybe".to_owned()),
        _ => None,
    };
    assert_eq!(env_bool(&lookup, "A"), Some(true));
    assert_eq!(env_bool(&lookup, "B"), Some(false));
    assert_eq!(env_bool(&lookup, "C"), None);
    assert_eq!(env_bool(&lookup, "D"), None);
}
