//! USD/KRW rate with a last-known-good fallback.
//!
//! A live fetch always wins. When it fails, a cached rate younger than the
//! TTL is returned; past that the configured default is used.

use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;

use super::MarketData;

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    usd_krw: f64,
    fetched_at: Instant,
}

/// Where a returned rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Live,
    Cache,
    Default,
    /// Supplied by the client with a journal save.
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub usd_krw: f64,
    pub source: RateSource,
}

pub struct ExchangeRateCache {
    inner: RwLock<Option<CachedRate>>,
    ttl: Duration,
    default_rate: f64,
}

impl ExchangeRateCache {
    #[must_use]
    pub fn new(ttl: Duration, default_rate: f64) -> Self {
        Self { inner: RwLock::new(None), ttl, default_rate }
    }

    /// Fetch the live rate, falling back to cache then default.
    pub async fn current(&self, market: &dyn MarketData) -> ExchangeRate {
        match market.usd_krw().await {
            Ok(rate) if rate.is_finite() && rate > 0.0 => {
                self.store(rate, Instant::now()).await;
                ExchangeRate { usd_krw: rate, source: RateSource::Live }
            }
            Ok(rate) => {
                tracing::warn!(rate, "exchange rate provider returned an unusable value");
                self.cached_or_default(Instant::now()).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "exchange rate fetch failed");
                self.cached_or_default(Instant::now()).await
            }
        }
    }

    pub(crate) async fn store(&self, usd_krw: f64, fetched_at: Instant) {
        *self.inner.write().await = Some(CachedRate { usd_krw, fetched_at });
    }

    pub(crate) async fn cached_or_default(&self, now: Instant) -> ExchangeRate {
        let cached = *self.inner.read().await;
        match cached {
            Some(c) if now.saturating_duration_since(c.fetched_at) < self.ttl => {
                ExchangeRate { usd_krw: c.usd_krw, source: RateSource::Cache }
            }
            _ => ExchangeRate { usd_krw: self.default_rate, source: RateSource::Default },
        }
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
