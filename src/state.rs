//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool, the loaded configuration, the market data client,
//! the exchange-rate cache, and an HTTP client for OAuth calls. Clone is
//! cheap: every field is a pool handle or reference counted.

use std::sync::Arc;

use sqlx::PgPool;
use time::{Date, OffsetDateTime};

use crate::config::AppConfig;
use crate::market::MarketData;
use crate::market::cache::{ExchangeRate, ExchangeRateCache};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub market: Arc<dyn MarketData>,
    pub rates: Arc<ExchangeRateCache>,
    pub http: reqwest::Client,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, config: AppConfig, market: Arc<dyn MarketData>) -> Self {
        let rates = ExchangeRateCache::new(config.exchange_rate_ttl, config.default_usd_krw);
        let http = reqwest::Client::builder()
            .timeout(config.market_http_timeout)
            .build()
            .unwrap_or_default();
        Self { pool, config: Arc::new(config), market, rates: Arc::new(rates), http }
    }

    /// Current calendar day in the configured offset.
    #[must_use]
    pub fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.config.utc_offset).date()
    }

    /// USD/KRW rate with cache and default fallback.
    pub async fn usd_krw(&self) -> ExchangeRate {
        self.rates.current(self.market.as_ref()).await
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
