//! Market data: exchange rates, prices, index history, sentiment.
//!
//! DESIGN
//! ======
//! All third-party finance APIs sit behind the `MarketData` trait so routes
//! can be exercised with an in-memory double. `http::HttpMarketData` is the
//! production implementation; `cache::ExchangeRateCache` adds the one-hour
//! fallback for USD/KRW, and `demo` supplies the randomized indicators that
//! have no public source.
//!
//! ERROR HANDLING
//! ==============
//! Callers never surface a `MarketError` to the user. Each route decides its
//! fallback (cached rate, default rate, random demo value, empty overlay) and
//! logs the failure.

pub mod cache;
pub mod demo;
pub mod http;
#[cfg(test)]
pub(crate) mod stub;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::portfolio::charts::SeriesPoint;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// The HTTP request could not be sent or timed out.
    #[error("request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}")]
    Status { status: u16 },

    /// The body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Parse(String),

    /// A provider that needs an API key was called without one.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

// =============================================================================
// TYPES
// =============================================================================

/// Benchmarks offered as overlays on the asset-change chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketIndex {
    Sp500,
    Nasdaq,
}

impl MarketIndex {
    /// ETF proxy queried for the daily series.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Sp500 => "SPY",
            Self::Nasdaq => "QQQ",
        }
    }
}

/// Number of most recent daily closes used for an index overlay.
pub const INDEX_HISTORY_DAYS: usize = 100;

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait MarketData: Send + Sync {
    /// Live USD → KRW rate.
    async fn usd_krw(&self) -> Result<f64, MarketError>;

    /// Last trade price for an exchange market code such as `KRW-BTC`.
    async fn exchange_ticker(&self, market: &str) -> Result<f64, MarketError>;

    /// USD prices keyed by the requested coin ids. Unknown ids are omitted.
    async fn crypto_prices(&self, ids: &[String]) -> Result<HashMap<String, f64>, MarketError>;

    /// Daily closes for `symbol`, date-ascending, at most `INDEX_HISTORY_DAYS`.
    async fn daily_closes(&self, symbol: &str) -> Result<Vec<SeriesPoint>, MarketError>;

    /// Current Fear & Greed score (0–100).
    async fn fear_greed(&self) -> Result<f64, MarketError>;
}
