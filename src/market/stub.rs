//! In-memory `MarketData` for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{MarketData, MarketError};
use crate::portfolio::charts::SeriesPoint;

#[derive(Default)]
pub struct StubMarket {
    pub usd_krw: Option<f64>,
    pub ticker: Option<f64>,
    pub crypto: HashMap<String, f64>,
    pub closes: Vec<SeriesPoint>,
    pub fear_greed: Option<f64>,
    pub calls: Mutex<Vec<String>>,
}

impl StubMarket {
    /// Every provider fails.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_rate(usd_krw: f64) -> Self {
        Self { usd_krw: Some(usd_krw), ..Self::default() }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn unavailable() -> MarketError {
        MarketError::Request("stub offline".into())
    }
}

#[async_trait::async_trait]
impl MarketData for StubMarket {
    async fn usd_krw(&self) -> Result<f64, MarketError> {
        self.record("usd_krw");
        self.usd_krw.ok_or_else(Self::unavailable)
    }

    async fn exchange_ticker(&self, market: &str) -> Result<f64, MarketError> {
        self.record(format!("ticker:{market}"));
        self.ticker.ok_or_else(Self::unavailable)
    }

    async fn crypto_prices(&self, ids: &[String]) -> Result<HashMap<String, f64>, MarketError> {
        self.record(format!("crypto:{}", ids.join(",")));
        if self.crypto.is_empty() {
            return Err(Self::unavailable());
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.crypto.get(id).map(|p| (id.clone(), *p)))
            .collect())
    }

    async fn daily_closes(&self, symbol: &str) -> Result<Vec<SeriesPoint>, MarketError> {
        self.record(format!("closes:{symbol}"));
        if self.closes.is_empty() {
            return Err(MarketError::NotConfigured("ALPHA_VANTAGE_API_KEY"));
        }
        Ok(self.closes.clone())
    }

    async fn fear_greed(&self) -> Result<f64, MarketError> {
        self.record("fear_greed");
        self.fear_greed.ok_or_else(Self::unavailable)
    }
}
