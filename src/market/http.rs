//! `reqwest`-backed market data client.
//!
//! Response parsing lives in free functions so each provider's body shape is
//! covered by unit tests without network access.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use time::Date;
use time::macros::format_description;

use super::{INDEX_HISTORY_DAYS, MarketData, MarketError};
use crate::portfolio::charts::SeriesPoint;

const EXCHANGE_RATE_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";
const UPBIT_TICKER_URL: &str = "https://api.upbit.com/v1/ticker";
const COINGECKO_PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";
const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";
const FEAR_GREED_URL: &str = "https://production.dataviz.cnn.io/index/fearandgreed/graphdata";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; invest-journal/0.1)";
const CONNECT_TIMEOUT_SECS: u64 = 5;

pub struct HttpMarketData {
    http: reqwest::Client,
    alpha_vantage_key: Option<String>,
}

impl HttpMarketData {
    /// Build a client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration, alpha_vantage_key: Option<String>) -> Result<Self, MarketError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| MarketError::Request(e.to_string()))?;
        Ok(Self { http, alpha_vantage_key })
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, MarketError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| MarketError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MarketError::Status { status: status.as_u16() });
        }

        resp.text()
            .await
            .map_err(|e| MarketError::Request(e.to_string()))
    }
}

#[async_trait::async_trait]
impl MarketData for HttpMarketData {
    async fn usd_krw(&self) -> Result<f64, MarketError> {
        let body = self.get_text(EXCHANGE_RATE_URL, &[]).await?;
        parse_exchange_rate(&body)
    }

    async fn exchange_ticker(&self, market: &str) -> Result<f64, MarketError> {
        let body = self.get_text(UPBIT_TICKER_URL, &[("markets", market)]).await?;
        parse_upbit_ticker(&body)
    }

    async fn crypto_prices(&self, ids: &[String]) -> Result<HashMap<String, f64>, MarketError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let joined = ids
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect::<Vec<_>>()
            .join(",");
        let body = self
            .get_text(COINGECKO_PRICE_URL, &[("ids", joined.as_str()), ("vs_currencies", "usd")])
            .await?;
        parse_coingecko_prices(&body, ids)
    }

    async fn daily_closes(&self, symbol: &str) -> Result<Vec<SeriesPoint>, MarketError> {
        let key = self
            .alpha_vantage_key
            .as_deref()
            .ok_or(MarketError::NotConfigured("ALPHA_VANTAGE_API_KEY"))?;
        let body = self
            .get_text(ALPHA_VANTAGE_URL, &[("function", "TIME_SERIES_DAILY"), ("symbol", symbol), ("apikey", key)])
            .await?;
        parse_alpha_vantage_daily(&body, INDEX_HISTORY_DAYS)
    }

    async fn fear_greed(&self) -> Result<f64, MarketError> {
        let body = self.get_text(FEAR_GREED_URL, &[]).await?;
        parse_fear_greed(&body)
    }
}

// =============================================================================
// PARSERS
// =============================================================================

fn parse_json<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, MarketError> {
    serde_json::from_str(body).map_err(|e| MarketError::Parse(e.to_string()))
}

fn positive(value: f64, what: &str) -> Result<f64, MarketError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MarketError::Parse(format!("{what} is not a positive number: {value}")))
    }
}

#[derive(Deserialize)]
struct ExchangeRateBody {
    rates: HashMap<String, f64>,
}

pub(crate) fn parse_exchange_rate(body: &str) -> Result<f64, MarketError> {
    let parsed: ExchangeRateBody = parse_json(body)?;
    let krw = parsed
        .rates
        .get("KRW")
        .copied()
        .ok_or_else(|| MarketError::Parse("missing KRW rate".into()))?;
    positive(krw, "KRW rate")
}

#[derive(Deserialize)]
struct UpbitTicker {
    trade_price: f64,
}

pub(crate) fn parse_upbit_ticker(body: &str) -> Result<f64, MarketError> {
    let tickers: Vec<UpbitTicker> = parse_json(body)?;
    let first = tickers
        .first()
        .ok_or_else(|| MarketError::Parse("empty ticker list".into()))?;
    positive(first.trade_price, "trade_price")
}

/// Map CoinGecko's lowercase-id response back onto the ids as requested.
pub(crate) fn parse_coingecko_prices(body: &str, requested: &[String]) -> Result<HashMap<String, f64>, MarketError> {
    let parsed: HashMap<String, HashMap<String, Value>> = parse_json(body)?;
    let mut prices = HashMap::new();
    for id in requested {
        let usd = parsed
            .get(&id.trim().to_lowercase())
            .and_then(|quote| quote.get("usd"))
            .and_then(Value::as_f64)
            .filter(|p| p.is_finite() && *p > 0.0);
        if let Some(usd) = usd {
            prices.insert(id.clone(), usd);
        }
    }
    Ok(prices)
}

#[derive(Deserialize)]
struct AlphaVantageDay {
    #[serde(rename = "4. close")]
    close: String,
}

#[derive(Deserialize)]
struct AlphaVantageDaily {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<HashMap<String, AlphaVantageDay>>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

/// Most recent `limit` closes, date-ascending. Rows with bad dates or prices
/// are skipped.
pub(crate) fn parse_alpha_vantage_daily(body: &str, limit: usize) -> Result<Vec<SeriesPoint>, MarketError> {
    let parsed: AlphaVantageDaily = parse_json(body)?;
    let Some(series) = parsed.series else {
        let reason = parsed
            .note
            .or(parsed.information)
            .unwrap_or_else(|| "missing daily time series".into());
        return Err(MarketError::Parse(reason));
    };

    let format = format_description!("[year]-[month]-[day]");
    let mut points: Vec<SeriesPoint> = series
        .into_iter()
        .filter_map(|(day, quote)| {
            let date = Date::parse(&day, &format).ok()?;
            let value = quote.close.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
            Some(SeriesPoint { date, value })
        })
        .collect();
    points.sort_by_key(|p| p.date);
    let skip = points.len().saturating_sub(limit);
    Ok(points.split_off(skip))
}

#[derive(Deserialize)]
struct FearGreedBody {
    fear_and_greed: FearGreedScore,
}

#[derive(Deserialize)]
struct FearGreedScore {
    score: f64,
}

pub(crate) fn parse_fear_greed(body: &str) -> Result<f64, MarketError> {
    let parsed: FearGreedBody = parse_json(body)?;
    let score = parsed.fear_and_greed.score;
    if score.is_finite() && (0.0..=100.0).contains(&score) {
        Ok(score)
    } else {
        Err(MarketError::Parse(format!("score out of range: {score}")))
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
