//! Market indicator routes for the psychology widgets.
//!
//! Nothing here persists. Live providers are tried first; on failure each
//! endpoint degrades to a demo value, an empty map, or zero, and logs why.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::market::cache::ExchangeRate;
use crate::market::demo::{self, CreditBalance, Liquidity, MoneySupply};
use crate::portfolio::format::FearGreedLevel;
use crate::portfolio::model::clamp_fear_greed;
use crate::state::AppState;

/// Whether a reading came from a provider or the demo generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorSource {
    Live,
    Demo,
}

#[derive(Debug, Clone, Serialize)]
pub struct FearGreedReading {
    pub score: u8,
    pub level: FearGreedLevel,
    pub label: &'static str,
    pub source: IndicatorSource,
}

impl FearGreedReading {
    fn new(score: u8, source: IndicatorSource) -> Self {
        let level = FearGreedLevel::from_score(score);
        Self { score, level, label: level.label(), source }
    }
}

/// `GET /api/indicators/fear-greed`
pub async fn fear_greed(State(state): State<AppState>) -> Json<FearGreedReading> {
    let reading = match state.market.fear_greed().await {
        Ok(score) => FearGreedReading::new(clamp_fear_greed(score), IndicatorSource::Live),
        Err(e) => {
            tracing::warn!(error = %e, "fear & greed fetch failed; serving demo score");
            FearGreedReading::new(demo::demo_fear_greed(&mut rand::rng()), IndicatorSource::Demo)
        }
    };
    Json(reading)
}

/// `GET /api/indicators/credit-balance`
pub async fn credit_balance(State(state): State<AppState>) -> Json<CreditBalance> {
    Json(demo::credit_balance(&mut rand::rng(), state.today()))
}

/// `GET /api/indicators/liquidity`
pub async fn liquidity(State(state): State<AppState>) -> Json<Liquidity> {
    Json(demo::liquidity(&mut rand::rng(), state.today()))
}

/// `GET /api/indicators/m2`
pub async fn m2(State(state): State<AppState>) -> Json<MoneySupply> {
    Json(demo::m2_money_supply(&mut rand::rng(), state.today()))
}

/// `GET /api/indicators/exchange-rate`
pub async fn exchange_rate(State(state): State<AppState>) -> Json<ExchangeRate> {
    Json(state.usd_krw().await)
}

#[derive(Debug, Default, Deserialize)]
pub struct CryptoQuery {
    #[serde(default)]
    pub symbols: String,
}

pub(crate) fn split_ids(raw: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in raw.split(',').map(|s| s.trim().to_ascii_lowercase()) {
        if !id.is_empty() && !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// `GET /api/indicators/crypto?symbols=bitcoin,ethereum`: USD prices by id.
pub async fn crypto(State(state): State<AppState>, Query(query): Query<CryptoQuery>) -> Json<HashMap<String, f64>> {
    let ids = split_ids(&query.symbols);
    if ids.is_empty() {
        return Json(HashMap::new());
    }
    match state.market.crypto_prices(&ids).await {
        Ok(prices) => Json(prices),
        Err(e) => {
            tracing::warn!(error = %e, count = ids.len(), "crypto price fetch failed");
            Json(HashMap::new())
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerPrice {
    pub market: String,
    pub trade_price: f64,
}

/// `GET /api/indicators/upbit/{market}`: last trade price, 0 on failure.
pub async fn upbit(State(state): State<AppState>, Path(market): Path<String>) -> Json<TickerPrice> {
    let market = market.trim().to_ascii_uppercase();
    let trade_price = match state.market.exchange_ticker(&market).await {
        Ok(price) => price,
        Err(e) => {
            tracing::warn!(error = %e, %market, "upbit ticker fetch failed");
            0.0
        }
    };
    Json(TickerPrice { market, trade_price })
}

#[cfg(test)]
#[path = "indicators_test.rs"]
mod tests;
