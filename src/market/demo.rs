//! Randomized indicators for widgets with no public data source.
//!
//! Every value here is a placeholder. Responses carry `source: "demo"` so the
//! client can label them.

use rand::Rng;
use serde::Serialize;
use time::Date;

use crate::portfolio::format::format_krw_compact;

const CREDIT_MAX: i64 = 1_000_000_000_000;
const CREDIT_NET_SPAN: i64 = 100_000_000_000;
const MARKET_CAP_MAX: i64 = 2_000_000_000_000_000;
const TRADING_VOLUME_MAX: i64 = 10_000_000_000_000;
const M2_MAX: i64 = 3_000_000_000_000;

/// Demo Fear & Greed score, 0–99.
pub fn demo_fear_greed(rng: &mut impl Rng) -> u8 {
    rng.random_range(0..100)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBalance {
    pub date: Date,
    pub credit_buy: i64,
    pub credit_sell: i64,
    /// Net balance, roughly ±50 billion won.
    pub net: i64,
    pub credit_buy_display: String,
    pub credit_sell_display: String,
    pub net_display: String,
}

#[allow(clippy::cast_precision_loss)]
pub fn credit_balance(rng: &mut impl Rng, today: Date) -> CreditBalance {
    let credit_buy = rng.random_range(0..CREDIT_MAX);
    let credit_sell = rng.random_range(0..CREDIT_MAX);
    let net = rng.random_range(0..CREDIT_NET_SPAN) - CREDIT_NET_SPAN / 2;
    CreditBalance {
        date: today,
        credit_buy,
        credit_sell,
        net,
        credit_buy_display: format_krw_compact(credit_buy as f64),
        credit_sell_display: format_krw_compact(credit_sell as f64),
        net_display: format_krw_compact(net as f64),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Liquidity {
    pub date: Date,
    pub market_cap: i64,
    pub trading_volume: i64,
    /// Percent, two decimals, 1.00–6.00.
    pub liquidity_ratio: f64,
    pub market_cap_display: String,
    pub trading_volume_display: String,
}

#[allow(clippy::cast_precision_loss)]
pub fn liquidity(rng: &mut impl Rng, today: Date) -> Liquidity {
    let market_cap = rng.random_range(0..MARKET_CAP_MAX);
    let trading_volume = rng.random_range(0..TRADING_VOLUME_MAX);
    let ratio: f64 = rng.random_range(1.0..6.0);
    Liquidity {
        date: today,
        market_cap,
        trading_volume,
        liquidity_ratio: (ratio * 100.0).round() / 100.0,
        market_cap_display: format_krw_compact(market_cap as f64),
        trading_volume_display: format_krw_compact(trading_volume as f64),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneySupply {
    pub date: Date,
    pub amount: i64,
    pub amount_display: String,
}

#[allow(clippy::cast_precision_loss)]
pub fn m2_money_supply(rng: &mut impl Rng, today: Date) -> MoneySupply {
    let amount = rng.random_range(0..M2_MAX);
    MoneySupply { date: today, amount, amount_display: format_krw_compact(amount as f64) }
}

#[cfg(test)]
#[path = "demo_test.rs"]
mod tests;
