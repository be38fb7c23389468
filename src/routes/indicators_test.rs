use std::sync::Arc;

use super::*;
use crate::market::cache::RateSource;
use crate::market::stub::StubMarket;
use crate::state::test_helpers::{test_app_state, test_app_state_with_market};

fn state_with(market: StubMarket) -> (AppState, Arc<StubMarket>) {
    let market = Arc::new(market);
    (test_app_state_with_market(market.clone()), market)
}

#[tokio::test]
async fn fear_greed_live_reading_is_rounded_and_labelled() {
    let (state, _) = state_with(StubMarket { fear_greed: Some(76.6), ..StubMarket::default() });
    let Json(reading) = fear_greed(State(state)).await;
    assert_eq!(reading.score, 77);
    assert_eq!(reading.level, FearGreedLevel::ExtremeGreed);
    assert_eq!(reading.label, "극도의 탐욕");
    assert_eq!(reading.source, IndicatorSource::Live);
}

#[tokio::test]
async fn fear_greed_falls_back_to_demo() {
    let Json(reading) = fear_greed(State(test_app_state())).await;
    assert_eq!(reading.source, IndicatorSource::Demo);
    assert!(reading.score < 100);
    assert_eq!(reading.level, FearGreedLevel::from_score(reading.score));
}

#[tokio::test]
async fn demo_widgets_are_dated_today() {
    let state = test_app_state();
    let today = state.today();
    let Json(credit) = credit_balance(State(state.clone())).await;
    assert_eq!(credit.date, today);
    let Json(liq) = liquidity(State(state.clone())).await;
    assert!((1.0..=6.0).contains(&liq.liquidity_ratio));
    let Json(m2) = m2(State(state)).await;
    assert!(!m2.amount_display.is_empty());
}

#[tokio::test]
async fn exchange_rate_reports_source() {
    let (state, _) = state_with(StubMarket::with_rate(1385.0));
    let Json(rate) = exchange_rate(State(state)).await;
    assert_eq!(rate.source, RateSource::Live);

    let Json(rate) = exchange_rate(State(test_app_state())).await;
    assert_eq!(rate.source, RateSource::Default);
    assert!((rate.usd_krw - 1320.0).abs() < f64::EPSILON);
}

#[test]
fn split_ids_normalizes_and_dedupes() {
    assert_eq!(split_ids(" Bitcoin, ethereum,,bitcoin "), vec!["bitcoin", "ethereum"]);
    assert!(split_ids(" , ").is_empty());
}

#[tokio::test]
async fn crypto_omits_unknown_ids() {
    let mut market = StubMarket::default();
    market.crypto.insert("bitcoin".into(), 65_000.0);
    let (state, _) = state_with(market);

    let Json(prices) = crypto(State(state), Query(CryptoQuery { symbols: "bitcoin,dogecoin".into() })).await;
    assert_eq!(prices.len(), 1);
    assert_eq!(prices.get("bitcoin"), Some(&65_000.0));
}

#[tokio::test]
async fn crypto_empty_query_skips_provider() {
    let (state, market) = state_with(StubMarket::default());
    let Json(prices) = crypto(State(state), Query(CryptoQuery::default())).await;
    assert!(prices.is_empty());
    assert!(market.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn crypto_failure_is_empty_map() {
    let Json(prices) = crypto(State(test_app_state()), Query(CryptoQuery { symbols: "bitcoin".into() })).await;
    assert!(prices.is_empty());
}

#[tokio::test]
async fn upbit_uppercases_market_and_zeroes_on_failure() {
    let (state, market) = state_with(StubMarket { ticker: Some(95_000_000.0), ..StubMarket::default() });
    let Json(price) = upbit(State(state), Path("krw-btc".into())).await;
    assert_eq!(price.market, "KRW-BTC");
    assert!((price.trade_price - 95_000_000.0).abs() < f64::EPSILON);
    assert_eq!(market.calls.lock().unwrap().as_slice(), ["ticker:KRW-BTC"]);

    let Json(price) = upbit(State(test_app_state()), Path("KRW-ETH".into())).await;
    assert!(price.trade_price.abs() < f64::EPSILON);
}
