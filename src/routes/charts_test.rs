use std::sync::Arc;

use time::Duration;
use time::macros::date;

use super::*;
use crate::market::stub::StubMarket;
use crate::state::test_helpers::{test_app_state, test_app_state_with_market};

#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
fn closes(n: usize) -> Vec<SeriesPoint> {
    let start = date!(2024 - 01 - 01);
    (0..n)
        .rev()
        .map(|i| SeriesPoint { date: start + Duration::days(i as i64), value: 100.0 + i as f64 })
        .collect()
}

#[tokio::test]
async fn overlay_keeps_latest_closes_ascending() {
    let market = StubMarket { closes: closes(150), ..StubMarket::default() };
    let market = Arc::new(market);
    let state = test_app_state_with_market(market.clone());

    let overlay = index_overlay(&state, MarketIndex::Nasdaq).await;
    assert_eq!(overlay.len(), INDEX_HISTORY_DAYS);
    assert!(overlay.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(overlay.last().map(|p| p.date), Some(date!(2024 - 01 - 01) + Duration::days(149)));
    assert_eq!(market.calls.lock().unwrap().as_slice(), ["closes:QQQ"]);
}

#[tokio::test]
async fn overlay_failure_is_empty() {
    let overlay = index_overlay(&test_app_state(), MarketIndex::Sp500).await;
    assert!(overlay.is_empty());
}

#[test]
fn query_defaults_to_three_months() {
    let q: AssetChangeQuery = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(q.period, Period::ThreeMonths);
    assert_eq!(q.compare, None);

    let q: AssetChangeQuery = serde_json::from_value(serde_json::json!({ "period": "1y", "compare": "sp500" })).unwrap();
    assert_eq!(q.period, Period::OneYear);
    assert_eq!(q.compare, Some(MarketIndex::Sp500));
}

#[test]
fn response_flattens_series() {
    let change = AssetChange { period: Period::All, user: Vec::new(), index: Vec::new() };
    let v = serde_json::to_value(AssetChangeResponse { change, compare: Some(MarketIndex::Nasdaq) }).unwrap();
    assert_eq!(v["period"], "all");
    assert_eq!(v["compare"], "nasdaq");
    assert!(v["user"].as_array().unwrap().is_empty());
}
