use super::*;
use crate::market::stub::StubMarket;

fn cache() -> ExchangeRateCache {
    ExchangeRateCache::new(Duration::from_secs(3600), 1320.0)
}

#[tokio::test]
async fn live_rate_is_returned_and_cached() {
    let cache = cache();
    let live = cache.current(&StubMarket::with_rate(1390.5)).await;
    assert_eq!(live, ExchangeRate { usd_krw: 1390.5, source: RateSource::Live });

    let fallback = cache.current(&StubMarket::offline()).await;
    assert_eq!(fallback, ExchangeRate { usd_krw: 1390.5, source: RateSource::Cache });
}

#[tokio::test]
async fn empty_cache_falls_back_to_default() {
    let rate = cache().current(&StubMarket::offline()).await;
    assert_eq!(rate, ExchangeRate { usd_krw: 1320.0, source: RateSource::Default });
}

#[tokio::test]
async fn stale_cache_falls_back_to_default() {
    let cache = cache();
    let fetched = Instant::now();
    cache.store(1400.0, fetched).await;

    let fresh = cache.cached_or_default(fetched + Duration::from_secs(3599)).await;
    assert_eq!(fresh.source, RateSource::Cache);

    let stale = cache.cached_or_default(fetched + Duration::from_secs(3600)).await;
    assert_eq!(stale, ExchangeRate { usd_krw: 1320.0, source: RateSource::Default });
}

#[tokio::test]
async fn non_positive_live_rate_is_ignored() {
    let cache = cache();
    cache.store(1350.0, Instant::now()).await;
    let rate = cache.current(&StubMarket::with_rate(0.0)).await;
    assert_eq!(rate, ExchangeRate { usd_krw: 1350.0, source: RateSource::Cache });
}

#[test]
fn source_serializes_lowercase() {
    let v = serde_json::to_value(ExchangeRate { usd_krw: 1.0, source: RateSource::Default }).unwrap();
    assert_eq!(v["source"], "default");
    assert_eq!(v["usdKrw"], 1.0);
}
