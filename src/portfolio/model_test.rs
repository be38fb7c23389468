use super::*;
use serde_json::json;
use time::macros::date;

// =============================================================================
// JournalEntry deserialization
// =============================================================================

#[test]
fn entry_parses_camel_case_form_payload() {
    let payload = json!({
        "date": "2024-01-15",
        "totalAssets": 50_000_000,
        "evaluation": 2_000_000,
        "foreignStocks": [{ "id": "1", "symbol": "AAPL", "quantity": 10, "price": 180.5 }],
        "domesticStocks": [{ "symbol": "005930", "quantity": 20, "price": 75000 }],
        "cash": { "krw": 10_000_000, "usd": 5000 },
        "cryptocurrency": [{ "symbol": "BTC", "quantity": 0.1, "price": 45000 }],
        "trades": "bought AAPL",
        "psychologyCheck": { "fearGreedIndex": 72, "fomo": true },
        "bullMarketChecklist": [{ "id": "bull-0", "text": "q", "checked": true }],
        "bearMarketChecklist": [],
        "marketIssues": "CPI release",
        "memo": "steady"
    });
    let entry: JournalEntry = serde_json::from_value(payload).unwrap();
    assert_eq!(entry.date, date!(2024 - 01 - 15));
    assert_eq!(entry.total_assets, 50_000_000);
    assert_eq!(entry.foreign_stocks.len(), 1);
    assert_eq!(entry.foreign_stocks[0].symbol, "AAPL");
    assert!((entry.foreign_stocks[0].price - 180.5).abs() < f64::EPSILON);
    assert!((entry.cash.usd - 5000.0).abs() < f64::EPSILON);
    assert_eq!(entry.psychology_check.fear_greed_index, 72);
    assert_eq!(entry.psychology_check.fomo, Some(true));
    assert!(entry.bull_market_checklist[0].checked);
    assert_eq!(entry.market_issues, "CPI release");
}

#[test]
fn entry_defaults_missing_and_null_collections() {
    let payload = json!({
        "date": "2024-02-01",
        "foreignStocks": null,
        "cash": null,
        "psychologyCheck": null
    });
    let entry: JournalEntry = serde_json::from_value(payload).unwrap();
    assert!(entry.foreign_stocks.is_empty());
    assert!(entry.domestic_stocks.is_empty());
    assert!(entry.cryptocurrency.is_empty());
    assert_eq!(entry.cash, Cash::default());
    assert_eq!(entry.psychology_check.fear_greed_index, DEFAULT_FEAR_GREED_INDEX);
    assert_eq!(entry.trades, "");
    assert!(!entry.is_public);
}

#[test]
fn entry_accepts_legacy_snake_case_aliases() {
    let payload = json!({
        "date": "2024-03-01",
        "total_assets": 1234,
        "bull_market_checklist": [{ "text": "a", "checked": false }],
        "bear_market_checklist": [{ "text": "b", "checked": true }]
    });
    let entry: JournalEntry = serde_json::from_value(payload).unwrap();
    assert_eq!(entry.total_assets, 1234);
    assert_eq!(entry.bull_market_checklist[0].text, "a");
    assert!(entry.bear_market_checklist[0].checked);
}

#[test]
fn entry_numbers_may_arrive_as_strings() {
    let payload = json!({
        "date": "2024-03-02",
        "evaluation": "-1500.7",
        "domesticStocks": [{ "symbol": "X", "quantity": "3", "price": "bogus" }]
    });
    let entry: JournalEntry = serde_json::from_value(payload).unwrap();
    assert_eq!(entry.evaluation, -1501);
    assert!((entry.domestic_stocks[0].quantity - 3.0).abs() < f64::EPSILON);
    assert!(entry.domestic_stocks[0].price.abs() < f64::EPSILON);
}

#[test]
fn entry_requires_date() {
    let result = serde_json::from_value::<JournalEntry>(json!({ "totalAssets": 1 }));
    assert!(result.is_err());
}

#[test]
fn entry_serializes_camel_case_without_absent_ids() {
    let entry = JournalEntry::blank(date!(2024 - 04 - 05));
    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(value["date"], "2024-04-05");
    assert_eq!(value["totalAssets"], 0);
    assert_eq!(value["psychologyCheck"]["fearGreedIndex"], 50);
    assert!(value.get("id").is_none());
    assert!(value.get("createdAt").is_none());
    assert!(value["bullMarketChecklist"].as_array().unwrap().is_empty());
}

#[test]
fn fear_greed_is_clamped() {
    let entry: JournalEntry =
        serde_json::from_value(json!({ "date": "2024-01-01", "psychologyCheck": { "fearGreedIndex": 180 } })).unwrap();
    assert_eq!(entry.psychology_check.fear_greed_index, 100);
    assert_eq!(clamp_fear_greed(-4.0), 0);
    assert_eq!(clamp_fear_greed(f64::NAN), DEFAULT_FEAR_GREED_INDEX);
    assert_eq!(clamp_fear_greed(49.6), 50);
}

// =============================================================================
// LineItem
// =============================================================================

#[test]
fn line_item_value_ignores_non_finite() {
    assert!((LineItem::new("A", 2.0, 10.0).value() - 20.0).abs() < f64::EPSILON);
    assert!(LineItem::new("A", f64::NAN, 10.0).value().abs() < f64::EPSILON);
    assert!(LineItem::new("A", 2.0, f64::INFINITY).value().abs() < f64::EPSILON);
}

#[test]
fn line_item_current_value_falls_back_to_entry_price() {
    let mut item = LineItem::new("A", 2.0, 10.0);
    assert!((item.current_value() - 20.0).abs() < f64::EPSILON);
    item.current_price = Some(15.0);
    assert!((item.current_value() - 30.0).abs() < f64::EPSILON);
    item.current_price = Some(0.0);
    assert!((item.current_value() - 20.0).abs() < f64::EPSILON);
}

// =============================================================================
// latest / MarketPhase
// =============================================================================

#[test]
fn latest_picks_max_date() {
    let entries = vec![
        JournalEntry::blank(date!(2024 - 01 - 02)),
        JournalEntry::blank(date!(2024 - 03 - 01)),
        JournalEntry::blank(date!(2024 - 02 - 10)),
    ];
    assert_eq!(JournalEntry::latest(&entries).unwrap().date, date!(2024 - 03 - 01));
    assert!(JournalEntry::latest(&[]).is_none());
}

#[test]
fn market_phase_parses_and_selects_list() {
    assert_eq!(" Bull ".parse::<MarketPhase>(), Ok(MarketPhase::Bull));
    assert_eq!("bear".parse::<MarketPhase>(), Ok(MarketPhase::Bear));
    assert_eq!("sideways".parse::<MarketPhase>(), Err(UnknownPhase("sideways".into())));

    let mut entry = JournalEntry::blank(date!(2024 - 01 - 01));
    MarketPhase::Bear.checklist_mut(&mut entry).push(ChecklistItem::default());
    assert_eq!(entry.bear_market_checklist.len(), 1);
    assert!(entry.bull_market_checklist.is_empty());
}
