use super::*;

#[test]
fn phase_parsing() {
    assert_eq!(parse_phase("bull").unwrap(), MarketPhase::Bull);
    assert_eq!(parse_phase(" BEAR ").unwrap(), MarketPhase::Bear);
    let err = parse_phase("flat").unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[test]
fn add_rejects_blank_and_duplicate() {
    let mut templates = ChecklistTemplates::default();
    let before = templates.bull_market.len();

    let err = add_to(&mut templates, MarketPhase::Bull, "   ").unwrap_err();
    assert_eq!(err.message, "Please enter a question.");

    let existing = templates.bull_market[0].clone();
    let err = add_to(&mut templates, MarketPhase::Bull, &existing).unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(templates.bull_market.len(), before);

    add_to(&mut templates, MarketPhase::Bull, "  레버리지를 쓰고 있는가?  ").unwrap();
    assert_eq!(templates.bull_market.last().map(String::as_str), Some("레버리지를 쓰고 있는가?"));
}

#[test]
fn remove_query_journal_is_optional() {
    let q: RemoveItemQuery = serde_json::from_value(serde_json::json!({})).unwrap();
    assert!(q.journal.is_none());
}
