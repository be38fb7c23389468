use super::*;

#[test]
fn defaults_have_nine_questions_each() {
    let t = ChecklistTemplates::default();
    assert_eq!(t.bull_market.len(), 9);
    assert_eq!(t.bear_market.len(), 9);
    assert_eq!(t.bear_market[8], "억울한가?");
}

#[test]
fn items_are_unchecked_with_phase_ids() {
    let t = ChecklistTemplates::default();
    let bull = t.items(MarketPhase::Bull);
    assert_eq!(bull[0].id, "bull-0");
    assert_eq!(t.items(MarketPhase::Bear)[3].id, "bear-3");
    assert!(bull.iter().all(|i| !i.checked));
}

#[test]
fn sanitized_trims_and_dedupes() {
    let t = ChecklistTemplates {
        bull_market: vec!["  a ".into(), String::new(), "a".into(), "b".into()],
        bear_market: vec!["   ".into()],
    }
    .sanitized();
    assert_eq!(t.bull_market, vec!["a".to_owned(), "b".to_owned()]);
    assert!(t.bear_market.is_empty());
}

#[test]
fn templates_deserialize_with_null_lists() {
    let t: ChecklistTemplates = serde_json::from_str(r#"{"bullMarket":["x"],"bearMarket":null}"#).unwrap();
    assert_eq!(t.bull_market, vec!["x".to_owned()]);
    assert!(t.bear_market.is_empty());
}

#[test]
fn add_rejects_blank_and_duplicate() {
    let mut t = ChecklistTemplates { bull_market: vec![], bear_market: vec![] };
    assert!(t.add(MarketPhase::Bull, " new "));
    assert!(!t.add(MarketPhase::Bull, "new"));
    assert!(!t.add(MarketPhase::Bull, "  "));
    assert_eq!(t.bull_market, vec!["new".to_owned()]);
}

#[test]
fn remove_returns_text_or_none() {
    let mut t = ChecklistTemplates::default();
    assert_eq!(t.remove(MarketPhase::Bear, 8).as_deref(), Some("억울한가?"));
    assert_eq!(t.bear_market.len(), 8);
    assert!(t.remove(MarketPhase::Bear, 99).is_none());
}

#[test]
fn toggle_adds_and_removes_by_text() {
    let mut items = Vec::new();
    toggle(&mut items, "q1", true);
    toggle(&mut items, "q2", true);
    toggle(&mut items, "q1", true);
    assert_eq!(items.len(), 2);
    assert_eq!(checked_count(&items), 2);

    toggle(&mut items, "q1", false);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].text, "q2");
}

#[test]
fn toggle_checks_existing_unchecked_item() {
    let mut items = ChecklistTemplates::default().items(MarketPhase::Bull);
    let text = items[2].text.clone();
    toggle(&mut items, &text, true);
    assert_eq!(items.len(), 9);
    assert_eq!(checked_count(&items), 1);
    assert_eq!(items[2].id, "bull-2");
}

#[test]
fn forget_drops_matching_items() {
    let mut items = vec![
        ChecklistItem { id: "1".into(), text: "a".into(), checked: true },
        ChecklistItem { id: "2".into(), text: "b".into(), checked: true },
    ];
    forget(&mut items, "a");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].text, "b");
}
