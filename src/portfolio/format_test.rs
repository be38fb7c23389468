use super::*;

#[test]
fn group_thousands_inserts_commas() {
    assert_eq!(group_thousands(0), "0");
    assert_eq!(group_thousands(999), "999");
    assert_eq!(group_thousands(1000), "1,000");
    assert_eq!(group_thousands(1_234_567), "1,234,567");
    assert_eq!(group_thousands(-45_000), "-45,000");
}

#[test]
fn compact_picks_largest_unit() {
    assert_eq!(format_krw_compact(2_500_000_000_000.0), "2.5조원");
    assert_eq!(format_krw_compact(320_000_000.0), "3.2억원");
    assert_eq!(format_krw_compact(45_000.0), "4.5만원");
    assert_eq!(format_krw_compact(9_999.0), "9,999원");
    assert_eq!(format_krw_compact(-50_000_000_000.0), "-500.0억원");
    assert_eq!(format_krw_compact(f64::NAN), "0원");
}

#[test]
fn eok_man_format() {
    assert_eq!(format_krw_eok_man(325_000_000), "3억2500만원");
    assert_eq!(format_krw_eok_man(300_000_000), "3억원");
    assert_eq!(format_krw_eok_man(4_500_000), "450만원");
    assert_eq!(format_krw_eok_man(9_000), "9,000원");
}

#[test]
fn fear_greed_bands() {
    assert_eq!(FearGreedLevel::from_score(100), FearGreedLevel::ExtremeGreed);
    assert_eq!(FearGreedLevel::from_score(75), FearGreedLevel::ExtremeGreed);
    assert_eq!(FearGreedLevel::from_score(74), FearGreedLevel::Greed);
    assert_eq!(FearGreedLevel::from_score(55), FearGreedLevel::Greed);
    assert_eq!(FearGreedLevel::from_score(50), FearGreedLevel::Neutral);
    assert_eq!(FearGreedLevel::from_score(44), FearGreedLevel::Fear);
    assert_eq!(FearGreedLevel::from_score(24), FearGreedLevel::ExtremeFear);
    assert_eq!(FearGreedLevel::from_score(0).label(), "극도의 공포");
}

#[test]
fn fear_greed_level_serializes_snake_case() {
    let v = serde_json::to_value(FearGreedLevel::ExtremeGreed).unwrap();
    assert_eq!(v, "extreme_greed");
}
