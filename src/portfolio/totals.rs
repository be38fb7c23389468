//! Asset roll-ups: line items → per-class subtotals → total assets in KRW.

use serde::Serialize;

use super::model::{JournalEntry, LineItem, finite_or_zero};

/// Sum of `price * quantity` over a holding list, in the list's own currency.
#[must_use]
pub fn line_items_value(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::value).sum()
}

/// Stored totals are whole, non-negative won: non-finite → 0, else `floor(|x|)`.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn to_safe_integer(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    value.abs().floor() as i64
}

/// Floor to whole won keeping the sign (profit/loss figures).
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn to_whole_krw(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    value.floor() as i64
}

/// Per-asset-class subtotals for one journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBreakdown {
    pub exchange_rate: f64,
    pub foreign_stocks_usd: f64,
    pub foreign_stocks_krw: f64,
    pub domestic_stocks_krw: f64,
    pub crypto_usd: f64,
    pub crypto_krw: f64,
    pub cash_krw: f64,
    pub total_krw: f64,
}

/// Convert every asset class to KRW at `usd_krw` and sum them.
///
/// Foreign stocks and crypto are priced in USD; domestic stocks in KRW.
#[must_use]
pub fn asset_breakdown(entry: &JournalEntry, usd_krw: f64) -> AssetBreakdown {
    let rate = finite_or_zero(usd_krw);
    let foreign_stocks_usd = line_items_value(&entry.foreign_stocks);
    let domestic_stocks_krw = line_items_value(&entry.domestic_stocks);
    let crypto_usd = line_items_value(&entry.cryptocurrency);
    let cash_krw = finite_or_zero(entry.cash.krw) + finite_or_zero(entry.cash.usd) * rate;

    let foreign_stocks_krw = foreign_stocks_usd * rate;
    let crypto_krw = crypto_usd * rate;

    AssetBreakdown {
        exchange_rate: rate,
        foreign_stocks_usd,
        foreign_stocks_krw,
        domestic_stocks_krw,
        crypto_usd,
        crypto_krw,
        cash_krw,
        total_krw: foreign_stocks_krw + domestic_stocks_krw + crypto_krw + cash_krw,
    }
}

#[must_use]
pub fn compute_total_assets(entry: &JournalEntry, usd_krw: f64) -> i64 {
    to_safe_integer(asset_breakdown(entry, usd_krw).total_krw)
}

/// Normalize an entry for storage: server-computed total, whole-won evaluation.
#[must_use]
pub fn prepare_for_save(mut entry: JournalEntry, usd_krw: f64) -> JournalEntry {
    entry.total_assets = compute_total_assets(&entry, usd_krw);
    entry.title = entry.title.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty());
    entry
}

#[cfg(test)]
#[path = "totals_test.rs"]
mod tests;
