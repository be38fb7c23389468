//! Chart series derived from journal entries.
//!
//! DESIGN
//! ======
//! Every function here is a pure reduction over an in-memory slice of
//! entries. Route handlers fetch rows, call into this module, and hand the
//! resulting series to the client's charting library unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Date, Month};
use uuid::Uuid;

use super::model::JournalEntry;
use super::totals::asset_breakdown;

// =============================================================================
// PERIOD FILTER
// =============================================================================

/// Look-back window for the asset-change chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "3y")]
    ThreeYears,
    #[serde(rename = "all")]
    All,
}

impl Period {
    #[must_use]
    pub fn months(self) -> Option<u32> {
        match self {
            Self::ThreeMonths => Some(3),
            Self::SixMonths => Some(6),
            Self::OneYear => Some(12),
            Self::ThreeYears => Some(36),
            Self::All => None,
        }
    }

    /// First date included in the window, or `None` for the full history.
    #[must_use]
    pub fn cutoff(self, today: Date) -> Option<Date> {
        self.months().map(|m| months_before(today, m))
    }
}

/// Step back whole calendar months, clamping the day to the target month.
#[must_use]
pub fn months_before(date: Date, months: u32) -> Date {
    let months = i32::try_from(months).unwrap_or(i32::MAX / 2);
    let index = date.year() * 12 + i32::from(u8::from(date.month())) - 1 - months;
    let year = index.div_euclid(12);
    let month_offset = u8::try_from(index.rem_euclid(12)).unwrap_or(0);
    let month = Month::January.nth_next(month_offset);
    let day = date.day().min(month.length(year));
    Date::from_calendar_date(year, month, day).unwrap_or(date)
}

/// Entries on or after the period's cutoff, order preserved.
#[must_use]
pub fn filter_by_period(entries: &[JournalEntry], period: Period, today: Date) -> Vec<&JournalEntry> {
    match period.cutoff(today) {
        Some(cutoff) => entries.iter().filter(|e| e.date >= cutoff).collect(),
        None => entries.iter().collect(),
    }
}

// =============================================================================
// SERIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: Date,
    pub total_assets: i64,
    pub evaluation: i64,
}

/// Date-ascending total-asset trend. A zero evaluation falls back to the total.
#[must_use]
pub fn asset_trend(entries: &[JournalEntry]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = entries
        .iter()
        .map(|e| TrendPoint {
            date: e.date,
            total_assets: e.total_assets,
            evaluation: if e.evaluation == 0 { e.total_assets } else { e.evaluation },
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: Date,
    pub value: f64,
}

/// Rescale a series so its first value reads 100.
///
/// A non-positive or non-finite base yields an all-zero series.
#[must_use]
pub fn normalize(points: &[SeriesPoint]) -> Vec<SeriesPoint> {
    let base = points.first().map_or(0.0, |p| p.value);
    let usable = base.is_finite() && base > 0.0;
    points
        .iter()
        .map(|p| SeriesPoint { date: p.date, value: if usable { p.value / base * 100.0 } else { 0.0 } })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetChange {
    pub period: Period,
    pub user: Vec<SeriesPoint>,
    pub index: Vec<SeriesPoint>,
}

/// Normalized total-asset series for `period`, optionally overlaid with a
/// market index series (already date-ascending) normalized the same way.
#[must_use]
pub fn asset_change(entries: &[JournalEntry], period: Period, today: Date, index: &[SeriesPoint]) -> AssetChange {
    let mut filtered = filter_by_period(entries, period, today);
    filtered.sort_by_key(|e| e.date);
    #[allow(clippy::cast_precision_loss)]
    let raw: Vec<SeriesPoint> = filtered
        .iter()
        .map(|e| SeriesPoint { date: e.date, value: e.total_assets as f64 })
        .collect();
    AssetChange { period, user: normalize(&raw), index: normalize(index) }
}

/// One clickable point on the trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub date: Date,
    pub total_assets: i64,
    pub journal_id: Option<Uuid>,
    pub has_journal: bool,
}

#[must_use]
pub fn chart_points(entries: &[JournalEntry]) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = entries
        .iter()
        .map(|e| ChartPoint { date: e.date, total_assets: e.total_assets, journal_id: e.id, has_journal: e.id.is_some() })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

// =============================================================================
// PORTFOLIO COMPOSITION
// =============================================================================

pub const FOREIGN_STOCK_LABEL: &str = "해외주식";
pub const DOMESTIC_STOCK_LABEL: &str = "국내주식";
pub const CRYPTO_LABEL: &str = "암호화폐";
pub const CASH_LABEL: &str = "현금";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSlice {
    pub name: String,
    pub value: f64,
    pub investment: f64,
    #[serde(rename = "return")]
    pub gain: f64,
    pub return_rate: f64,
    pub percent: f64,
}

fn slice(name: String, investment: f64, value: f64) -> DistributionSlice {
    let gain = value - investment;
    let return_rate = if investment > 0.0 { gain / investment * 100.0 } else { 0.0 };
    DistributionSlice { name, value, investment, gain, return_rate, percent: 0.0 }
}

/// Pie-chart slices for one entry, all valued in KRW, largest first. Rows
/// that share a class and symbol collapse into one slice.
#[must_use]
pub fn asset_distribution(entry: &JournalEntry, usd_krw: f64) -> Vec<DistributionSlice> {
    let rate = asset_breakdown(entry, usd_krw).exchange_rate;
    let mut totals: Vec<(String, f64, f64)> = Vec::new();
    let mut add = |name: String, investment: f64, value: f64| {
        match totals.iter_mut().find(|(n, _, _)| *n == name) {
            Some((_, inv, val)) => {
                *inv += investment;
                *val += value;
            }
            None => totals.push((name, investment, value)),
        }
    };

    let classes = [
        (FOREIGN_STOCK_LABEL, &entry.foreign_stocks, rate),
        (DOMESTIC_STOCK_LABEL, &entry.domestic_stocks, 1.0),
        (CRYPTO_LABEL, &entry.cryptocurrency, rate),
    ];
    for (label, items, fx) in classes {
        for item in items.iter().filter(|i| !i.symbol.trim().is_empty()) {
            add(format!("{label}-{}", item.symbol.trim()), item.value() * fx, item.current_value() * fx);
        }
    }

    if entry.cash.krw > 0.0 {
        add(format!("{CASH_LABEL}-KRW"), entry.cash.krw, entry.cash.krw);
    }
    if entry.cash.usd > 0.0 {
        let krw = entry.cash.usd * rate;
        add(format!("{CASH_LABEL}-USD"), krw, krw);
    }

    let mut slices: Vec<DistributionSlice> = totals
        .into_iter()
        .map(|(name, investment, value)| slice(name, investment, value))
        .collect();

    let total: f64 = slices.iter().map(|s| s.value).sum();
    if total > 0.0 {
        for s in &mut slices {
            s.percent = s.value / total * 100.0;
        }
    }
    slices.sort_by(|a, b| b.value.total_cmp(&a.value));
    slices
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRow {
    pub name: String,
    pub investment: f64,
    pub current_value: f64,
    pub return_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    pub month: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_investment: f64,
    pub total_value: f64,
    pub total_return: f64,
    pub return_rate: f64,
    pub distribution: Vec<DistributionSlice>,
    pub performance: Vec<PerformanceRow>,
    pub monthly: Vec<MonthlyPoint>,
    pub time_series: Vec<TrendPoint>,
}

#[must_use]
pub fn month_key(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}

/// Highest recorded total per `YYYY-MM`, month-ascending. Zero totals skipped.
#[must_use]
pub fn monthly_maxima(entries: &[JournalEntry]) -> Vec<MonthlyPoint> {
    let mut months: BTreeMap<String, i64> = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.total_assets != 0) {
        let slot = months.entry(month_key(entry.date)).or_insert(0);
        *slot = (*slot).max(entry.total_assets);
    }
    months.into_iter().map(|(month, amount)| MonthlyPoint { month, amount }).collect()
}

/// Composition and performance of the latest entry plus history series.
#[must_use]
pub fn portfolio_summary(entries: &[JournalEntry], usd_krw: f64) -> PortfolioSummary {
    let distribution = JournalEntry::latest(entries).map_or_else(Vec::new, |latest| asset_distribution(latest, usd_krw));

    let total_investment: f64 = distribution.iter().map(|s| s.investment).sum();
    let total_value: f64 = distribution.iter().map(|s| s.value).sum();
    let total_return = total_value - total_investment;
    let return_rate = if total_investment > 0.0 { total_return / total_investment * 100.0 } else { 0.0 };

    let performance = distribution
        .iter()
        .map(|s| PerformanceRow {
            name: s.name.clone(),
            investment: s.investment,
            current_value: s.value,
            return_rate: s.return_rate,
        })
        .collect();

    PortfolioSummary {
        total_investment,
        total_value,
        total_return,
        return_rate,
        distribution,
        performance,
        monthly: monthly_maxima(entries),
        time_series: asset_trend(entries),
    }
}

#[cfg(test)]
#[path = "charts_test.rs"]
mod tests;
