//! Journal record types and their JSON shape.
//!
//! DESIGN
//! ======
//! The wire format is the camelCase document the journal form submits.
//! Nested holdings and checklists are stored as opaque `jsonb`, so every
//! field deserializes leniently: `null` or missing collections become empty,
//! numbers may arrive as strings, and legacy snake_case keys are accepted.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

pub const DEFAULT_FEAR_GREED_INDEX: u8 = 50;

// =============================================================================
// LENIENT FIELD DECODERS
// =============================================================================

fn value_to_f64(value: Option<Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_f64(Option::<Value>::deserialize(deserializer)?))
}

/// Whole-won amounts: fractional input is floored, sign is kept.
pub(crate) fn lenient_krw<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(super::totals::to_whole_krw(value_to_f64(Option::<Value>::deserialize(
        deserializer,
    )?)))
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_fear_greed<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    if matches!(raw, None | Some(Value::Null)) {
        return Ok(DEFAULT_FEAR_GREED_INDEX);
    }
    Ok(clamp_fear_greed(value_to_f64(raw)))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn clamp_fear_greed(score: f64) -> u8 {
    if !score.is_finite() {
        return DEFAULT_FEAR_GREED_INDEX;
    }
    score.round().clamp(0.0, 100.0) as u8
}

fn default_fear_greed() -> u8 {
    DEFAULT_FEAR_GREED_INDEX
}

// =============================================================================
// HOLDINGS
// =============================================================================

/// One holding row: a stock, ETF, or coin position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub quantity: f64,
    /// Entry price, in USD for foreign stocks and crypto, KRW for domestic.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
}

impl LineItem {
    #[must_use]
    pub fn new(symbol: &str, quantity: f64, price: f64) -> Self {
        Self { id: None, symbol: symbol.to_owned(), quantity, price, current_price: None }
    }

    /// `price * quantity`, treating non-finite inputs as zero.
    #[must_use]
    pub fn value(&self) -> f64 {
        finite_or_zero(self.price) * finite_or_zero(self.quantity)
    }

    /// Market value at `current_price`, or the entry value when unknown.
    #[must_use]
    pub fn current_value(&self) -> f64 {
        match self.current_price.filter(|p| p.is_finite() && *p > 0.0) {
            Some(current) => current * finite_or_zero(self.quantity),
            None => self.value(),
        }
    }
}

pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cash {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub krw: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub usd: f64,
}

// =============================================================================
// PSYCHOLOGY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsychologyCheck {
    #[serde(default = "default_fear_greed", deserialize_with = "lenient_fear_greed")]
    pub fear_greed_index: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_concern: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m2_money_supply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_fear: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overconfidence: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fomo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_trading: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_deviation: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub market_sentiments: Vec<String>,
}

impl Default for PsychologyCheck {
    fn default() -> Self {
        Self {
            fear_greed_index: DEFAULT_FEAR_GREED_INDEX,
            credit_concern: None,
            confidence_level: None,
            m2_money_supply: None,
            market_fear: None,
            overconfidence: None,
            fomo: None,
            emotional_trading: None,
            plan_deviation: None,
            market_sentiments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub checked: bool,
}

// =============================================================================
// JOURNAL ENTRY
// =============================================================================

/// One day's snapshot of a user's holdings and sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub date: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, alias = "total_assets", deserialize_with = "lenient_krw")]
    pub total_assets: i64,
    #[serde(default, deserialize_with = "lenient_krw")]
    pub evaluation: i64,
    #[serde(default, alias = "foreign_stocks", deserialize_with = "null_as_default")]
    pub foreign_stocks: Vec<LineItem>,
    #[serde(default, alias = "domestic_stocks", deserialize_with = "null_as_default")]
    pub domestic_stocks: Vec<LineItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cash: Cash,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cryptocurrency: Vec<LineItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trades: String,
    #[serde(default, alias = "psychology_check", deserialize_with = "null_as_default")]
    pub psychology_check: PsychologyCheck,
    #[serde(default, alias = "bull_market_checklist", deserialize_with = "null_as_default")]
    pub bull_market_checklist: Vec<ChecklistItem>,
    #[serde(default, alias = "bear_market_checklist", deserialize_with = "null_as_default")]
    pub bear_market_checklist: Vec<ChecklistItem>,
    #[serde(default, alias = "market_issues", deserialize_with = "null_as_default")]
    pub market_issues: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub memo: String,
    #[serde(default, alias = "is_public", deserialize_with = "null_as_default")]
    pub is_public: bool,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<OffsetDateTime>,
}

impl JournalEntry {
    /// An empty entry for `date` with the neutral psychology defaults.
    #[must_use]
    pub fn blank(date: Date) -> Self {
        Self {
            id: None,
            user_id: None,
            date,
            title: None,
            total_assets: 0,
            evaluation: 0,
            foreign_stocks: Vec::new(),
            domestic_stocks: Vec::new(),
            cash: Cash::default(),
            cryptocurrency: Vec::new(),
            trades: String::new(),
            psychology_check: PsychologyCheck::default(),
            bull_market_checklist: Vec::new(),
            bear_market_checklist: Vec::new(),
            market_issues: String::new(),
            memo: String::new(),
            is_public: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Most recent entry by calendar date.
    #[must_use]
    pub fn latest(entries: &[Self]) -> Option<&Self> {
        entries.iter().max_by_key(|e| e.date)
    }
}

/// Which sentiment checklist an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketPhase {
    Bull,
    Bear,
}

impl MarketPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bull => "bull",
            Self::Bear => "bear",
        }
    }

    pub fn checklist_mut(self, entry: &mut JournalEntry) -> &mut Vec<ChecklistItem> {
        match self {
            Self::Bull => &mut entry.bull_market_checklist,
            Self::Bear => &mut entry.bear_market_checklist,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown market phase: {0}")]
pub struct UnknownPhase(pub String);

impl FromStr for MarketPhase {
    type Err = UnknownPhase;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bull" => Ok(Self::Bull),
            "bear" => Ok(Self::Bear),
            _ => Err(UnknownPhase(raw.to_owned())),
        }
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
