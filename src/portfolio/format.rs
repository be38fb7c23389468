//! Display helpers for won amounts and sentiment scores.

use serde::Serialize;

const JO: f64 = 1_000_000_000_000.0;
const EOK: f64 = 100_000_000.0;
const MAN: f64 = 10_000.0;

/// `1234567` → `"1,234,567"`.
#[must_use]
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Largest-unit rendering with one decimal: `조원`, `억원`, `만원`, else `원`.
#[must_use]
pub fn format_krw_compact(amount: f64) -> String {
    if !amount.is_finite() {
        return "0원".to_owned();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    if abs >= JO {
        format!("{sign}{:.1}조원", abs / JO)
    } else if abs >= EOK {
        format!("{sign}{:.1}억원", abs / EOK)
    } else if abs >= MAN {
        format!("{sign}{:.1}만원", abs / MAN)
    } else {
        format!("{}원", group_thousands(super::totals::to_whole_krw(amount)))
    }
}

/// Whole-unit rendering used on feed cards: `3억2500만원`, `450만원`, `9,000원`.
#[must_use]
pub fn format_krw_eok_man(amount: i64) -> String {
    const EOK_I: i64 = 100_000_000;
    const MAN_I: i64 = 10_000;
    if amount >= EOK_I {
        let eok = amount / EOK_I;
        let man = (amount % EOK_I) / MAN_I;
        if man > 0 { format!("{eok}억{man}만원") } else { format!("{eok}억원") }
    } else if amount >= MAN_I {
        format!("{}만원", amount / MAN_I)
    } else {
        format!("{}원", group_thousands(amount))
    }
}

/// Fear & Greed bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FearGreedLevel {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl FearGreedLevel {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            75.. => Self::ExtremeGreed,
            55..=74 => Self::Greed,
            45..=54 => Self::Neutral,
            25..=44 => Self::Fear,
            _ => Self::ExtremeFear,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ExtremeFear => "극도의 공포",
            Self::Fear => "공포",
            Self::Neutral => "중립",
            Self::Greed => "탐욕",
            Self::ExtremeGreed => "극도의 탐욕",
        }
    }
}

#[cfg(test)]
#[path = "format_test.rs"]
mod tests;
