//! Bull/bear market self-assessment checklists.
//!
//! A user keeps one template per market phase (the questions offered on
//! every new entry); each journal entry stores the items the user ticked.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{ChecklistItem, MarketPhase, null_as_default};

pub const DEFAULT_BULL_MARKET: [&str; 9] = [
    "내매매를 누군가에게 알려주고싶은가?",
    "주식얘기가 나오면 답답해서 한소리하고싶은가",
    "내입술의 주식관련된 매매의 정당성을 가르치고 싶은가?",
    "과도한 자신감을 일으키는 호르몬의변화가 느껴지는가?",
    "교만과오만",
    "시장의 대중을 무시하는가?",
    "일반적인 직장인들이 불쌍해 보이는가?",
    "현금을 가지고있는게 답답하고 어리석어보이는가?",
    "커보였던금액이 아무것도 아닌것같고 내가 낸 수익률료 비교가 되는가?",
];

pub const DEFAULT_BEAR_MARKET: [&str; 9] = [
    "주식장을 쳐다도 보기싫은가?",
    "똑똑한척 하면서 전에는 없었던 부정적인 전망을 내놓는 전문가들에게 대중이 집중이 되는가?",
    "이전의 고점과 현재의 손실을 계산 하고싶은가?",
    "호르몬의 변화가 일어나 공감능력이 올라갔는가?",
    "낙담했는가?",
    "직장인들이 부러운가?",
    "현금이 너무나 귀하고 지금이라도 얼마정도를 더 챙겨야한다는 불안감이 엄습했는가?",
    "작아보였던 금액이 너무나 소중하고 돈에 관련해서 얘기가나오면 스트레스가 받는가?",
    "억울한가?",
];

/// Question templates offered on new entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistTemplates {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bull_market: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bear_market: Vec<String>,
}

impl Default for ChecklistTemplates {
    fn default() -> Self {
        Self {
            bull_market: DEFAULT_BULL_MARKET.iter().map(|s| (*s).to_owned()).collect(),
            bear_market: DEFAULT_BEAR_MARKET.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

impl ChecklistTemplates {
    /// Trim every question and drop blanks and exact duplicates.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self { bull_market: sanitize(self.bull_market), bear_market: sanitize(self.bear_market) }
    }

    #[must_use]
    pub fn list(&self, phase: MarketPhase) -> &[String] {
        match phase {
            MarketPhase::Bull => &self.bull_market,
            MarketPhase::Bear => &self.bear_market,
        }
    }

    pub fn list_mut(&mut self, phase: MarketPhase) -> &mut Vec<String> {
        match phase {
            MarketPhase::Bull => &mut self.bull_market,
            MarketPhase::Bear => &mut self.bear_market,
        }
    }

    /// Unchecked items for a fresh entry, with ids `bull-0`, `bear-3`, ...
    #[must_use]
    pub fn items(&self, phase: MarketPhase) -> Vec<ChecklistItem> {
        self.list(phase)
            .iter()
            .enumerate()
            .map(|(i, text)| ChecklistItem { id: format!("{}-{i}", phase.as_str()), text: text.clone(), checked: false })
            .collect()
    }

    /// Append a question. Returns `false` for blank or already-present text.
    pub fn add(&mut self, phase: MarketPhase, text: &str) -> bool {
        let text = text.trim();
        let list = self.list_mut(phase);
        if text.is_empty() || list.iter().any(|t| t == text) {
            return false;
        }
        list.push(text.to_owned());
        true
    }

    /// Remove the question at `index`, returning its text.
    pub fn remove(&mut self, phase: MarketPhase, index: usize) -> Option<String> {
        let list = self.list_mut(phase);
        (index < list.len()).then(|| list.remove(index))
    }
}

fn sanitize(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let trimmed = item.trim();
        if !trimmed.is_empty() && !out.iter().any(|t| t == trimmed) {
            out.push(trimmed.to_owned());
        }
    }
    out
}

/// Mark `text` checked or unchecked on an entry's list.
///
/// Checking adds a new checked item when the text is absent; unchecking
/// removes every item with that text.
pub fn toggle(items: &mut Vec<ChecklistItem>, text: &str, checked: bool) {
    let text = text.trim();
    if checked {
        match items.iter_mut().find(|i| i.text == text) {
            Some(existing) => existing.checked = true,
            None => items.push(ChecklistItem { id: Uuid::new_v4().to_string(), text: text.to_owned(), checked: true }),
        }
    } else {
        items.retain(|i| i.text != text);
    }
}

/// Drop items whose question was removed from the template.
pub fn forget(items: &mut Vec<ChecklistItem>, removed_text: &str) {
    items.retain(|i| i.text != removed_text);
}

#[must_use]
pub fn checked_count(items: &[ChecklistItem]) -> usize {
    items.iter().filter(|i| i.checked).count()
}

#[cfg(test)]
#[path = "checklist_test.rs"]
mod tests;
