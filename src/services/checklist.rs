//! Per-user checklist templates.
//!
//! Users without a saved row get the built-in bull/bear question sets.

use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::journal::{JournalError, decode_json};
use crate::portfolio::checklist::{ChecklistTemplates, forget};
use crate::portfolio::{ChecklistItem, MarketPhase};

const UPSERT_TEMPLATES: &str = r"INSERT INTO user_checklists (user_id, bull_market, bear_market)
    VALUES ($1, $2, $3)
    ON CONFLICT (user_id) DO UPDATE SET
        bull_market = EXCLUDED.bull_market,
        bear_market = EXCLUDED.bear_market,
        updated_at = now()";

pub async fn load(pool: &PgPool, user_id: Uuid) -> Result<ChecklistTemplates, sqlx::Error> {
    let row = sqlx::query("SELECT bull_market, bear_market FROM user_checklists WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(match row {
        Some(r) => {
            let Json(bull): Json<serde_json::Value> = r.get("bull_market");
            let Json(bear): Json<serde_json::Value> = r.get("bear_market");
            ChecklistTemplates {
                bull_market: decode_json(bull, "bull_market"),
                bear_market: decode_json(bear, "bear_market"),
            }
        }
        None => ChecklistTemplates::default(),
    })
}

/// Store sanitized templates and return what was stored.
pub async fn save(pool: &PgPool, user_id: Uuid, templates: ChecklistTemplates) -> Result<ChecklistTemplates, sqlx::Error> {
    let templates = templates.sanitized();
    sqlx::query(UPSERT_TEMPLATES)
        .bind(user_id)
        .bind(Json(&templates.bull_market))
        .bind(Json(&templates.bear_market))
        .execute(pool)
        .await?;
    Ok(templates)
}

/// Store templates after a question was removed and drop that question from
/// one of the caller's journals, all in one transaction. A journal that is
/// missing or owned by someone else leaves both rows untouched.
pub async fn save_and_forget(
    pool: &PgPool,
    user_id: Uuid,
    templates: ChecklistTemplates,
    journal_id: Uuid,
    phase: MarketPhase,
    removed: &str,
) -> Result<ChecklistTemplates, JournalError> {
    let column = match phase {
        MarketPhase::Bull => "bull_market_checklist",
        MarketPhase::Bear => "bear_market_checklist",
    };

    let mut tx = pool.begin().await?;
    let row = sqlx::query(&format!(
        "SELECT {column} FROM investment_journals WHERE id = $1 AND user_id = $2 FOR UPDATE"
    ))
    .bind(journal_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(row) = row else {
        return Err(JournalError::NotFound);
    };

    let Json(raw): Json<serde_json::Value> = row.get(column);
    let mut items: Vec<ChecklistItem> = decode_json(raw, column);
    forget(&mut items, removed);
    sqlx::query(&format!(
        "UPDATE investment_journals SET {column} = $3, updated_at = now() WHERE id = $1 AND user_id = $2"
    ))
    .bind(journal_id)
    .bind(user_id)
    .bind(Json(&items))
    .execute(&mut *tx)
    .await?;

    let templates = templates.sanitized();
    sqlx::query(UPSERT_TEMPLATES)
        .bind(user_id)
        .bind(Json(&templates.bull_market))
        .bind(Json(&templates.bear_market))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(templates)
}

#[cfg(all(test, feature = "live-db-tests"))]
#[path = "checklist_test.rs"]
mod tests;
