//! Journal persistence: upsert by day, listing, detail, two-step delete.
//!
//! DESIGN
//! ======
//! One row per (user, date). Holdings, psychology, and checklists are stored
//! as `jsonb` and decoded with the same lenient rules as request bodies, so
//! rows written by older clients still load.
//!
//! Deleting needs a confirmation ticket issued by a prior call. Tickets are
//! hashed at rest, bound to one user and journal, expire after five minutes,
//! and are consumed on first use.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use time::Date;
use tracing::warn;
use uuid::Uuid;

use super::session::{generate_ticket, hash_ticket};
use crate::portfolio::{ChecklistItem, JournalEntry, MarketPhase};

pub const PUBLIC_FEED_LIMIT: i64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("journal not found")]
    NotFound,
    #[error("delete confirmation is missing or expired")]
    InvalidTicket,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

const JOURNAL_COLUMNS: &str = r"j.id, j.user_id, j.date, j.title, j.total_assets, j.evaluation,
    j.foreign_stocks, j.domestic_stocks, j.cash, j.cryptocurrency, j.trades,
    j.psychology_check, j.bull_market_checklist, j.bear_market_checklist,
    j.market_issues, j.memo, j.is_public, j.created_at, j.updated_at";

// =============================================================================
// ROW DECODING
// =============================================================================

/// Decode a `jsonb` column, falling back to the type's default on bad data.
pub(crate) fn decode_json<T>(value: Value, column: &'static str) -> T
where
    T: DeserializeOwned + Default,
{
    if value.is_null() {
        return T::default();
    }
    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!(column, error = %e, "undecodable jsonb column; using default");
        T::default()
    })
}

fn json_column(row: &PgRow, column: &'static str) -> Value {
    row.get::<Option<Json<Value>>, _>(column)
        .map(|Json(v)| v)
        .unwrap_or(Value::Null)
}

fn entry_from_row(row: &PgRow) -> JournalEntry {
    JournalEntry {
        id: Some(row.get("id")),
        user_id: Some(row.get("user_id")),
        date: row.get("date"),
        title: row.get("title"),
        total_assets: row.get("total_assets"),
        evaluation: row.get("evaluation"),
        foreign_stocks: decode_json(json_column(row, "foreign_stocks"), "foreign_stocks"),
        domestic_stocks: decode_json(json_column(row, "domestic_stocks"), "domestic_stocks"),
        cash: decode_json(json_column(row, "cash"), "cash"),
        cryptocurrency: decode_json(json_column(row, "cryptocurrency"), "cryptocurrency"),
        trades: row.get("trades"),
        psychology_check: decode_json(json_column(row, "psychology_check"), "psychology_check"),
        bull_market_checklist: decode_json(json_column(row, "bull_market_checklist"), "bull_market_checklist"),
        bear_market_checklist: decode_json(json_column(row, "bear_market_checklist"), "bear_market_checklist"),
        market_issues: row.get("market_issues"),
        memo: row.get("memo"),
        is_public: row.get("is_public"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// =============================================================================
// QUERIES
// =============================================================================

/// All of a user's journals, newest date first.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<JournalEntry>, JournalError> {
    let rows = sqlx::query(&format!(
        "SELECT {JOURNAL_COLUMNS} FROM investment_journals j WHERE j.user_id = $1 ORDER BY j.date DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(entry_from_row).collect())
}

/// A journal the viewer owns, or any public journal.
pub async fn get_visible(pool: &PgPool, viewer: Uuid, id: Uuid) -> Result<JournalEntry, JournalError> {
    let row = sqlx::query(&format!(
        "SELECT {JOURNAL_COLUMNS} FROM investment_journals j WHERE j.id = $1 AND (j.user_id = $2 OR j.is_public)"
    ))
    .bind(id)
    .bind(viewer)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(entry_from_row).ok_or(JournalError::NotFound)
}

pub async fn get_by_date(pool: &PgPool, user_id: Uuid, date: Date) -> Result<JournalEntry, JournalError> {
    let row = sqlx::query(&format!(
        "SELECT {JOURNAL_COLUMNS} FROM investment_journals j WHERE j.user_id = $1 AND j.date = $2"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(entry_from_row).ok_or(JournalError::NotFound)
}

/// Insert or replace the user's journal for `entry.date`. Returns its id.
///
/// The caller is expected to have run `totals::prepare_for_save` so
/// `total_assets` is server-computed.
pub async fn upsert(pool: &PgPool, user_id: Uuid, entry: &JournalEntry) -> Result<Uuid, JournalError> {
    let row = sqlx::query(
        r"INSERT INTO investment_journals (
              user_id, date, title, total_assets, evaluation,
              foreign_stocks, domestic_stocks, cash, cryptocurrency, trades,
              psychology_check, bull_market_checklist, bear_market_checklist,
              market_issues, memo, is_public
          )
          VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
          ON CONFLICT (user_id, date) DO UPDATE SET
              title = EXCLUDED.title,
              total_assets = EXCLUDED.total_assets,
              evaluation = EXCLUDED.evaluation,
              foreign_stocks = EXCLUDED.foreign_stocks,
              domestic_stocks = EXCLUDED.domestic_stocks,
              cash = EXCLUDED.cash,
              cryptocurrency = EXCLUDED.cryptocurrency,
              trades = EXCLUDED.trades,
              psychology_check = EXCLUDED.psychology_check,
              bull_market_checklist = EXCLUDED.bull_market_checklist,
              bear_market_checklist = EXCLUDED.bear_market_checklist,
              market_issues = EXCLUDED.market_issues,
              memo = EXCLUDED.memo,
              is_public = EXCLUDED.is_public,
              updated_at = now()
          RETURNING id",
    )
    .bind(user_id)
    .bind(entry.date)
    .bind(&entry.title)
    .bind(entry.total_assets)
    .bind(entry.evaluation)
    .bind(Json(&entry.foreign_stocks))
    .bind(Json(&entry.domestic_stocks))
    .bind(Json(&entry.cash))
    .bind(Json(&entry.cryptocurrency))
    .bind(&entry.trades)
    .bind(Json(&entry.psychology_check))
    .bind(Json(&entry.bull_market_checklist))
    .bind(Json(&entry.bear_market_checklist))
    .bind(&entry.market_issues)
    .bind(&entry.memo)
    .bind(entry.is_public)
    .fetch_one(pool)
    .await?;
    Ok(row.get("id"))
}

/// Replace one sentiment checklist on a journal the user owns.
pub async fn set_checklist(
    pool: &PgPool,
    user_id: Uuid,
    journal_id: Uuid,
    phase: MarketPhase,
    items: &[ChecklistItem],
) -> Result<(), JournalError> {
    let sql = match phase {
        MarketPhase::Bull => {
            "UPDATE investment_journals SET bull_market_checklist = $3, updated_at = now() WHERE id = $1 AND user_id = $2"
        }
        MarketPhase::Bear => {
            "UPDATE investment_journals SET bear_market_checklist = $3, updated_at = now() WHERE id = $1 AND user_id = $2"
        }
    };
    let result = sqlx::query(sql)
        .bind(journal_id)
        .bind(user_id)
        .bind(Json(items))
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(JournalError::NotFound);
    }
    Ok(())
}

/// Issue a one-time delete confirmation for a journal the user owns.
pub async fn issue_delete_ticket(pool: &PgPool, user_id: Uuid, journal_id: Uuid) -> Result<String, JournalError> {
    let owned = sqlx::query("SELECT 1 FROM investment_journals WHERE id = $1 AND user_id = $2")
        .bind(journal_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    if owned.is_none() {
        return Err(JournalError::NotFound);
    }

    let ticket = generate_ticket();
    sqlx::query("INSERT INTO journal_delete_tickets (ticket_hash, user_id, journal_id) VALUES ($1, $2, $3)")
        .bind(hash_ticket(&ticket))
        .bind(user_id)
        .bind(journal_id)
        .execute(pool)
        .await?;
    Ok(ticket)
}

/// Consume `ticket` and delete the journal. The ticket must match the same
/// user and journal and still be unexpired.
pub async fn delete_with_ticket(pool: &PgPool, user_id: Uuid, journal_id: Uuid, ticket: &str) -> Result<(), JournalError> {
    if ticket.trim().is_empty() {
        return Err(JournalError::InvalidTicket);
    }

    let mut tx = pool.begin().await?;
    let consumed = sqlx::query(
        r"DELETE FROM journal_delete_tickets
          WHERE ticket_hash = $1 AND user_id = $2 AND journal_id = $3 AND expires_at > now()
          RETURNING journal_id",
    )
    .bind(hash_ticket(ticket))
    .bind(user_id)
    .bind(journal_id)
    .fetch_optional(&mut *tx)
    .await?;
    if consumed.is_none() {
        return Err(JournalError::InvalidTicket);
    }

    let deleted = sqlx::query("DELETE FROM investment_journals WHERE id = $1 AND user_id = $2")
        .bind(journal_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(JournalError::NotFound);
    }
    tx.commit().await?;
    Ok(())
}

// =============================================================================
// PUBLIC FEED
// =============================================================================

/// A shared journal with its author, for the public feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicJournal {
    #[serde(flatten)]
    pub entry: JournalEntry,
    pub author_nickname: String,
    pub author_photo_url: Option<String>,
}

/// Most recent public journals across all users.
pub async fn list_public(pool: &PgPool, limit: i64) -> Result<Vec<PublicJournal>, JournalError> {
    let rows = sqlx::query(&format!(
        r"SELECT {JOURNAL_COLUMNS}, u.nickname AS author_nickname, u.photo_url AS author_photo_url
          FROM investment_journals j
          JOIN users u ON u.id = j.user_id
          WHERE j.is_public AND u.is_public
          ORDER BY j.date DESC, j.updated_at DESC
          LIMIT $1"
    ))
    .bind(limit.clamp(1, 100))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| PublicJournal {
            entry: entry_from_row(r),
            author_nickname: r.get("author_nickname"),
            author_photo_url: r.get("author_photo_url"),
        })
        .collect())
}

/// One author's public journals, newest first.
pub async fn list_public_for_user(pool: &PgPool, author: Uuid) -> Result<Vec<JournalEntry>, JournalError> {
    let rows = sqlx::query(&format!(
        r"SELECT {JOURNAL_COLUMNS}
          FROM investment_journals j
          JOIN users u ON u.id = j.user_id
          WHERE j.user_id = $1 AND j.is_public AND u.is_public
          ORDER BY j.date DESC"
    ))
    .bind(author)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(entry_from_row).collect())
}

#[cfg(test)]
#[path = "journal_test.rs"]
mod tests;
