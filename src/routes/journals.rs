//! Journal routes: list, detail, upsert, blank draft, two-step delete.
//!
//! ERROR HANDLING
//! ==============
//! `JournalError` maps to 404 / 409 / 500. Database failures are logged here
//! and leave as a bare 500 so row details never reach the client.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;
use uuid::Uuid;

use super::ApiError;
use crate::market::cache::{ExchangeRate, RateSource};
use crate::portfolio::checklist::{checked_count, toggle};
use crate::portfolio::totals::{AssetBreakdown, asset_breakdown, prepare_for_save};
use crate::portfolio::{ChecklistItem, JournalEntry, MarketPhase};
use crate::routes::auth::AuthUser;
use crate::services::checklist;
use crate::services::journal::{self, JournalError};
use crate::state::AppState;

pub(crate) fn journal_error_to_status(err: &JournalError) -> StatusCode {
    match err {
        JournalError::NotFound => StatusCode::NOT_FOUND,
        JournalError::InvalidTicket => StatusCode::CONFLICT,
        JournalError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn journal_error_response(err: JournalError) -> ApiError {
    let status = journal_error_to_status(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "journal request failed");
        return ApiError::from(status);
    }
    ApiError::new(status, err.to_string())
}

pub(crate) fn parse_day(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

// =============================================================================
// READ
// =============================================================================

/// Read-only detail view of one journal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalDetail {
    #[serde(flatten)]
    pub journal: JournalEntry,
    pub breakdown: AssetBreakdown,
    pub exchange_rate: ExchangeRate,
    pub bull_checked: usize,
    pub bear_checked: usize,
}

fn detail(journal: JournalEntry, exchange_rate: ExchangeRate) -> JournalDetail {
    JournalDetail {
        breakdown: asset_breakdown(&journal, exchange_rate.usd_krw),
        bull_checked: checked_count(&journal.bull_market_checklist),
        bear_checked: checked_count(&journal.bear_market_checklist),
        exchange_rate,
        journal,
    }
}

/// `GET /api/journals`: caller's journals, newest first.
pub async fn list_journals(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<JournalEntry>>, ApiError> {
    let journals = journal::list_for_user(&state.pool, auth.user.id)
        .await
        .map_err(journal_error_response)?;
    Ok(Json(journals))
}

/// `GET /api/journals/{id}`: one journal with its KRW breakdown.
pub async fn get_journal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JournalDetail>, ApiError> {
    let journal = journal::get_visible(&state.pool, auth.user.id, id)
        .await
        .map_err(journal_error_response)?;
    let rate = state.usd_krw().await;
    Ok(Json(detail(journal, rate)))
}

/// `GET /api/journals/by-date/{date}`: the caller's journal for a day.
pub async fn get_journal_by_date(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_date): Path<String>,
) -> Result<Json<JournalDetail>, ApiError> {
    let Some(date) = parse_day(&raw_date) else {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Date must be YYYY-MM-DD."));
    };
    let journal = journal::get_by_date(&state.pool, auth.user.id, date)
        .await
        .map_err(journal_error_response)?;
    let rate = state.usd_krw().await;
    Ok(Json(detail(journal, rate)))
}

/// `GET /api/journals/new`: blank draft for today with template checklists.
pub async fn new_journal(State(state): State<AppState>, auth: AuthUser) -> Result<Json<JournalEntry>, ApiError> {
    let templates = checklist::load(&state.pool, auth.user.id).await.map_err(|e| {
        tracing::error!(error = %e, "checklist template load failed");
        ApiError::from(StatusCode::INTERNAL_SERVER_ERROR)
    })?;

    let mut draft = JournalEntry::blank(state.today());
    draft.bull_market_checklist = templates.items(MarketPhase::Bull);
    draft.bear_market_checklist = templates.items(MarketPhase::Bear);
    Ok(Json(draft))
}

// =============================================================================
// WRITE
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveJournalBody {
    #[serde(flatten)]
    pub journal: JournalEntry,
    #[serde(default)]
    pub exchange_rate: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJournal {
    pub id: Uuid,
    pub total_assets: i64,
    pub exchange_rate: ExchangeRate,
}

/// Rate supplied by the client when usable, otherwise the cached rate.
async fn rate_for_save(state: &AppState, supplied: Option<f64>) -> ExchangeRate {
    match supplied {
        Some(rate) if rate.is_finite() && rate > 0.0 => ExchangeRate { usd_krw: rate, source: RateSource::Client },
        _ => state.usd_krw().await,
    }
}

/// `PUT /api/journals`: upsert on (user, date); total assets recomputed here.
pub async fn save_journal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SaveJournalBody>,
) -> Result<Json<SavedJournal>, ApiError> {
    let exchange_rate = rate_for_save(&state, body.exchange_rate).await;
    let journal = prepare_for_save(body.journal, exchange_rate.usd_krw);
    let id = journal::upsert(&state.pool, auth.user.id, &journal)
        .await
        .map_err(journal_error_response)?;

    tracing::info!(%id, user_id = %auth.user.id, date = %journal.date, "journal saved");
    Ok(Json(SavedJournal { id, total_assets: journal.total_assets, exchange_rate }))
}

#[derive(Debug, Deserialize)]
pub struct ToggleChecklistBody {
    pub phase: MarketPhase,
    pub text: String,
    #[serde(default)]
    pub checked: bool,
}

/// `PATCH /api/journals/{id}/checklist`: check or uncheck one question.
pub async fn toggle_checklist_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ToggleChecklistBody>,
) -> Result<Json<Vec<ChecklistItem>>, ApiError> {
    if body.text.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Checklist text is required."));
    }

    let mut journal = journal::get_visible(&state.pool, auth.user.id, id)
        .await
        .map_err(journal_error_response)?;
    if journal.user_id != Some(auth.user.id) {
        return Err(journal_error_response(JournalError::NotFound));
    }

    let items = body.phase.checklist_mut(&mut journal);
    toggle(items, &body.text, body.checked);
    journal::set_checklist(&state.pool, auth.user.id, id, body.phase, items)
        .await
        .map_err(journal_error_response)?;
    Ok(Json(items.clone()))
}

// =============================================================================
// DELETE
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTicket {
    pub ticket: String,
    pub expires_in_secs: u32,
}

const DELETE_TICKET_SECS: u32 = 300;

/// `POST /api/journals/{id}/delete-ticket`: first step of deletion.
pub async fn delete_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteTicket>, ApiError> {
    let ticket = journal::issue_delete_ticket(&state.pool, auth.user.id, id)
        .await
        .map_err(journal_error_response)?;
    Ok(Json(DeleteTicket { ticket, expires_in_secs: DELETE_TICKET_SECS }))
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub ticket: String,
}

/// `DELETE /api/journals/{id}?ticket=...`: consume the ticket and delete.
pub async fn delete_journal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, ApiError> {
    journal::delete_with_ticket(&state.pool, auth.user.id, id, &query.ticket)
        .await
        .map_err(journal_error_response)?;
    tracing::info!(%id, user_id = %auth.user.id, "journal deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "journals_test.rs"]
mod tests;
