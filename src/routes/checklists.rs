//! Checklist template routes.
//!
//! Templates are per-user question lists that seed the bull and bear
//! checklists of new journals. Removing a question can also drop it from a
//! journal that is open in the editor, passed as `?journal=<id>`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::ApiError;
use super::journals::journal_error_response;
use crate::portfolio::MarketPhase;
use crate::portfolio::checklist::ChecklistTemplates;
use crate::routes::auth::AuthUser;
use crate::services::checklist;
use crate::state::AppState;

fn db_error(e: &sqlx::Error) -> ApiError {
    tracing::error!(error = %e, "checklist template query failed");
    ApiError::from(StatusCode::INTERNAL_SERVER_ERROR)
}

fn parse_phase(raw: &str) -> Result<MarketPhase, ApiError> {
    raw.parse::<MarketPhase>().map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Phase must be bull or bear."))
}

/// `GET /api/checklists`
pub async fn get_templates(State(state): State<AppState>, auth: AuthUser) -> Result<Json<ChecklistTemplates>, ApiError> {
    let templates = checklist::load(&state.pool, auth.user.id).await.map_err(|e| db_error(&e))?;
    Ok(Json(templates))
}

/// `PUT /api/checklists`: replace both lists.
pub async fn put_templates(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ChecklistTemplates>,
) -> Result<Json<ChecklistTemplates>, ApiError> {
    let stored = checklist::save(&state.pool, auth.user.id, body)
        .await
        .map_err(|e| db_error(&e))?;
    Ok(Json(stored))
}

#[derive(Debug, Deserialize)]
pub struct AddItemBody {
    #[serde(default)]
    pub text: String,
}

/// Add `text` to one list, rejecting blanks and duplicates.
pub(crate) fn add_to(templates: &mut ChecklistTemplates, phase: MarketPhase, text: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Please enter a question."));
    }
    if !templates.add(phase, text) {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "That question is already on the list."));
    }
    Ok(())
}

/// `POST /api/checklists/{phase}/items`
pub async fn add_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(phase): Path<String>,
    Json(body): Json<AddItemBody>,
) -> Result<Json<ChecklistTemplates>, ApiError> {
    let phase = parse_phase(&phase)?;
    let mut templates = checklist::load(&state.pool, auth.user.id).await.map_err(|e| db_error(&e))?;
    add_to(&mut templates, phase, &body.text)?;
    let stored = checklist::save(&state.pool, auth.user.id, templates)
        .await
        .map_err(|e| db_error(&e))?;
    Ok(Json(stored))
}

#[derive(Debug, Default, Deserialize)]
pub struct RemoveItemQuery {
    pub journal: Option<Uuid>,
}

/// `DELETE /api/checklists/{phase}/items/{index}[?journal=<id>]`
pub async fn remove_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((phase, index)): Path<(String, usize)>,
    Query(query): Query<RemoveItemQuery>,
) -> Result<Json<ChecklistTemplates>, ApiError> {
    let phase = parse_phase(&phase)?;
    let mut templates = checklist::load(&state.pool, auth.user.id).await.map_err(|e| db_error(&e))?;
    let Some(removed) = templates.remove(phase, index) else {
        return Err(ApiError::new(StatusCode::NOT_FOUND, "No question at that position."));
    };
    let stored = match query.journal {
        Some(journal_id) => checklist::save_and_forget(&state.pool, auth.user.id, templates, journal_id, phase, &removed)
            .await
            .map_err(journal_error_response)?,
        None => checklist::save(&state.pool, auth.user.id, templates)
            .await
            .map_err(|e| db_error(&e))?,
    };
    Ok(Json(stored))
}

#[cfg(test)]
#[path = "checklists_test.rs"]
mod tests;
