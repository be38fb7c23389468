//! Profile, user search, and public feed routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ApiError;
use super::journals::journal_error_response;
use crate::portfolio::JournalEntry;
use crate::portfolio::format::format_krw_eok_man;
use crate::routes::auth::AuthUser;
use crate::services::journal::{self, PUBLIC_FEED_LIMIT, PublicJournal};
use crate::services::profile::{self, Profile, ProfileError, ProfileUpdate, SEARCH_LIMIT, UserSummary};
use crate::state::AppState;

pub(crate) fn profile_error_to_status(err: &ProfileError) -> StatusCode {
    match err {
        ProfileError::NotFound => StatusCode::NOT_FOUND,
        ProfileError::Validation(_) => StatusCode::BAD_REQUEST,
        ProfileError::NicknameTaken => StatusCode::CONFLICT,
        ProfileError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn profile_error_response(err: ProfileError) -> ApiError {
    let status = profile_error_to_status(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "profile request failed");
        return ApiError::from(status);
    }
    ApiError::new(status, err.to_string())
}

// =============================================================================
// PROFILES
// =============================================================================

/// `GET /api/users/me/profile`
pub async fn my_profile(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Profile>, ApiError> {
    let profile = profile::get_profile(&state.pool, auth.user.id)
        .await
        .map_err(profile_error_response)?;
    Ok(Json(profile))
}

/// `PUT /api/users/me/profile`: nickname, photo URL, visibility.
pub async fn update_my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ProfileUpdate>,
) -> Result<Json<Profile>, ApiError> {
    let profile = profile::update_profile(&state.pool, auth.user.id, body)
        .await
        .map_err(profile_error_response)?;
    tracing::info!(user_id = %auth.user.id, is_public = profile.is_public, "profile updated");
    Ok(Json(profile))
}

/// `GET /api/users/{id}/profile`: someone else's public profile.
pub async fn user_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError> {
    let profile = profile::get_public_profile(&state.pool, auth.user.id, user_id)
        .await
        .map_err(profile_error_response)?;
    Ok(Json(profile))
}

/// `GET /api/users/{id}/journals`: all of the caller's own journals, or only
/// the shared ones of a public user.
pub async fn user_journals(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<JournalEntry>>, ApiError> {
    let journals = if user_id == auth.user.id {
        journal::list_for_user(&state.pool, user_id).await
    } else {
        journal::list_public_for_user(&state.pool, user_id).await
    }
    .map_err(journal_error_response)?;
    Ok(Json(journals))
}

// =============================================================================
// SEARCH & FEED
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// `GET /api/users/search?q=`: empty query returns an empty list.
pub async fn search(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    if query.q.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }
    let users = profile::search_users(&state.pool, &query.q, SEARCH_LIMIT)
        .await
        .map_err(profile_error_response)?;
    Ok(Json(users))
}

/// A feed card: the shared journal plus its total in `N억M만원` form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedCard {
    #[serde(flatten)]
    pub journal: PublicJournal,
    pub total_assets_display: String,
}

impl From<PublicJournal> for FeedCard {
    fn from(journal: PublicJournal) -> Self {
        let total_assets_display = format_krw_eok_man(journal.entry.total_assets);
        Self { journal, total_assets_display }
    }
}

/// `GET /api/journals/public`: most recent shared journals. No sign-in needed.
pub async fn public_feed(State(state): State<AppState>) -> Result<Json<Vec<FeedCard>>, ApiError> {
    let journals = journal::list_public(&state.pool, PUBLIC_FEED_LIMIT)
        .await
        .map_err(journal_error_response)?;
    Ok(Json(journals.into_iter().map(FeedCard::from).collect()))
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
