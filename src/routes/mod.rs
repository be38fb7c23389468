//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API and the Google OAuth redirects under a
//! single Axum router. Handlers translate HTTP to service calls; errors leave
//! as a status code plus `{ "error": message }` so the client can show the
//! message as-is.

pub mod auth;
pub mod charts;
pub mod checklists;
pub mod indicators;
pub mod journals;
pub mod users;

use axum::Router;
use axum::body::to_bytes;
use axum::http::{StatusCode, header};
use axum::middleware;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, patch, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

// =============================================================================
// ERROR BODY
// =============================================================================

/// Error response carrying a user-facing message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        Self { status, message: status.canonical_reason().unwrap_or("error").to_owned() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

const ERROR_BODY_LIMIT: usize = 16 * 1024;

/// Rewrap error responses that did not come from `ApiError` (extractor
/// rejections, 405s) so every failure carries `{ "error": message }`.
async fn json_error_body(resp: Response) -> Response {
    let status = resp.status();
    if !status.is_client_error() && !status.is_server_error() {
        return resp;
    }
    let is_json = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return resp;
    }

    let (parts, body) = resp.into_parts();
    let bytes = to_bytes(body, ERROR_BODY_LIMIT).await.unwrap_or_default();
    let text = String::from_utf8_lossy(&bytes).trim().to_owned();
    let err = if text.is_empty() || status.is_server_error() { ApiError::from(status) } else { ApiError::new(status, text) };

    let mut rewrapped = err.into_response();
    if let Some(allow) = parts.headers.get(header::ALLOW) {
        rewrapped.headers_mut().insert(header::ALLOW, allow.clone());
    }
    rewrapped
}

async fn not_found() -> ApiError {
    ApiError::from(StatusCode::NOT_FOUND)
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/auth/google", get(auth::google_redirect))
        .route("/auth/google/callback", get(auth::google_callback))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/journals", get(journals::list_journals).put(journals::save_journal))
        .route("/api/journals/new", get(journals::new_journal))
        .route("/api/journals/public", get(users::public_feed))
        .route("/api/journals/by-date/{date}", get(journals::get_journal_by_date))
        .route("/api/journals/{id}", get(journals::get_journal).delete(journals::delete_journal))
        .route("/api/journals/{id}/delete-ticket", post(journals::delete_ticket))
        .route("/api/journals/{id}/checklist", patch(journals::toggle_checklist_item))
        .route("/api/charts/asset-change", get(charts::asset_change))
        .route("/api/charts/portfolio", get(charts::portfolio))
        .route("/api/charts/points", get(charts::points))
        .route("/api/indicators/fear-greed", get(indicators::fear_greed))
        .route("/api/indicators/credit-balance", get(indicators::credit_balance))
        .route("/api/indicators/liquidity", get(indicators::liquidity))
        .route("/api/indicators/m2", get(indicators::m2))
        .route("/api/indicators/exchange-rate", get(indicators::exchange_rate))
        .route("/api/indicators/crypto", get(indicators::crypto))
        .route("/api/indicators/upbit/{market}", get(indicators::upbit))
        .route("/api/users/search", get(users::search))
        .route("/api/users/me/profile", get(users::my_profile).put(users::update_my_profile))
        .route("/api/users/{id}/profile", get(users::user_profile))
        .route("/api/users/{id}/journals", get(users::user_journals))
        .route("/api/checklists", get(checklists::get_templates).put(checklists::put_templates))
        .route("/api/checklists/{phase}/items", post(checklists::add_item))
        .route("/api/checklists/{phase}/items/{index}", delete(checklists::remove_item))
        .route("/healthz", get(healthz))
        .fallback(not_found)
        .layer(middleware::map_response(json_error_body))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
