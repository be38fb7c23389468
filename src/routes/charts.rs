//! Chart routes. Each handler loads the caller's journals once and hands
//! them to the pure reductions in `portfolio::charts`.

use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::ApiError;
use super::journals::journal_error_response;
use crate::market::{INDEX_HISTORY_DAYS, MarketIndex};
use crate::portfolio::JournalEntry;
use crate::portfolio::charts::{self, AssetChange, ChartPoint, Period, PortfolioSummary, SeriesPoint};
use crate::routes::auth::AuthUser;
use crate::services::journal;
use crate::state::AppState;

async fn load_entries(state: &AppState, auth: &AuthUser) -> Result<Vec<JournalEntry>, ApiError> {
    journal::list_for_user(&state.pool, auth.user.id)
        .await
        .map_err(journal_error_response)
}

/// Daily closes for an overlay, newest `INDEX_HISTORY_DAYS` only. Provider
/// failures degrade to an empty overlay.
pub(crate) async fn index_overlay(state: &AppState, index: MarketIndex) -> Vec<SeriesPoint> {
    match state.market.daily_closes(index.symbol()).await {
        Ok(mut closes) => {
            closes.sort_by_key(|p| p.date);
            let skip = closes.len().saturating_sub(INDEX_HISTORY_DAYS);
            closes.split_off(skip)
        }
        Err(e) => {
            tracing::warn!(error = %e, symbol = index.symbol(), "index overlay unavailable");
            Vec::new()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AssetChangeQuery {
    #[serde(default)]
    pub period: Period,
    pub compare: Option<MarketIndex>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetChangeResponse {
    #[serde(flatten)]
    pub change: AssetChange,
    pub compare: Option<MarketIndex>,
}

/// `GET /api/charts/asset-change?period=3m&compare=sp500`
pub async fn asset_change(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AssetChangeQuery>,
) -> Result<Json<AssetChangeResponse>, ApiError> {
    let entries = load_entries(&state, &auth).await?;
    let overlay = match query.compare {
        Some(index) => index_overlay(&state, index).await,
        None => Vec::new(),
    };
    let change = charts::asset_change(&entries, query.period, state.today(), &overlay);
    Ok(Json(AssetChangeResponse { change, compare: query.compare }))
}

/// `GET /api/charts/portfolio`: composition and performance of the latest entry.
pub async fn portfolio(State(state): State<AppState>, auth: AuthUser) -> Result<Json<PortfolioSummary>, ApiError> {
    let entries = load_entries(&state, &auth).await?;
    let rate = state.usd_krw().await;
    Ok(Json(charts::portfolio_summary(&entries, rate.usd_krw)))
}

/// `GET /api/charts/points`: clickable trend points.
pub async fn points(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<ChartPoint>>, ApiError> {
    let entries = load_entries(&state, &auth).await?;
    Ok(Json(charts::chart_points(&entries)))
}

#[cfg(test)]
#[path = "charts_test.rs"]
mod tests;
