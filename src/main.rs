mod config;
mod db;
mod market;
mod portfolio;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let port = config.port;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    let market = market::http::HttpMarketData::new(config.market_http_timeout, config.alpha_vantage_key.clone())
        .expect("market http client init failed");
    if config.alpha_vantage_key.is_none() {
        tracing::warn!("ALPHA_VANTAGE_API_KEY not set: index overlays disabled");
    }
    if config.google.is_none() {
        tracing::warn!("Google OAuth not configured: password sign-in only");
    }

    let state = state::AppState::new(pool, config, Arc::new(market));

    // Spawn background expiry sweep.
    let _purge = services::session::spawn_purge_task(state.pool.clone());

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "invest-journal listening");
    axum::serve(listener, app).await.expect("server failed");
}
