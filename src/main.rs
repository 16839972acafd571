use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod services;
mod types;
#[cfg(test)]
mod test_support;

use crate::api::routes::create_router;
use crate::api::state::AppState;
use crate::config::Config;
use crate::services::estimator::RandomBuyPriceEstimator;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    if config.market_data_api_key.is_none() {
        tracing::warn!("MARKET_DATA_API_KEY is not set; every analysis will fail until it is configured");
    }
    tracing::info!("Writing reports to {}", config.reports_dir.display());

    let addr = config.bind_addr;
    let state = AppState::new(config, Arc::new(RandomBuyPriceEstimator))
        .context("Failed to build HTTP client")?;
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Failed to serve API: {:?}", e);
    }

    Ok(())
}
