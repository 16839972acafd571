use chrono::Utc;

use super::error::ServiceResult;
use super::holders::fetch_token_holders;
use super::prices::{fetch_price_history, MarketDataSource};
use super::profit::analyze_profitability;
use super::report::write_report;
use crate::api::state::AppState;
use crate::types::models::TokenAnalysisResponse;

/// Holders, then prices, then buy price estimates, aggregation and the CSV
/// report. The first failure aborts the whole run.
pub async fn run_analysis(
    state: &AppState,
    mint_address: &str,
    helius_api_key: &str,
) -> ServiceResult<TokenAnalysisResponse> {
    let operation_start = std::time::Instant::now();
    let config = &state.config;

    let holders = fetch_token_holders(
        &config.helius_rpc_url,
        helius_api_key,
        mint_address,
        config.upstream_timeout,
    )
    .await?;
    tracing::info!("Found {} holders", holders.len());

    let source = MarketDataSource {
        client: &state.http,
        base_url: &config.market_data_url,
        api_key: config.market_data_api_key.as_deref(),
        limiter: &state.market_data_limiter,
    };
    let prices = fetch_price_history(&source, mint_address, Utc::now()).await?;
    tracing::info!("Retrieved {} price samples", prices.len());

    let estimates = state.estimator.estimate(&holders);
    tracing::info!("Estimated buy prices for {} holders", estimates.len());

    let results = analyze_profitability(&holders, &prices, &estimates);
    let csv_download_url = write_report(&config.reports_dir, &results, mint_address, Utc::now()).await?;

    tracing::info!("Analysis of {} took: {:?}", mint_address, operation_start.elapsed());
    Ok(TokenAnalysisResponse { results, csv_download_url })
}
