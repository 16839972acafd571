use chrono::{DateTime, Utc};
use governor::{clock::DefaultClock, state::{InMemoryState, NotKeyed}, RateLimiter};
use reqwest::Client;
use serde::Deserialize;

use super::error::{ServiceError, ServiceResult};
use crate::types::models::PriceData;

pub const LOOKBACK_SECS: i64 = 7 * 24 * 60 * 60;
const SAMPLE_INTERVAL: &str = "1m";
const PRICES_FAILED: &str = "Failed to fetch price data";

pub type MarketDataLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

#[derive(Debug, Deserialize)]
struct HistoryPriceResponse {
    data: Option<HistoryPriceData>,
}

#[derive(Debug, Deserialize)]
struct HistoryPriceData {
    items: Option<Vec<HistoryPriceItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryPriceItem {
    unix_time: i64,
    value: f64,
}

pub struct MarketDataSource<'a> {
    pub client: &'a Client,
    pub base_url: &'a str,
    pub api_key: Option<&'a str>,
    pub limiter: &'a MarketDataLimiter,
}

fn format_sample_time(unix_time: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(unix_time, 0).map(|t| t.format("%Y-%m-%d %H:%M").to_string())
}

fn upstream(reason: impl std::fmt::Display) -> ServiceError {
    tracing::error!("Price history fetch error: {}", reason);
    ServiceError::Upstream(PRICES_FAILED.to_string())
}

fn into_price_series(body: HistoryPriceResponse) -> ServiceResult<Vec<PriceData>> {
    let items = body
        .data
        .and_then(|data| data.items)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| upstream("no price data returned"))?;

    items
        .into_iter()
        .map(|item| {
            format_sample_time(item.unix_time)
                .map(|date| PriceData { date, price: item.value })
                .ok_or_else(|| upstream(format!("timestamp out of range: {}", item.unix_time)))
        })
        .collect()
}

/// Fetches one-minute price samples for the seven days ending at `now`.
pub async fn fetch_price_history(
    source: &MarketDataSource<'_>,
    mint_address: &str,
    now: DateTime<Utc>,
) -> ServiceResult<Vec<PriceData>> {
    let api_key = source.api_key.filter(|k| !k.is_empty()).ok_or_else(|| {
        ServiceError::Configuration("market data API key is not configured".to_string())
    })?;

    let time_to = now.timestamp();
    let time_from = time_to - LOOKBACK_SECS;
    let url = format!("{}/defi/history_price", source.base_url.trim_end_matches('/'));

    source.limiter.until_ready().await;

    let response = source
        .client
        .get(&url)
        .query(&[
            ("address", mint_address.to_string()),
            ("address_type", "token".to_string()),
            ("type", SAMPLE_INTERVAL.to_string()),
            ("time_from", time_from.to_string()),
            ("time_to", time_to.to_string()),
            ("ui_amount_mode", "raw".to_string()),
        ])
        .header("X-API-KEY", api_key)
        .header("x-chain", "solana")
        .header("accept", "application/json")
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(upstream)?;

    let body: HistoryPriceResponse = response.json().await.map_err(upstream)?;
    let prices = into_price_series(body)?;
    tracing::debug!("Market data returned {} samples for {}", prices.len(), mint_address);
    Ok(prices)
}
