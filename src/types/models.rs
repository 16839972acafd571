use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `POST /analyze`. Absent and `null` fields both deserialize to
/// `None`; the handler turns either into a 400.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAnalysisRequest {
    #[serde(default)]
    pub token_mint: Option<String>,
    #[serde(default)]
    pub helius_api_key: Option<String>,
}

/// One of the largest token accounts reported by the ledger indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHolder {
    pub address: String,
    pub amount: u64,
    pub decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceData {
    pub date: String,
    pub price: f64,
}

/// Synthetic acquisition price per holder address.
pub type BuyPriceEstimate = HashMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub date: String,
    pub price: f64,
    pub wallets_in_profit: usize,
    pub total_wallets: usize,
    pub percentage_in_profit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAnalysisResponse {
    pub results: Vec<AnalysisResult>,
    pub csv_download_url: String,
}
