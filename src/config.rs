use anyhow::{Context, Result};
use nonzero_ext::nonzero;
use std::env;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_HELIUS_RPC_URL: &str = "https://rpc.helius.xyz";
const DEFAULT_MARKET_DATA_URL: &str = "https://public-api.birdeye.so";
const DEFAULT_REPORTS_DIR: &str = "data";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Ledger indexer base URL. The caller's key is appended per request.
    pub helius_rpc_url: String,
    pub market_data_url: String,
    /// Service-held key shared by every market data lookup.
    pub market_data_api_key: Option<String>,
    pub reports_dir: PathBuf,
    pub upstream_timeout: Duration,
    pub market_data_rate_limit: NonZeroU32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:8080")?;

        let upstream_timeout = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        let market_data_rate_limit = match get("MARKET_DATA_RATE_LIMIT") {
            Some(raw) => raw
                .parse::<NonZeroU32>()
                .context("MARKET_DATA_RATE_LIMIT must be a positive integer")?,
            None => nonzero!(5u32),
        };

        Ok(Self {
            bind_addr,
            helius_rpc_url: get("HELIUS_RPC_URL").unwrap_or_else(|| DEFAULT_HELIUS_RPC_URL.to_string()),
            market_data_url: get("MARKET_DATA_URL").unwrap_or_else(|| DEFAULT_MARKET_DATA_URL.to_string()),
            market_data_api_key: get("MARKET_DATA_API_KEY"),
            reports_dir: PathBuf::from(get("REPORTS_DIR").unwrap_or_else(|| DEFAULT_REPORTS_DIR.to_string())),
            upstream_timeout: Duration::from_secs(upstream_timeout),
            market_data_rate_limit,
        })
    }
}
