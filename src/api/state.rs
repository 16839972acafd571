use governor::{Quota, RateLimiter};
use reqwest::Client;
use std::sync::Arc;

use crate::config::Config;
use crate::services::estimator::BuyPriceEstimator;
use crate::services::prices::MarketDataLimiter;

/// Shared by every request. Holds clients and settings only, no analysis data.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: Client,
    pub market_data_limiter: Arc<MarketDataLimiter>,
    pub estimator: Arc<dyn BuyPriceEstimator>,
}

impl AppState {
    pub fn new(config: Config, estimator: Arc<dyn BuyPriceEstimator>) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.upstream_timeout).build()?;
        let market_data_limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            config.market_data_rate_limit,
        )));

        Ok(Self {
            config: Arc::new(config),
            http,
            market_data_limiter,
            estimator,
        })
    }
}
