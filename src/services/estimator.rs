use rand::Rng;

use crate::types::models::{BuyPriceEstimate, TokenHolder};

/// Assigns each holder the price at which it is assumed to have bought in.
///
/// Implementations only ever see the holder set; they are free to consult
/// other sources (e.g. transaction history) as long as every distinct address
/// ends up with exactly one price.
pub trait BuyPriceEstimator: Send + Sync {
    fn estimate(&self, holders: &[TokenHolder]) -> BuyPriceEstimate;
}

/// Placeholder heuristic: the buy price is drawn at random, it is NOT derived
/// from any on-chain acquisition. `base` is uniform in [50, 200) and is then
/// shifted by up to +/-15%.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomBuyPriceEstimator;

impl BuyPriceEstimator for RandomBuyPriceEstimator {
    fn estimate(&self, holders: &[TokenHolder]) -> BuyPriceEstimate {
        random_buy_prices(holders, &mut rand::thread_rng())
    }
}

pub fn random_buy_price<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let base = 50.0 + rng.gen::<f64>() * 150.0;
    let variation = (rng.gen::<f64>() - 0.5) * 0.3;
    base * (1.0 + variation)
}

pub fn random_buy_prices<R: Rng + ?Sized>(holders: &[TokenHolder], rng: &mut R) -> BuyPriceEstimate {
    let mut prices = BuyPriceEstimate::with_capacity(holders.len());
    for holder in holders {
        // last draw wins for repeated addresses
        prices.insert(holder.address.clone(), random_buy_price(rng));
    }
    prices
}
