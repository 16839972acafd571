use crate::types::models::{AnalysisResult, BuyPriceEstimate, PriceData, TokenHolder};

pub fn percentage_in_profit(wallets_in_profit: usize, total_wallets: usize) -> f64 {
    if total_wallets > 0 {
        (wallets_in_profit as f64 / total_wallets as f64) * 100.0
    } else {
        0.0
    }
}

/// Counts holders whose estimated buy price is strictly below `price`.
/// Holders missing from the estimate are never in profit.
fn count_in_profit(holders: &[TokenHolder], estimates: &BuyPriceEstimate, price: f64) -> usize {
    holders
        .iter()
        .filter(|holder| estimates.get(&holder.address).is_some_and(|&buy| buy < price))
        .count()
}

/// One result per price sample, in the same order as `prices`. Runs as a
/// single sequential pass over the samples.
pub fn analyze_profitability(
    holders: &[TokenHolder],
    prices: &[PriceData],
    estimates: &BuyPriceEstimate,
) -> Vec<AnalysisResult> {
    let total_wallets = holders.len();

    prices
        .iter()
        .map(|sample| {
            let wallets_in_profit = count_in_profit(holders, estimates, sample.price);
            AnalysisResult {
                date: sample.date.clone(),
                price: sample.price,
                wallets_in_profit,
                total_wallets,
                percentage_in_profit: percentage_in_profit(wallets_in_profit, total_wallets),
            }
        })
        .collect()
}
