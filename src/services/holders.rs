use solana_account_decoder::parse_token::UiTokenAmount;
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_response::RpcTokenAccountBalance};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::str::FromStr;
use std::time::Duration;

use super::error::{ServiceError, ServiceResult};
use crate::types::models::TokenHolder;

const HOLDERS_FAILED: &str = "Failed to fetch holders from Solana RPC";

fn indexer_url(base_url: &str, api_key: &str) -> ServiceResult<String> {
    let base = format!("{}/", base_url.trim_end_matches('/'));
    reqwest::Url::parse_with_params(&base, &[("api-key", api_key)])
        .map(String::from)
        .map_err(|e| {
            tracing::error!("Invalid ledger indexer URL {}: {}", base_url, e);
            ServiceError::Configuration(format!("invalid ledger indexer URL: {}", base_url))
        })
}

fn raw_amount(amount: &UiTokenAmount) -> Option<u64> {
    amount.amount.parse::<u64>().ok()
}

fn to_holder(balance: RpcTokenAccountBalance) -> Option<TokenHolder> {
    let amount = raw_amount(&balance.amount)?;
    Some(TokenHolder {
        address: balance.address,
        amount,
        decimals: balance.amount.decimals,
    })
}

/// Fetches the largest token accounts for `mint_address`.
///
/// The indexer caps this list itself (typically the top 20 accounts), so the
/// result is not the full holder set.
pub async fn fetch_token_holders(
    rpc_base_url: &str,
    api_key: &str,
    mint_address: &str,
    timeout: Duration,
) -> ServiceResult<Vec<TokenHolder>> {
    if api_key.trim().is_empty() {
        return Err(ServiceError::Configuration(
            "Helius API key is required for Solana RPC requests".to_string(),
        ));
    }

    let mint_pubkey = Pubkey::from_str(mint_address).map_err(|e| {
        tracing::error!("Invalid mint address {}: {}", mint_address, e);
        ServiceError::Upstream(HOLDERS_FAILED.to_string())
    })?;

    let client = RpcClient::new_with_timeout_and_commitment(
        indexer_url(rpc_base_url, api_key)?,
        timeout,
        CommitmentConfig::confirmed(),
    );

    let balances = client
        .get_token_largest_accounts(&mint_pubkey)
        .await
        .map_err(|e| {
            tracing::error!("Solana RPC error: {:?}", e);
            ServiceError::Upstream(HOLDERS_FAILED.to_string())
        })?;

    balances
        .into_iter()
        .map(|balance| {
            let address = balance.address.clone();
            to_holder(balance).ok_or_else(|| {
                tracing::error!("Unparsable token amount for account {}", address);
                ServiceError::Upstream(HOLDERS_FAILED.to_string())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{balance, failing_indexer, indexer, spawn_upstream, TEST_MINT};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn api_key_is_appended_as_query_parameter() {
        let url = indexer_url("https://rpc.helius.xyz/", "abc+/=").unwrap();
        assert_eq!(url, "https://rpc.helius.xyz/?api-key=abc%2B%2F%3D");
    }

    #[tokio::test]
    async fn missing_key_is_a_configuration_error() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = spawn_upstream(indexer(vec![], hits.clone())).await;

        let err = fetch_token_holders(&url, "  ", TEST_MINT, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn largest_accounts_become_holders() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = spawn_upstream(indexer(
            vec![balance("AccountA", 5_000_000_000, 9), balance("AccountB", 42, 6)],
            hits,
        ))
        .await;

        let holders = fetch_token_holders(&url, "key", TEST_MINT, TIMEOUT).await.unwrap();
        assert_eq!(
            holders,
            vec![
                TokenHolder { address: "AccountA".to_string(), amount: 5_000_000_000, decimals: 9 },
                TokenHolder { address: "AccountB".to_string(), amount: 42, decimals: 6 },
            ]
        );
    }

    #[tokio::test]
    async fn rpc_error_is_an_upstream_error() {
        let url = spawn_upstream(failing_indexer()).await;

        let err = fetch_token_holders(&url, "key", TEST_MINT, TIMEOUT).await.unwrap_err();
        match err {
            ServiceError::Upstream(message) => assert_eq!(message, HOLDERS_FAILED),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_mint_is_an_upstream_error() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = spawn_upstream(indexer(vec![], hits.clone())).await;

        let err = fetch_token_holders(&url, "key", "not-a-mint", TIMEOUT).await.unwrap_err();
        assert!(matches!(err, ServiceError::Upstream(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unreachable_indexer_is_an_upstream_error() {
        let err = fetch_token_holders("http://127.0.0.1:1", "key", TEST_MINT, TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Upstream(_)));
    }
}
