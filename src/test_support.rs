//! In-process stand-ins for the ledger indexer and market data upstreams.

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

pub const TEST_MINT: &str = "So11111111111111111111111111111111111111112";
pub const TEST_MARKET_KEY: &str = "market-key";

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn balance(address: &str, amount: u64, decimals: u8) -> Value {
    json!({
        "address": address,
        "amount": amount.to_string(),
        "decimals": decimals,
        "uiAmount": amount as f64 / 10f64.powi(decimals as i32),
        "uiAmountString": (amount as f64 / 10f64.powi(decimals as i32)).to_string(),
    })
}

/// JSON-RPC indexer answering `getTokenLargestAccounts` with `balances`.
pub fn indexer(balances: Vec<Value>, hits: Arc<AtomicUsize>) -> Router {
    Router::new().route(
        "/",
        post(move |Json(req): Json<Value>| {
            let balances = balances.clone();
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                let result = match req["method"].as_str() {
                    Some("getVersion") => json!({ "solana-core": "1.17.0", "feature-set": 0 }),
                    _ => json!({ "context": { "slot": 1 }, "value": balances }),
                };
                Json(json!({ "jsonrpc": "2.0", "result": result, "id": req["id"] }))
            }
        }),
    )
}

/// JSON-RPC indexer that rejects every call.
pub fn failing_indexer() -> Router {
    Router::new().route(
        "/",
        post(|Json(req): Json<Value>| async move {
            Json(json!({
                "jsonrpc": "2.0",
                "error": { "code": -32602, "message": "Invalid param: could not find mint" },
                "id": req["id"],
            }))
        }),
    )
}

pub fn price_item(unix_time: i64, value: f64) -> Value {
    json!({ "address": TEST_MINT, "unixTime": unix_time, "value": value })
}

/// Market data provider serving `items` for requests that carry the expected
/// key and the seven day, one minute parameterization.
pub fn market_data(items: Vec<Value>, hits: Arc<AtomicUsize>) -> Router {
    Router::new().route(
        "/defi/history_price",
        get(move |Query(params): Query<HashMap<String, String>>, headers: HeaderMap| {
            let items = items.clone();
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                let key = headers.get("x-api-key").and_then(|v| v.to_str().ok());
                if key != Some(TEST_MARKET_KEY) {
                    return (StatusCode::UNAUTHORIZED, Json(json!({ "success": false }))).into_response();
                }
                let from = params.get("time_from").and_then(|v| v.parse::<i64>().ok());
                let to = params.get("time_to").and_then(|v| v.parse::<i64>().ok());
                let window_ok = matches!((from, to), (Some(f), Some(t)) if t - f == 7 * 24 * 60 * 60);
                let shape_ok = params.get("type").map(String::as_str) == Some("1m")
                    && params.get("address_type").map(String::as_str) == Some("token")
                    && headers.get("x-chain").and_then(|v| v.to_str().ok()) == Some("solana");
                if !window_ok || !shape_ok {
                    return (StatusCode::BAD_REQUEST, Json(json!({ "success": false }))).into_response();
                }
                Json(json!({ "success": true, "data": { "items": items } })).into_response()
            }
        }),
    )
}

/// Market data provider returning an arbitrary body.
pub fn raw_market_data(body: Value) -> Router {
    Router::new().route(
        "/defi/history_price",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    )
}
