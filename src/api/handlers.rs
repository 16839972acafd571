use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use super::error::ApiError;
use super::state::AppState;
use crate::services::pipeline::run_analysis;
use crate::services::report::read_report;
use crate::types::models::{TokenAnalysisRequest, TokenAnalysisResponse};

pub async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

const MISSING_FIELDS: &str = "Missing required field: tokenMint or heliusApiKey";

fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// An unreadable body counts as one with no fields at all.
pub async fn analyze_token(
    State(state): State<AppState>,
    body: Result<Json<TokenAnalysisRequest>, JsonRejection>,
) -> Result<Json<TokenAnalysisResponse>, ApiError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Unreadable analyze body: {}", rejection);
            TokenAnalysisRequest::default()
        }
    };

    let (Some(mint_address), Some(api_key)) =
        (required(&request.token_mint), required(&request.helius_api_key))
    else {
        return Err(ApiError::Validation(MISSING_FIELDS.to_string()));
    };

    tracing::info!("Analyzing token: {}", mint_address);
    let response = run_analysis(&state, mint_address, api_key).await?;
    Ok(Json(response))
}

pub async fn download_report(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = read_report(&state.config.reports_dir, &filename).await?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
    ];
    Ok((headers, bytes))
}
