use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use std::io;
use std::path::{Path, PathBuf};

use super::error::{ServiceError, ServiceResult};
use crate::types::models::AnalysisResult;

pub const CSV_HEADERS: [&str; 5] = ["Date", "Price ($)", "Wallets in Profit", "Total Wallets", "% In Profit"];
pub const DOWNLOAD_ROUTE: &str = "/download";
const FILENAME_PREFIX: &str = "token_profit";
const MINT_PREFIX_LEN: usize = 8;

pub fn render_csv(results: &[AnalysisResult]) -> ServiceResult<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    let to_io = |e: csv::Error| ServiceError::Io(io::Error::new(io::ErrorKind::Other, e));

    writer.write_record(CSV_HEADERS).map_err(to_io)?;
    for r in results {
        writer
            .write_record([
                r.date.clone(),
                format!("{:.4}", r.price),
                r.wallets_in_profit.to_string(),
                r.total_wallets.to_string(),
                format!("{:.2}", r.percentage_in_profit),
            ])
            .map_err(to_io)?;
    }

    let bytes = writer.into_inner().map_err(|e| ServiceError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ServiceError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// `token_profit_{mint prefix}_{unix millis}.csv`. Only alphanumeric mint
/// characters make it into the name.
pub fn report_filename(mint_address: &str, now: DateTime<Utc>) -> String {
    let prefix: String = mint_address
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MINT_PREFIX_LEN)
        .collect();
    format!("{}_{}_{}.csv", FILENAME_PREFIX, prefix, now.timestamp_millis())
}

pub fn download_url(filename: &str) -> String {
    format!("{}/{}", DOWNLOAD_ROUTE, filename)
}

/// Writes the report into `dir` and returns the path it can be downloaded from.
pub async fn write_report(
    dir: &Path,
    results: &[AnalysisResult],
    mint_address: &str,
    now: DateTime<Utc>,
) -> ServiceResult<String> {
    let body = render_csv(results)?;
    tokio::fs::create_dir_all(dir).await?;

    let filename = report_filename(mint_address, now);
    let path = dir.join(&filename);
    tokio::fs::write(&path, body).await?;
    tracing::info!("Wrote report {}", path.display());

    Ok(download_url(&filename))
}

pub fn validate_report_filename(filename: &str) -> ServiceResult<()> {
    let unsafe_name = filename.is_empty()
        || !filename.ends_with(".csv")
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\');
    if unsafe_name {
        return Err(ServiceError::InvalidInput("Invalid filename".to_string()));
    }
    Ok(())
}

pub fn report_path(dir: &Path, filename: &str) -> ServiceResult<PathBuf> {
    validate_report_filename(filename)?;
    Ok(dir.join(filename))
}

pub async fn read_report(dir: &Path, filename: &str) -> ServiceResult<Vec<u8>> {
    let path = report_path(dir, filename)?;
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(ServiceError::NotFound("File not found".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
