use crate::config::Settings;
use crate::domain::transaction::TransactionRecord;
use crate::ingest::parse::parse_transactions;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn load(&self) -> Result<Vec<TransactionRecord>>;
}

#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(settings.require_data_path()?))
    }
}

#[async_trait::async_trait]
impl DataSource for CsvFileSource {
    fn source_name(&self) -> &'static str {
        "csv_file"
    }

    async fn load(&self) -> Result<Vec<TransactionRecord>> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("failed to open transaction log {}", self.path.display()))?;
        parse_transactions(file)
            .with_context(|| format!("failed to parse transaction log {}", self.path.display()))
    }
}

/// Fetches the transaction log as CSV over HTTP(S). One attempt, no retries.
#[derive(Debug, Clone)]
pub struct HttpCsvSource {
    http: reqwest::Client,
    url: String,
}

impl HttpCsvSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build transaction log http client")?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let url = settings
            .data_url
            .as_deref()
            .context("KPI_DATA_URL is required")?;
        Self::new(url, Duration::from_secs(settings.data_timeout_secs))
    }
}

#[async_trait::async_trait]
impl DataSource for HttpCsvSource {
    fn source_name(&self) -> &'static str {
        "http_csv"
    }

    async fn load(&self) -> Result<Vec<TransactionRecord>> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("transaction log request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read transaction log response")?;

        if !status.is_success() {
            anyhow::bail!("transaction log HTTP {status}: {}", truncate(&text, 200));
        }

        parse_transactions(text.as_bytes()).context("failed to parse transaction log response")
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
