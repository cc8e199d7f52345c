//! Side-channel export of submissions to an external sheet-like sink.
//!
//! Best effort: one POST per submission, no retries. Callers log failures and move on.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

/// Flattened submission row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    /// Local wall-clock time of submission, human readable.
    pub timestamp: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub idea: String,
    pub score: Option<f64>,
    pub remarks: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("export sink returned HTTP {status}")]
    Status { status: u16 },
    #[error("export sink misconfigured: {0}")]
    Config(String),
}

#[async_trait]
pub trait ExportSink: Send + Sync {
    async fn export(&self, row: &ExportRow) -> Result<(), ExportError>;
}

/// Used when no export URL is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExportSink;

#[async_trait]
impl ExportSink for NoopExportSink {
    async fn export(&self, _row: &ExportRow) -> Result<(), ExportError> {
        tracing::debug!("export sink not configured; row dropped");
        Ok(())
    }
}

/// POSTs each row as JSON to a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpExportSink {
    client: reqwest::Client,
    url: String,
}

impl HttpExportSink {
    pub fn new(url: impl Into<String>) -> Result<Self, ExportError> {
        Self::with_timeout(url, Duration::from_secs(10))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, ExportError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(ExportError::Config("empty export URL".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExportError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ExportSink for HttpExportSink {
    async fn export(&self, row: &ExportRow) -> Result<(), ExportError> {
        let response = self.client.post(&self.url).json(row).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
