//! Per-attempt usage reporting.
//!
//! The gateway hands one [`CallRecord`] per provider attempt to a [`UsageSink`]. The CLI
//! logs them through `tracing`; tests discard them or collect them.

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallStatus {
    Success,
    /// Failed attempt with the provider error code (`ProviderError::code`).
    Error(String),
}

/// One provider attempt for one analysis request.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub model: String,
    pub caller: &'static str,
    pub owner_id: Option<String>,
    /// Zero-based retry index.
    pub attempt: u32,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub latency_ms: u64,
    pub status: CallStatus,
}

#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn record(&self, record: CallRecord);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUsageSink;

#[async_trait]
impl UsageSink for NoopUsageSink {
    async fn record(&self, _record: CallRecord) {}
}

/// Emits one structured event per attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingUsageSink;

#[async_trait]
impl UsageSink for TracingUsageSink {
    async fn record(&self, record: CallRecord) {
        let owner = record.owner_id.as_deref().unwrap_or("anonymous");
        match &record.status {
            CallStatus::Success => tracing::info!(
                model = %record.model,
                caller = record.caller,
                owner,
                attempt = record.attempt,
                input_tokens = record.input_tokens,
                output_tokens = record.output_tokens,
                latency_ms = record.latency_ms,
                "analysis call succeeded"
            ),
            CallStatus::Error(code) => tracing::warn!(
                model = %record.model,
                caller = record.caller,
                owner,
                attempt = record.attempt,
                error_code = %code,
                "analysis call failed"
            ),
        }
    }
}
