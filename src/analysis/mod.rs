//! Analysis Request Function: idea text in, normalized [`AnalysisResult`] out.

pub mod normalize;
pub mod prompt;
pub mod types;

pub use normalize::{extract_json, normalize_analysis, normalize_value, MalformedAnalysisError};
pub use prompt::{render_analysis_prompt, AnalysisPrompt};
pub use types::{AnalysisResult, Quarter, Roadmap, Score, ScoreGrade, SCORE_MAX, SCORE_MIN};

use crate::gateway::{Attribution, ChatGateway, ChatRequest, FinishReason, ProviderError};

/// Token cap for one analysis response. Pitches are a few paragraphs.
const MAX_ANALYSIS_TOKENS: u32 = 2_048;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analysis request failed: {0}")]
    RequestFailed(#[from] ProviderError),
    #[error("analysis request returned no content")]
    EmptyResponse,
    #[error("malformed analysis: {0}")]
    Malformed(#[from] MalformedAnalysisError),
}

impl AnalysisError {
    /// Stable error code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::RequestFailed(e) => e.code(),
            AnalysisError::EmptyResponse => "empty_response",
            AnalysisError::Malformed(_) => "malformed_analysis",
        }
    }
}

/// Ask the model to evaluate `idea_text` and normalize its answer.
///
/// Retries happen inside the gateway; nothing here is retried.
pub async fn request_analysis(
    gateway: &dyn ChatGateway,
    model: &str,
    idea_text: &str,
    owner_id: Option<&str>,
) -> Result<AnalysisResult, AnalysisError> {
    let prompt = render_analysis_prompt(idea_text);

    let mut attribution = Attribution::new("analysis::request");
    if let Some(owner) = owner_id {
        attribution = attribution.with_owner(owner);
    }

    let request = ChatRequest::new(model, prompt.to_messages(), attribution)
        .temperature(0.7)
        .max_tokens(MAX_ANALYSIS_TOKENS)
        .json();

    let response = gateway.chat(request).await?;
    if response.finish_reason == FinishReason::Length {
        tracing::warn!(
            max_tokens = MAX_ANALYSIS_TOKENS,
            "analysis reply hit the token limit"
        );
    }
    if response.content.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    let result = normalize_analysis(&response.content)?;
    tracing::debug!(
        template = prompt.template_slug,
        score = ?result.score_value(),
        developments = result.key_developments.len(),
        deployment_steps = result.deployment_steps.len(),
        "analysis normalized"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{ChatResponse, FinishReason};
    use std::sync::Mutex;
    use std::time::Duration;

    struct CannedGateway {
        reply: Mutex<Option<Result<String, ProviderError>>>,
        seen_owner: Mutex<Option<String>>,
    }

    impl CannedGateway {
        fn new(reply: Result<String, ProviderError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                seen_owner: Mutex::new(None),
            }
        }
    }

    #[async_trait::async_trait]
    impl ChatGateway for CannedGateway {
        async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, ProviderError> {
            assert!(req.json_mode);
            *self.seen_owner.lock().unwrap() = req.attribution.owner_id.clone();
            let content = self.reply.lock().unwrap().take().unwrap()?;
            Ok(ChatResponse {
                content,
                input_tokens: 10,
                output_tokens: 20,
                latency: Duration::from_millis(1),
                finish_reason: FinishReason::Stop,
            })
        }
    }

    #[tokio::test]
    async fn normalizes_successful_reply() {
        let gateway = CannedGateway::new(Ok(
            r#"{"score": {"value": 72, "reasoning": "Solid niche market"}}"#.into(),
        ));
        let result = request_analysis(&gateway, "m", "coffee", Some("u1"))
            .await
            .unwrap();
        assert_eq!(result.score_value(), Some(72.0));
        assert_eq!(gateway.seen_owner.lock().unwrap().as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn blank_reply_is_empty_response() {
        let gateway = CannedGateway::new(Ok("  \n".into()));
        let err = request_analysis(&gateway, "m", "coffee", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyResponse));
        assert_eq!(err.code(), "empty_response");
    }

    #[tokio::test]
    async fn malformed_reply_is_malformed() {
        let gateway = CannedGateway::new(Ok(r#"{"score": {"value": 140}}"#.into()));
        let err = request_analysis(&gateway, "m", "coffee", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Malformed(MalformedAnalysisError::ScoreOutOfRange(_))
        ));
    }

    #[tokio::test]
    async fn provider_failure_is_request_failed() {
        let gateway = CannedGateway::new(Err(ProviderError::refused("I cannot help")));
        let err = request_analysis(&gateway, "m", "coffee", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::RequestFailed(_)));
    }
}
