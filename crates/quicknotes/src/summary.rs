//! Summarization gateway: note text in, provider summary out.

use crate::error::{CoreError, CoreResult};
use crate::llm::{CompletionRequest, PromptMessage, SharedCompletionProvider, DEFAULT_MODEL};

pub const SUMMARY_PROMPT: &str = "Please provide a concise summary of the following text: ";
pub const SUMMARY_MAX_TOKENS: u32 = 1024;

pub const CONTENT_REQUIRED: &str = "Content is required";
pub const MISSING_API_KEY: &str = "API key configuration error";

/// Stateless proxy to the completion provider.
///
/// Each call makes at most one provider request and keeps nothing afterwards.
#[derive(Clone)]
pub struct SummaryGateway {
    provider: Option<SharedCompletionProvider>,
    model: String,
}

impl SummaryGateway {
    /// `provider` is `None` when the credential was absent at startup; every
    /// summary request then fails with a configuration error.
    pub fn new(provider: Option<SharedCompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn unconfigured() -> Self {
        Self::new(None, DEFAULT_MODEL)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt_for(content: &str) -> String {
        format!("{SUMMARY_PROMPT}{content}")
    }

    pub async fn summarize(&self, content: Option<&str>) -> CoreResult<String> {
        let content = match content {
            Some(content) if !content.is_empty() => content,
            _ => return Err(CoreError::Validation(CONTENT_REQUIRED.to_string())),
        };
        let Some(provider) = self.provider.as_ref() else {
            tracing::error!("summary requested but no provider API key is configured");
            return Err(CoreError::Configuration(MISSING_API_KEY.to_string()));
        };

        let request = CompletionRequest {
            model: self.model.clone(),
            max_tokens: SUMMARY_MAX_TOKENS,
            messages: vec![PromptMessage::user(Self::prompt_for(content))],
        };
        tracing::debug!(model = %self.model, chars = content.len(), "requesting summary");

        let response = provider.complete(request).await.map_err(|error| {
            tracing::error!(%error, "summary provider call failed");
            error
        })?;
        Ok(response.first_text().unwrap_or_default().to_string())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::llm::{CompletionProvider, CompletionResponse, ContentBlock};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Provider double that records prompts and replays a fixed outcome.
    pub(crate) struct ScriptedProvider {
        outcome: CoreResult<Vec<ContentBlock>>,
        pub(crate) requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        pub(crate) fn text(text: &str) -> Arc<Self> {
            Self::blocks(vec![ContentBlock::Text {
                text: text.to_string(),
            }])
        }

        pub(crate) fn blocks(blocks: Vec<ContentBlock>) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok(blocks),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                outcome: Err(CoreError::Provider(message.to_string())),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.requests.lock().expect("lock").len()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> CoreResult<CompletionResponse> {
            self.requests.lock().expect("lock").push(request);
            self.outcome
                .clone()
                .map(|content| CompletionResponse { content })
        }
    }

    #[tokio::test]
    async fn wraps_content_in_fixed_prompt() {
        let provider = ScriptedProvider::text("A short list.");
        let gateway = SummaryGateway::new(Some(provider.clone()), "claude-test");

        let summary = gateway
            .summarize(Some("milk, eggs, bread"))
            .await
            .expect("summary");
        assert_eq!(summary, "A short list.");

        let requests = provider.requests.lock().expect("lock");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "claude-test");
        assert_eq!(requests[0].max_tokens, 1024);
        assert_eq!(
            requests[0].messages,
            vec![PromptMessage::user(
                "Please provide a concise summary of the following text: milk, eggs, bread"
            )]
        );
    }

    #[tokio::test]
    async fn missing_or_empty_content_never_reaches_provider() {
        let provider = ScriptedProvider::text("unused");
        let gateway = SummaryGateway::new(Some(provider.clone()), "claude-test");

        for content in [None, Some("")] {
            assert_eq!(
                gateway.summarize(content).await,
                Err(CoreError::Validation(CONTENT_REQUIRED.to_string()))
            );
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn missing_credential_is_configuration_error() {
        let error = SummaryGateway::unconfigured()
            .summarize(Some("text"))
            .await
            .expect_err("should fail");
        assert_eq!(error, CoreError::Configuration(MISSING_API_KEY.to_string()));
        assert!(error.to_string().contains("API key"));
    }

    #[tokio::test]
    async fn response_without_text_degrades_to_empty_summary() {
        let gateway = SummaryGateway::new(
            Some(ScriptedProvider::blocks(vec![ContentBlock::Unsupported])),
            "claude-test",
        );
        assert_eq!(gateway.summarize(Some("text")).await.expect("summary"), "");
    }

    #[tokio::test]
    async fn provider_failure_is_not_retried() {
        let provider = ScriptedProvider::failing("rate_limit_error");
        let gateway = SummaryGateway::new(Some(provider.clone()), "claude-test");
        assert_eq!(
            gateway.summarize(Some("text")).await,
            Err(CoreError::Provider("rate_limit_error".to_string()))
        );
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn identical_requests_each_reach_the_provider() {
        let provider = ScriptedProvider::text("same");
        let gateway = SummaryGateway::new(Some(provider.clone()), "claude-test");
        gateway.summarize(Some("Long paragraph...")).await.expect("first");
        gateway.summarize(Some("Long paragraph...")).await.expect("second");
        assert_eq!(provider.calls(), 2);
    }
}
