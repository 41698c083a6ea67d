use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::first_set;
use crate::error::CoreResult;

use super::anthropic::AnthropicProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";

const API_KEY_VARS: &[&str] = &["CLAUDE_API_KEY", "ANTHROPIC_API_KEY"];
const BASE_URL_VARS: &[&str] = &["QUICKNOTES_LLM_BASE_URL", "ANTHROPIC_BASE_URL"];
const MODEL_VARS: &[&str] = &["QUICKNOTES_LLM_MODEL"];

#[derive(Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl LlmSettings {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: first_set(lookup, BASE_URL_VARS)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: first_set(lookup, API_KEY_VARS),
            model: first_set(lookup, MODEL_VARS).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.has_api_key())
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A single non-streaming completion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<PromptMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl CompletionResponse {
    /// Text of the first text-bearing block.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Unsupported => None,
        })
    }
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Fails with [`crate::CoreError::Provider`] carrying the provider's message.
    async fn complete(&self, request: CompletionRequest) -> CoreResult<CompletionResponse>;
}

pub type SharedCompletionProvider = Arc<dyn CompletionProvider>;

/// `None` when no credential is configured.
pub fn build_provider(settings: &LlmSettings, client: Client) -> Option<SharedCompletionProvider> {
    let api_key = settings.api_key.clone()?;
    Some(Arc::new(AnthropicProvider::new(
        client,
        settings.base_url.clone(),
        api_key,
    )))
}
