pub mod anthropic;
pub mod provider;

pub use anthropic::AnthropicProvider;
pub use provider::{
    build_provider, CompletionProvider, CompletionRequest, CompletionResponse, ContentBlock,
    LlmSettings, PromptMessage, SharedCompletionProvider, DEFAULT_MODEL,
};
