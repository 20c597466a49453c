use crate::config::Settings;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub mod anthropic;
pub mod canned;
pub mod error;
pub mod openai;

/// One chat-style completion: a system role plus a single user message.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Anthropic,
    Canned,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Canned => "canned",
        })
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "anthropic" => Ok(Provider::Anthropic),
            "canned" => Ok(Provider::Canned),
            other => anyhow::bail!("unknown LLM_PROVIDER {other:?} (expected openai, anthropic or canned)"),
        }
    }
}

#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Returns the raw text of the model's reply.
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String>;
}

pub fn client_from_settings(settings: &Settings) -> anyhow::Result<Arc<dyn LlmClient>> {
    let client: Arc<dyn LlmClient> = match settings.llm_provider {
        Provider::OpenAI => Arc::new(openai::OpenAiClient::from_settings(settings)?),
        Provider::Anthropic => Arc::new(anthropic::AnthropicClient::from_settings(settings)?),
        Provider::Canned => Arc::new(canned::CannedLlmClient::sample()),
    };
    Ok(client)
}
