use crate::config::Settings;
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::{CompletionRequest, LlmClient, Provider};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_anthropic_api_key()?.to_string();
        let base_url = settings
            .anthropic_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = settings
            .anthropic_model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_secs = settings.anthropic_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model,
        })
    }

    fn build_request(&self, req: &CompletionRequest) -> CreateMessageRequest {
        CreateMessageRequest {
            model: self.model.clone(),
            max_tokens: req.max_tokens,
            system: Some(req.system.clone()).filter(|s| !s.is_empty()),
            messages: vec![Message {
                role: "user",
                content: req.user.clone(),
            }],
            temperature: Some(req.temperature),
        }
    }

    async fn create_message(
        &self,
        req: CreateMessageRequest,
    ) -> anyhow::Result<CreateMessageResponse> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let res = self
            .http
            .post(url)
            .headers(headers)
            .json(&req)
            .send()
            .await
            .context("Anthropic request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read Anthropic response body")?;
        if !status.is_success() {
            let raw_response_json = serde_json::from_str::<serde_json::Value>(&text).ok();
            return Err(LlmDiagnosticsError {
                provider: Provider::Anthropic,
                stage: "http",
                detail: format!("status={status}"),
                raw_output: Some(text),
                raw_response_json,
            }
            .into());
        }

        serde_json::from_str::<CreateMessageResponse>(&text)
            .with_context(|| format!("failed to decode Anthropic response: {text}"))
    }

    fn response_text(res: &CreateMessageResponse) -> String {
        let mut out = String::new();
        for block in &res.content {
            match block {
                ContentBlock::Text { text } => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(text);
                }
                ContentBlock::Unknown => {}
            }
        }
        out
    }
}

#[async_trait::async_trait]
impl LlmClient for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String> {
        let body = self.build_request(&req);
        tracing::debug!(model = %self.model, max_tokens = req.max_tokens, "Anthropic message");
        let res = self.create_message(body).await?;

        if matches!(res.stop_reason.as_deref(), Some("max_tokens")) {
            tracing::warn!(
                max_tokens = req.max_tokens,
                "Anthropic stop_reason=max_tokens; draft is probably truncated"
            );
        }

        Ok(Self::response_text(&res))
    }
}

#[derive(Debug, Clone, Serialize)]
struct CreateMessageRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CreateMessageResponse {
    content: Vec<ContentBlock>,

    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_override_comes_from_settings() {
        let settings = Settings::from_lookup(|key| match key {
            "LLM_PROVIDER" => Some("anthropic".to_string()),
            "ANTHROPIC_API_KEY" => Some("key".to_string()),
            "ANTHROPIC_MODEL" => Some("claude-3-5-haiku-latest".to_string()),
            "DAILY_HOUR" => Some("9".to_string()),
            "DAILY_MINUTE" => Some("0".to_string()),
            _ => None,
        })
        .unwrap();

        let client = AnthropicClient::from_settings(&settings).unwrap();
        assert_eq!(client.model, "claude-3-5-haiku-latest");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn joins_text_blocks_and_skips_the_rest() {
        let res: CreateMessageResponse = serde_json::from_value(json!({
            "content": [
                {"type": "thinking", "thinking": "planning", "signature": "abc"},
                {"type": "text", "text": "# Title"},
                {"type": "tool_use", "id": "toolu_1", "name": "x", "input": {}},
                {"type": "text", "text": "## Section"}
            ],
            "stop_reason": "end_turn"
        }))
        .unwrap();

        assert_eq!(AnthropicClient::response_text(&res), "# Title\n## Section");
    }

    #[test]
    fn system_role_goes_in_the_top_level_field() {
        let client = AnthropicClient {
            http: reqwest::Client::new(),
            api_key: "key".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        };
        let body = serde_json::to_value(client.build_request(&CompletionRequest {
            system: "You are an experienced SEO blog writer.".to_string(),
            user: "prompt".to_string(),
            temperature: 0.7,
            max_tokens: 1200,
        }))
        .unwrap();

        assert_eq!(body["system"], "You are an experienced SEO blog writer.");
        assert_eq!(body["messages"], json!([{"role": "user", "content": "prompt"}]));
        assert_eq!(body["max_tokens"], 1200);
    }
}
