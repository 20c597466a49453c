use crate::blog::{draft, prompt};
use crate::domain::post::{BlogDraft, MetricsRecord};
use crate::llm::{CompletionRequest, LlmClient};
use anyhow::Context;
use std::sync::Arc;

const DEFAULT_SYSTEM_ROLE: &str = "You are an experienced SEO blog writer.";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 1200;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub system_role: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            system_role: DEFAULT_SYSTEM_ROLE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Prompt, one model call, post-processing. A failed call fails the whole draft.
#[derive(Clone)]
pub struct BlogGenerator {
    llm: Arc<dyn LlmClient>,
    options: GenerationOptions,
}

impl BlogGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, options: GenerationOptions) -> Self {
        Self { llm, options }
    }

    pub async fn generate(&self, keyword: &str, metrics: &MetricsRecord) -> anyhow::Result<BlogDraft> {
        let req = CompletionRequest {
            system: self.options.system_role.clone(),
            user: prompt::build_prompt(keyword, metrics),
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        let raw = self
            .llm
            .complete(req)
            .await
            .with_context(|| format!("{} generation failed", self.llm.provider()))?;

        let draft = draft::postprocess(raw.trim());
        tracing::info!(
            keyword,
            provider = %self.llm.provider(),
            title = %draft.title,
            sections = draft.outline.len(),
            "blog draft generated"
        );
        Ok(draft)
    }
}
