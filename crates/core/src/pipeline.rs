use crate::blog::{BlogGenerator, GenerationOptions};
use crate::config::Settings;
use crate::domain::post::ResultPayload;
use crate::llm;
use crate::metrics::{MetricsSource, MockMetricsSource};
use std::fmt;
use std::sync::Arc;

/// Where a pipeline run failed. The two cases surface differently to HTTP callers.
#[derive(Debug)]
pub enum PipelineError {
    Metrics(anyhow::Error),
    Generation(anyhow::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Metrics(e) => write!(f, "SEO fetcher failed: {e:#}"),
            PipelineError::Generation(e) => write!(f, "{e:#}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Metrics(e) | PipelineError::Generation(e) => Some(&**e),
        }
    }
}

/// Metrics, then draft, then timestamp. All or nothing.
#[derive(Clone)]
pub struct Pipeline {
    metrics: Arc<dyn MetricsSource>,
    generator: BlogGenerator,
}

impl Pipeline {
    pub fn new(metrics: Arc<dyn MetricsSource>, generator: BlogGenerator) -> Self {
        Self { metrics, generator }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let llm = llm::client_from_settings(settings)?;
        Ok(Self::new(
            Arc::new(MockMetricsSource),
            BlogGenerator::new(llm, GenerationOptions::default()),
        ))
    }

    pub async fn run(&self, keyword: &str) -> Result<ResultPayload, PipelineError> {
        tracing::debug!(keyword, source = self.metrics.source_name(), "fetching SEO metrics");
        let metrics = self
            .metrics
            .fetch(keyword)
            .await
            .map_err(PipelineError::Metrics)?;

        let draft = self
            .generator
            .generate(keyword, &metrics)
            .await
            .map_err(PipelineError::Generation)?;

        Ok(ResultPayload::new(keyword, metrics, draft, chrono::Utc::now()))
    }
}
