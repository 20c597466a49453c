use crate::llm::{CompletionRequest, LlmClient, Provider};
use std::sync::Mutex;

const SAMPLE_DRAFT: &str = "# The Complete Buyer's Guide\n\
\n\
Search interest is steady and competition is moderate.\n\
\n\
## What to Look For\n\
\n\
Start with the basics. {{AFF_LINK_1}}\n\
\n\
## Top Picks\n\
\n\
These stood out in testing. {{AFF_LINK_2}}\n\
\n\
## Care and Maintenance\n\
\n\
A little upkeep goes a long way. {{AFF_LINK_3}}\n\
\n\
Pick the one that fits your routine and budget.";

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

/// Answers every request with a fixed reply (or a fixed failure) and records what it was asked.
/// Used for offline runs and tests.
#[derive(Debug)]
pub struct CannedLlmClient {
    reply: Reply,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl CannedLlmClient {
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text(text.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Fail(message.into()))
    }

    /// A well-formed three-section draft.
    pub fn sample() -> Self {
        Self::text(SAMPLE_DRAFT)
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl LlmClient for CannedLlmClient {
    fn provider(&self) -> Provider {
        Provider::Canned
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(req);
        }
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(message) => anyhow::bail!("{message}"),
        }
    }
}
