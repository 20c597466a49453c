//! Daily job: the same pipeline as `/generate`, fired by wall-clock time and written to disk.

use crate::config::Settings;
use crate::domain::post::{format_timestamp, ResultPayload};
use crate::pipeline::Pipeline;
use crate::storage::daily_posts;
use crate::time::schedule::DailySchedule;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Instrument;

#[derive(Debug, Clone)]
pub struct DailyJob {
    keyword: String,
    output_dir: PathBuf,
    schedule: DailySchedule,
}

impl DailyJob {
    pub fn new(keyword: impl Into<String>, output_dir: impl Into<PathBuf>, schedule: DailySchedule) -> Self {
        Self {
            keyword: keyword.into(),
            output_dir: output_dir.into(),
            schedule,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self::new(
            settings.daily_keyword.clone(),
            settings.daily_posts_dir.clone(),
            settings.schedule()?,
        ))
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn schedule(&self) -> &DailySchedule {
        &self.schedule
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Runs the pipeline without touching the filesystem.
    pub async fn generate(&self, pipeline: &Pipeline) -> anyhow::Result<ResultPayload> {
        Ok(pipeline.run(&self.keyword).await?)
    }

    /// One scheduled run. Nothing is written unless the whole pipeline succeeds.
    pub async fn run_once(&self, pipeline: &Pipeline) -> anyhow::Result<PathBuf> {
        let payload = self.generate(pipeline).await?;
        daily_posts::write_payload(&self.output_dir, &payload).await
    }

    /// Sleeps until each scheduled time and runs once. A failed run is logged and skipped;
    /// the loop only ends if the schedule itself cannot be evaluated.
    pub async fn run_forever(self, pipeline: Arc<Pipeline>) {
        tracing::info!(
            schedule = %self.schedule,
            keyword = %self.keyword,
            output_dir = %self.output_dir.display(),
            "daily job scheduler started"
        );

        loop {
            let now = Utc::now();
            let next = match self.schedule.next_run_after(now) {
                Ok(next) => next,
                Err(err) => {
                    tracing::error!(error = %format!("{err:#}"), "daily job schedule is unusable; stopping");
                    return;
                }
            };
            let wait = (next - now).to_std().unwrap_or_default();
            tracing::debug!(%next, wait_secs = wait.as_secs(), "daily job waiting");
            tokio::time::sleep(wait).await;

            self.tick(&pipeline).await;
        }
    }

    async fn tick(&self, pipeline: &Pipeline) {
        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("daily_run", %run_id, keyword = %self.keyword);

        async {
            match self.run_once(pipeline).await {
                Ok(path) => {
                    tracing::info!(
                        at = %format_timestamp(&Utc::now()),
                        path = %path.display(),
                        "daily blog generated"
                    );
                }
                Err(err) => {
                    tracing::error!(
                        at = %format_timestamp(&Utc::now()),
                        error = %format!("{err:#}"),
                        "daily task failed; skipping this run"
                    );
                }
            }
        }
        .instrument(span)
        .await
    }
}
