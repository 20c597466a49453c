use crate::domain::post::MetricsRecord;

pub mod mock;

pub use mock::MockMetricsSource;

#[async_trait::async_trait]
pub trait MetricsSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch(&self, keyword: &str) -> anyhow::Result<MetricsRecord>;
}
