use crate::domain::post::MetricsRecord;
use crate::metrics::MetricsSource;
use rand::Rng;
use std::ops::RangeInclusive;

const SEARCH_VOLUME: RangeInclusive<u32> = 500..=20_000;
const KEYWORD_DIFFICULTY: RangeInclusive<f64> = 10.0..=80.0;
const AVG_CPC: RangeInclusive<f64> = 0.5..=3.0;

/// Random metrics for any keyword. Stands in for a real SEO data provider.
#[derive(Debug, Clone, Default)]
pub struct MockMetricsSource;

impl MockMetricsSource {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> MetricsRecord {
        MetricsRecord {
            search_volume: rng.gen_range(SEARCH_VOLUME),
            keyword_difficulty: round2(rng.gen_range(KEYWORD_DIFFICULTY)),
            avg_cpc: round2(rng.gen_range(AVG_CPC)),
        }
    }
}

#[async_trait::async_trait]
impl MetricsSource for MockMetricsSource {
    fn source_name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self, keyword: &str) -> anyhow::Result<MetricsRecord> {
        let metrics = Self::sample(&mut rand::thread_rng());
        tracing::debug!(
            keyword,
            search_volume = metrics.search_volume,
            keyword_difficulty = metrics.keyword_difficulty,
            avg_cpc = metrics.avg_cpc,
            "mock SEO metrics"
        );
        Ok(metrics)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
