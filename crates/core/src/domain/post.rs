use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// SEO signals for one keyword. Produced once per request or scheduled run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub search_volume: u32,
    pub keyword_difficulty: f64,
    pub avg_cpc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogDraft {
    pub title: String,
    pub outline: Vec<String>,
    pub content: String,
}

/// Flat composition returned over HTTP and persisted by the daily job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    pub keyword: String,
    #[serde(flatten)]
    pub metrics: MetricsRecord,
    #[serde(flatten)]
    pub draft: BlogDraft,
    #[serde(serialize_with = "serialize_generated_at")]
    pub generated_at: DateTime<Utc>,
}

impl ResultPayload {
    pub fn new(
        keyword: impl Into<String>,
        metrics: MetricsRecord,
        draft: BlogDraft,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            metrics,
            draft,
            generated_at,
        }
    }
}

/// `2026-01-27T10:00:00.123456Z`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn serialize_generated_at<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> ResultPayload {
        ResultPayload::new(
            "wireless earbuds",
            MetricsRecord {
                search_volume: 1200,
                keyword_difficulty: 42.5,
                avg_cpc: 1.25,
            },
            BlogDraft {
                title: "Best Earbuds".to_string(),
                outline: vec!["Sound".to_string(), "Battery".to_string()],
                content: "# Best Earbuds".to_string(),
            },
            Utc.with_ymd_and_hms(2026, 1, 27, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn serializes_as_flat_object_in_field_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        let keys = [
            "\"keyword\"",
            "\"search_volume\"",
            "\"keyword_difficulty\"",
            "\"avg_cpc\"",
            "\"title\"",
            "\"outline\"",
            "\"content\"",
            "\"generated_at\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
        assert!(json.contains("\"generated_at\":\"2026-01-27T10:00:00.000000Z\""));
    }

    #[test]
    fn reads_back_what_it_writes() {
        let payload = sample();
        let json = serde_json::to_string_pretty(&payload).unwrap();
        let parsed: ResultPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, payload);
    }
}
