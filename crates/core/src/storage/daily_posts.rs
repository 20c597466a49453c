use crate::domain::post::ResultPayload;
use anyhow::Context;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// `wireless earbuds` -> `wireless_earbuds`. Whitespace and characters that are not safe in a
/// file name become `_`.
pub fn sanitize_keyword(keyword: &str) -> String {
    keyword
        .trim()
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// `<sanitized keyword>_<YYYYMMDD>.json`
pub fn file_name(keyword: &str, date: NaiveDate) -> String {
    format!("{}_{}.json", sanitize_keyword(keyword), date.format("%Y%m%d"))
}

/// Writes `payload` as pretty JSON under `dir`, named by keyword and the UTC date of
/// `generated_at`. An existing file for the same keyword and day is overwritten.
pub async fn write_payload(dir: &Path, payload: &ResultPayload) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let path = dir.join(file_name(
        &payload.keyword,
        payload.generated_at.date_naive(),
    ));
    let json = serde_json::to_string_pretty(payload).context("failed to serialize payload")?;

    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::{BlogDraft, MetricsRecord};
    use chrono::{TimeZone, Utc};

    fn payload(keyword: &str, title: &str, hour: u32) -> ResultPayload {
        ResultPayload::new(
            keyword,
            MetricsRecord {
                search_volume: 700,
                keyword_difficulty: 12.0,
                avg_cpc: 0.9,
            },
            BlogDraft {
                title: title.to_string(),
                outline: vec![],
                content: format!("# {title}"),
            },
            Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap(),
        )
    }

    #[test]
    fn sanitizes_keywords_for_file_names() {
        assert_eq!(sanitize_keyword("wireless earbuds"), "wireless_earbuds");
        assert_eq!(sanitize_keyword("  a/b c  "), "a_b_c");
        assert_eq!(sanitize_keyword("café"), "café");
        assert_eq!(
            file_name("wireless earbuds", NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()),
            "wireless_earbuds_20260304.json"
        );
    }

    #[tokio::test]
    async fn creates_directory_and_writes_pretty_json() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("daily_posts");

        let path = write_payload(&dir, &payload("wireless earbuds", "Über Buds", 9))
            .await
            .unwrap();

        assert_eq!(path, dir.join("wireless_earbuds_20260314.json"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"keyword\": \"wireless earbuds\",\n"));
        assert!(text.contains("\"title\": \"Über Buds\""));

        let parsed: ResultPayload = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.draft.title, "Über Buds");
    }

    #[tokio::test]
    async fn same_keyword_same_day_overwrites() {
        let tmp = tempfile::tempdir().unwrap();

        let first = write_payload(tmp.path(), &payload("desk lamp", "Morning", 6))
            .await
            .unwrap();
        let second = write_payload(tmp.path(), &payload("desk lamp", "Evening", 20))
            .await
            .unwrap();

        assert_eq!(first, second);
        let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let text = std::fs::read_to_string(&second).unwrap();
        assert!(text.contains("\"title\": \"Evening\""));
    }
}
