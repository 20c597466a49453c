pub mod blog;
pub mod domain;
pub mod job;
pub mod llm;
pub mod metrics;
pub mod pipeline;
pub mod storage;
pub mod time;

pub mod config {
    use anyhow::Context;
    use chrono::FixedOffset;
    use std::path::PathBuf;

    use crate::llm::Provider;
    use crate::time::schedule::{DailySchedule, ScheduleZone};

    const DEFAULT_DAILY_KEYWORD: &str = "wireless earbuds";
    const DEFAULT_DAILY_POSTS_DIR: &str = "daily_posts";
    const DEFAULT_PORT: u16 = 5001;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub llm_provider: Provider,
        pub openai_api_key: Option<String>,
        pub anthropic_api_key: Option<String>,
        pub openai_base_url: Option<String>,
        pub openai_model: Option<String>,
        pub openai_timeout_secs: Option<u64>,
        pub anthropic_base_url: Option<String>,
        pub anthropic_model: Option<String>,
        pub anthropic_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
        pub daily_keyword: String,
        pub daily_hour: u32,
        pub daily_minute: u32,
        /// `None` means server-local time, including its DST changes.
        pub schedule_utc_offset: Option<FixedOffset>,
        pub daily_posts_dir: PathBuf,
        pub port: u16,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

            let llm_provider = match non_empty("LLM_PROVIDER") {
                Some(s) => s.parse::<Provider>()?,
                None => Provider::OpenAI,
            };

            let daily_hour = parse_required_u32(non_empty("DAILY_HOUR"), "DAILY_HOUR")?;
            let daily_minute = parse_required_u32(non_empty("DAILY_MINUTE"), "DAILY_MINUTE")?;
            anyhow::ensure!(daily_hour < 24, "DAILY_HOUR must be 0..=23 (got {daily_hour})");
            anyhow::ensure!(
                daily_minute < 60,
                "DAILY_MINUTE must be 0..=59 (got {daily_minute})"
            );

            let schedule_utc_offset = non_empty("SCHEDULE_UTC_OFFSET")
                .map(|s| parse_utc_offset(&s))
                .transpose()?;

            let openai_timeout_secs =
                parse_optional_u64(non_empty("OPENAI_TIMEOUT_SECS"), "OPENAI_TIMEOUT_SECS")?;
            let anthropic_timeout_secs = parse_optional_u64(
                non_empty("ANTHROPIC_TIMEOUT_SECS"),
                "ANTHROPIC_TIMEOUT_SECS",
            )?;

            let port = match non_empty("PORT") {
                Some(s) => s
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("PORT must be a port number (got {s:?})"))?,
                None => DEFAULT_PORT,
            };

            let settings = Self {
                llm_provider,
                openai_api_key: non_empty("OPENAI_API_KEY"),
                anthropic_api_key: non_empty("ANTHROPIC_API_KEY"),
                openai_base_url: non_empty("OPENAI_BASE_URL"),
                openai_model: non_empty("OPENAI_MODEL"),
                openai_timeout_secs,
                anthropic_base_url: non_empty("ANTHROPIC_BASE_URL"),
                anthropic_model: non_empty("ANTHROPIC_MODEL"),
                anthropic_timeout_secs,
                sentry_dsn: non_empty("SENTRY_DSN"),
                daily_keyword: non_empty("DAILY_KEYWORD")
                    .unwrap_or_else(|| DEFAULT_DAILY_KEYWORD.to_string()),
                daily_hour,
                daily_minute,
                schedule_utc_offset,
                daily_posts_dir: non_empty("DAILY_POSTS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DAILY_POSTS_DIR)),
                port,
            };

            // The credential for the selected provider is a startup requirement.
            match settings.llm_provider {
                Provider::OpenAI => {
                    settings.require_openai_api_key()?;
                }
                Provider::Anthropic => {
                    settings.require_anthropic_api_key()?;
                }
                Provider::Canned => {}
            }

            Ok(settings)
        }

        pub fn require_openai_api_key(&self) -> anyhow::Result<&str> {
            self.openai_api_key
                .as_deref()
                .context("OPENAI_API_KEY is required")
        }

        pub fn require_anthropic_api_key(&self) -> anyhow::Result<&str> {
            self.anthropic_api_key
                .as_deref()
                .context("ANTHROPIC_API_KEY is required")
        }

        pub fn schedule(&self) -> anyhow::Result<DailySchedule> {
            let zone = match self.schedule_utc_offset {
                Some(offset) => ScheduleZone::Fixed(offset),
                None => ScheduleZone::Local,
            };
            DailySchedule::new(self.daily_hour, self.daily_minute, zone)
        }
    }

    fn parse_required_u32(value: Option<String>, key: &str) -> anyhow::Result<u32> {
        let value = value.with_context(|| format!("{key} is required"))?;
        value
            .trim()
            .parse::<u32>()
            .with_context(|| format!("{key} must be an integer (got {value:?})"))
    }

    fn parse_optional_u64(value: Option<String>, key: &str) -> anyhow::Result<Option<u64>> {
        value
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{key} must be a whole number of seconds (got {v:?})"))
            })
            .transpose()
    }

    /// Parses `+09:00`, `-05:30`, `+0900` or `Z`.
    pub fn parse_utc_offset(s: &str) -> anyhow::Result<FixedOffset> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
            return FixedOffset::east_opt(0).context("invalid UTC offset");
        }

        let (sign, rest) = match s.as_bytes().first() {
            Some(b'+') => (1, &s[1..]),
            Some(b'-') => (-1, &s[1..]),
            _ => anyhow::bail!("UTC offset must start with '+' or '-' (got {s:?})"),
        };
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        anyhow::ensure!(
            (digits.len() == 2 || digits.len() == 4) && digits.bytes().all(|b| b.is_ascii_digit()),
            "UTC offset must look like +HH:MM (got {s:?})"
        );
        let hours: i32 = digits[..2]
            .parse()
            .with_context(|| format!("invalid UTC offset hours in {s:?}"))?;
        let minutes: i32 = if digits.len() == 4 {
            digits[2..]
                .parse()
                .with_context(|| format!("invalid UTC offset minutes in {s:?}"))?
        } else {
            0
        };
        anyhow::ensure!(hours <= 14 && minutes < 60, "UTC offset out of range: {s:?}");

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .with_context(|| format!("invalid UTC offset {s:?}"))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::collections::HashMap;

        fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
            let map: HashMap<String, String> = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            move |key| map.get(key).cloned()
        }

        #[test]
        fn loads_defaults_with_required_values() {
            let settings = Settings::from_lookup(lookup(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("DAILY_HOUR", "9"),
                ("DAILY_MINUTE", "30"),
            ]))
            .unwrap();

            assert_eq!(settings.llm_provider, Provider::OpenAI);
            assert_eq!(settings.daily_keyword, "wireless earbuds");
            assert_eq!(settings.daily_hour, 9);
            assert_eq!(settings.daily_minute, 30);
            assert_eq!(settings.daily_posts_dir, PathBuf::from("daily_posts"));
            assert_eq!(settings.port, 5001);
            assert!(settings.schedule_utc_offset.is_none());
            assert!(settings.openai_base_url.is_none());
            assert!(settings.openai_model.is_none());
            assert!(settings.openai_timeout_secs.is_none());
            assert_eq!(
                settings.schedule().unwrap(),
                DailySchedule::new(9, 30, ScheduleZone::Local).unwrap()
            );
        }

        #[test]
        fn client_overrides_come_from_the_same_lookup() {
            let settings = Settings::from_lookup(lookup(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("OPENAI_BASE_URL", "http://localhost:8080"),
                ("OPENAI_MODEL", "gpt-4o-mini"),
                ("OPENAI_TIMEOUT_SECS", " 15 "),
                ("ANTHROPIC_MODEL", "claude-3-5-haiku-latest"),
                ("ANTHROPIC_TIMEOUT_SECS", "90"),
                ("DAILY_HOUR", "9"),
                ("DAILY_MINUTE", "0"),
            ]))
            .unwrap();

            assert_eq!(settings.openai_base_url.as_deref(), Some("http://localhost:8080"));
            assert_eq!(settings.openai_model.as_deref(), Some("gpt-4o-mini"));
            assert_eq!(settings.openai_timeout_secs, Some(15));
            assert!(settings.anthropic_base_url.is_none());
            assert_eq!(
                settings.anthropic_model.as_deref(),
                Some("claude-3-5-haiku-latest")
            );
            assert_eq!(settings.anthropic_timeout_secs, Some(90));
        }

        #[test]
        fn unparsable_timeout_is_fatal() {
            let err = Settings::from_lookup(lookup(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("OPENAI_TIMEOUT_SECS", "soon"),
                ("DAILY_HOUR", "9"),
                ("DAILY_MINUTE", "0"),
            ]))
            .unwrap_err();
            assert!(format!("{err:#}").contains("OPENAI_TIMEOUT_SECS"));
        }

        #[test]
        fn missing_credential_is_fatal() {
            let err = Settings::from_lookup(lookup(&[("DAILY_HOUR", "9"), ("DAILY_MINUTE", "0")]))
                .unwrap_err();
            assert!(err.to_string().contains("OPENAI_API_KEY"));
        }

        #[test]
        fn anthropic_provider_requires_its_own_key() {
            let err = Settings::from_lookup(lookup(&[
                ("LLM_PROVIDER", "anthropic"),
                ("OPENAI_API_KEY", "sk-test"),
                ("DAILY_HOUR", "9"),
                ("DAILY_MINUTE", "0"),
            ]))
            .unwrap_err();
            assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
        }

        #[test]
        fn schedule_time_is_required_and_numeric() {
            let missing = Settings::from_lookup(lookup(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("DAILY_MINUTE", "0"),
            ]));
            assert!(missing.is_err());

            let garbage = Settings::from_lookup(lookup(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("DAILY_HOUR", "nine"),
                ("DAILY_MINUTE", "0"),
            ]));
            assert!(garbage.is_err());

            let out_of_range = Settings::from_lookup(lookup(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("DAILY_HOUR", "24"),
                ("DAILY_MINUTE", "0"),
            ]));
            assert!(out_of_range.is_err());
        }

        #[test]
        fn canned_provider_needs_no_credential() {
            let settings = Settings::from_lookup(lookup(&[
                ("LLM_PROVIDER", "canned"),
                ("DAILY_HOUR", "0"),
                ("DAILY_MINUTE", "5"),
                ("DAILY_KEYWORD", "trail running shoes"),
                ("SCHEDULE_UTC_OFFSET", "+09:00"),
            ]))
            .unwrap();
            assert_eq!(settings.llm_provider, Provider::Canned);
            assert_eq!(settings.daily_keyword, "trail running shoes");
            assert_eq!(
                settings.schedule_utc_offset,
                FixedOffset::east_opt(9 * 3600)
            );
            assert_eq!(settings.schedule().unwrap().to_string(), "00:05 (UTC+09:00)");
        }

        #[test]
        fn parses_utc_offsets() {
            assert_eq!(
                parse_utc_offset("-05:30").unwrap(),
                FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap()
            );
            assert_eq!(
                parse_utc_offset("+0100").unwrap(),
                FixedOffset::east_opt(3600).unwrap()
            );
            assert_eq!(parse_utc_offset("Z").unwrap(), FixedOffset::east_opt(0).unwrap());
            assert!(parse_utc_offset("09:00").is_err());
            assert!(parse_utc_offset("+9").is_err());
        }
    }
}
