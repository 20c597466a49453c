use crate::domain::post::BlogDraft;

/// Substitutes for `AFF_LINK_1..=3`, in order. Higher-numbered placeholders are left as-is.
pub const AFFILIATE_URLS: [&str; 3] = [
    "https://example.com/affiliate1",
    "https://example.com/affiliate2",
    "https://example.com/affiliate3",
];

const LINK_TEXT: &str = "Affiliate Link";
const OUTLINE_MARKER: &str = "## ";

/// Turns raw model output into a [`BlogDraft`]. Never fails: malformed input yields an empty
/// title or outline rather than an error.
pub fn postprocess(raw: &str) -> BlogDraft {
    let lines: Vec<&str> = raw.split('\n').collect();

    let title = lines
        .first()
        .map(|line| strip_heading_marker(line.trim()))
        .unwrap_or_default();

    let outline = lines
        .iter()
        .filter_map(|line| line.strip_prefix(OUTLINE_MARKER))
        .map(|heading| heading.trim().to_string())
        .collect();

    let content = substitute_placeholders(&lines.join("\n"));

    BlogDraft {
        title,
        outline,
        content,
    }
}

/// Removes one leading run of `#` (a Markdown heading marker). Text after the marker is kept
/// verbatim apart from surrounding whitespace, so `# #1 Pick` becomes `#1 Pick`.
fn strip_heading_marker(line: &str) -> String {
    match line.strip_prefix('#') {
        Some(rest) => {
            let rest = rest.trim_start_matches('#');
            match rest.strip_prefix(char::is_whitespace) {
                Some(text) => text.trim().to_string(),
                // `#hashtag` is not a heading.
                None if !rest.is_empty() => line.to_string(),
                None => String::new(),
            }
        }
        None => line.to_string(),
    }
}

/// Replaces `{{AFF_LINK_n}}` and `{AFF_LINK_n}` with Markdown links to [`AFFILIATE_URLS`].
/// Idempotent: resolved links contain no placeholder text.
pub fn substitute_placeholders(content: &str) -> String {
    let mut out = content.to_string();
    for (i, url) in AFFILIATE_URLS.iter().enumerate() {
        let n = i + 1;
        let link = format!("[{LINK_TEXT}]({url})");
        // Double braces first so the single-brace pass can't leave a stray `{`/`}` behind.
        out = out.replace(&format!("{{{{AFF_LINK_{n}}}}}"), &link);
        out = out.replace(&format!("{{AFF_LINK_{n}}}"), &link);
    }
    out
}
