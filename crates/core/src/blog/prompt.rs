use crate::domain::post::MetricsRecord;

/// Renders the user message that asks for a Markdown draft about `keyword`.
///
/// The formatting rules here are what [`crate::blog::draft::postprocess`] relies on: a `# `
/// title on the first line, `## ` section headings, and numbered `{{AFF_LINK_n}}` placeholders.
pub fn build_prompt(keyword: &str, metrics: &MetricsRecord) -> String {
    [
        format!(
            "Please act as an experienced SEO blog writer. Generate a draft blog post in Markdown about \"{keyword}\". Requirements:"
        ),
        "1. The first line should be a catchy title, prefixed by \"# \".".to_string(),
        "2. In the introduction paragraph, briefly mention these SEO metrics:".to_string(),
        format!("   - Search Volume: {}", metrics.search_volume),
        format!(
            "   - Keyword Difficulty: {}",
            render_decimal(metrics.keyword_difficulty)
        ),
        format!("   - Average CPC: ${}", render_decimal(metrics.avg_cpc)),
        "3. The body must include at least three second-level headings (\"## \"), each heading followed by 2-3 paragraphs of content.".to_string(),
        "4. Within each \"## \" section, insert at least one placeholder {{AFF_LINK_n}}. Total placeholders should be at least three, numbered consecutively ({{AFF_LINK_1}}, {{AFF_LINK_2}}, {{AFF_LINK_3}}, etc.).".to_string(),
        "5. Conclude with a final paragraph after all headings.".to_string(),
        "6. Output ONLY the blog post content in Markdown format. Do not include any explanation or commentary outside the post itself.".to_string(),
    ]
    .join("\n")
}

/// Decimal metrics keep a fractional digit even when whole (`10.0`, not `10`).
fn render_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
