/// Rendering of generated text into popup markup
///
/// Every rule is best-effort: any input, including an empty string, yields
/// balanced markup and never panics.
use regex::Regex;
use std::sync::LazyLock;

use crate::mode::SummaryMode;

const PARAGRAPH_OPEN: &str = "<p class=\"summary-text\">";
const PARAGRAPH_CLOSE: &str = "</p>";
const BULLET_GLYPHS: [char; 3] = ['•', '-', '*'];

/// Section headers the detailed prompt asks for, matching ignores case.
/// A glyph-prefixed header matches anywhere; a bare header only at the start
/// of a line. Markdown emphasis or heading marks around either are consumed.
static SECTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?im)(?:",
        r"^[ \t#*_]*(?:(?:📌[ \t]*)?(?P<overview>overview)|(?:🔑[ \t]*)?(?P<insights>key[ \t]+insights)|(?:💡[ \t]*)?(?P<takeaways>takeaways))",
        r"|📌[ \t]*(?P<overview_inline>overview)",
        r"|🔑[ \t]*(?P<insights_inline>key[ \t]+insights)",
        r"|💡[ \t]*(?P<takeaways_inline>takeaways)",
        r")\b[ \t]*[*_]*[ \t]*:?[*_]*",
    ))
    .expect("section marker pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Overview,
    Insights,
    Takeaways,
}

impl Section {
    fn header(self) -> &'static str {
        match self {
            Section::Overview => "📌 OVERVIEW",
            Section::Insights => "🔑 KEY INSIGHTS",
            Section::Takeaways => "💡 TAKEAWAYS",
        }
    }

    fn class(self) -> &'static str {
        match self {
            Section::Overview => "overview",
            Section::Insights => "insights",
            Section::Takeaways => "takeaways",
        }
    }
}

/// Format raw generated text for display in the given mode
pub fn format_summary(raw: &str, mode: SummaryMode) -> String {
    (mode.profile().render)(raw)
}

/// Brief rule: one paragraph per blank-line separated block
pub fn render_paragraphs(raw: &str) -> String {
    raw.split("\n\n")
        .map(|paragraph| format!("{}{}{}", PARAGRAPH_OPEN, escape_html(paragraph), PARAGRAPH_CLOSE))
        .collect()
}

/// Detailed rule: styled sections per marker, paragraphs inside
pub fn render_sections(raw: &str) -> String {
    let markers: Vec<(usize, usize, Section)> = SECTION_MARKER
        .captures_iter(raw)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let section = if caps.name("overview").or(caps.name("overview_inline")).is_some() {
                Section::Overview
            } else if caps.name("insights").or(caps.name("insights_inline")).is_some() {
                Section::Insights
            } else {
                Section::Takeaways
            };
            Some((whole.start(), whole.end(), section))
        })
        .collect();

    if markers.is_empty() {
        return render_paragraphs(raw);
    }

    let mut out = String::new();
    push_paragraphs(&mut out, &raw[..markers[0].0]);

    for (i, &(_, body_start, section)) in markers.iter().enumerate() {
        let body_end = markers.get(i + 1).map_or(raw.len(), |next| next.0);

        out.push_str("<div class=\"summary-section\">");
        out.push_str(&format!(
            "<div class=\"section-header {}\">{}</div>",
            section.class(),
            section.header()
        ));
        push_paragraphs(&mut out, &raw[body_start..body_end]);
        out.push_str("</div>");
    }

    out
}

/// Format raw generated text for insertion into the page.
///
/// Same as [`format_summary`], except a bullets reply without any bullet item
/// comes back as one escaped paragraph instead of the raw text.
pub fn display_summary(raw: &str, mode: SummaryMode) -> String {
    match mode {
        SummaryMode::Bullets => render_bullet_items(raw)
            .unwrap_or_else(|| format!("{}{}{}", PARAGRAPH_OPEN, escape_html(raw), PARAGRAPH_CLOSE)),
        _ => format_summary(raw, mode),
    }
}

/// Bullets rule: bullet items and plain lines; raw text if no bullet survives
pub fn render_bullets(raw: &str) -> String {
    render_bullet_items(raw).unwrap_or_else(|| raw.to_string())
}

fn render_bullet_items(raw: &str) -> Option<String> {
    let mut bullet_count = 0;

    let rendered: String = raw
        .split('\n')
        .filter_map(|line| {
            let trimmed = line.trim();

            match trimmed.strip_prefix(BULLET_GLYPHS) {
                Some(rest) => {
                    let text = rest.trim_start();
                    if text.is_empty() {
                        return None;
                    }
                    bullet_count += 1;
                    Some(format!(
                        "<div class=\"bullet-point\"><span class=\"bullet\">●</span><span class=\"bullet-text\">{}</span></div>",
                        escape_html(text)
                    ))
                }
                None if trimmed.is_empty() => None,
                None => Some(format!("{}{}{}", PARAGRAPH_OPEN, escape_html(trimmed), PARAGRAPH_CLOSE)),
            }
        })
        .collect();

    (bullet_count > 0).then_some(rendered)
}

fn push_paragraphs(out: &mut String, text: &str) {
    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        out.push_str(PARAGRAPH_OPEN);
        out.push_str(&escape_html(paragraph));
        out.push_str(PARAGRAPH_CLOSE);
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    fn assert_balanced(markup: &str) {
        assert_eq!(count(markup, "<div"), count(markup, "</div>"), "unbalanced div in {markup}");
        assert_eq!(count(markup, "<p "), count(markup, "</p>"), "unbalanced p in {markup}");
        assert_eq!(count(markup, "<span"), count(markup, "</span>"), "unbalanced span in {markup}");
    }

    #[test]
    fn test_empty_input_all_modes() {
        for mode in SummaryMode::ALL {
            let markup = format_summary("", mode);
            assert_balanced(&markup);
        }
    }

    #[test]
    fn test_brief_two_paragraphs() {
        let markup = format_summary("A\n\nB", SummaryMode::Brief);
        assert_eq!(
            markup,
            "<p class=\"summary-text\">A</p><p class=\"summary-text\">B</p>"
        );
    }

    #[test]
    fn test_brief_escapes_markup() {
        let markup = format_summary("1 < 2 & <b>", SummaryMode::Brief);
        assert_eq!(markup, "<p class=\"summary-text\">1 &lt; 2 &amp; &lt;b&gt;</p>");
    }

    #[test]
    fn test_bullets_strips_glyphs_in_order() {
        let markup = format_summary("• one\n• two", SummaryMode::Bullets);

        assert_eq!(count(&markup, "class=\"bullet-point\""), 2);
        assert!(!markup.contains('•'));
        let one = markup.find(">one<").unwrap();
        let two = markup.find(">two<").unwrap();
        assert!(one < two);
        assert_balanced(&markup);
    }

    #[test]
    fn test_bullets_accepts_dash_and_star() {
        let markup = format_summary("- first\n*second\n\n  • third  ", SummaryMode::Bullets);
        assert_eq!(count(&markup, "class=\"bullet-point\""), 3);
        assert!(markup.contains("<span class=\"bullet-text\">second</span>"));
        assert!(markup.contains("<span class=\"bullet-text\">third</span>"));
    }

    #[test]
    fn test_bullets_mixed_with_plain_lines() {
        let markup = format_summary("Key points:\n• one\n•\n• two", SummaryMode::Bullets);

        assert!(markup.starts_with("<p class=\"summary-text\">Key points:</p>"));
        assert_eq!(count(&markup, "class=\"bullet-point\""), 2);
    }

    #[test]
    fn test_bullets_without_bullets_returns_raw() {
        let raw = "random text no bullets";
        assert_eq!(format_summary(raw, SummaryMode::Bullets), raw);
    }

    #[test]
    fn test_bullets_whitespace_only_returns_raw() {
        let raw = "\n  \n";
        assert_eq!(format_summary(raw, SummaryMode::Bullets), raw);
    }

    #[test]
    fn test_display_escapes_bullets_fallback() {
        let raw = "<img src=x onerror=alert(1)> no bullets";
        let markup = display_summary(raw, SummaryMode::Bullets);

        assert_eq!(
            markup,
            "<p class=\"summary-text\">&lt;img src=x onerror=alert(1)&gt; no bullets</p>"
        );
        assert!(!markup.contains("<img"));
        assert_eq!(format_summary(raw, SummaryMode::Bullets), raw);
    }

    #[test]
    fn test_display_matches_format_when_rendered() {
        let raw = "• one\n<b>plain</b>";
        assert_eq!(display_summary(raw, SummaryMode::Bullets), format_summary(raw, SummaryMode::Bullets));
        assert_eq!(display_summary(raw, SummaryMode::Brief), format_summary(raw, SummaryMode::Brief));
        assert_eq!(display_summary(raw, SummaryMode::Detailed), format_summary(raw, SummaryMode::Detailed));
    }

    #[test]
    fn test_detailed_three_sections_in_order() {
        let raw = "📌 OVERVIEW\nThe gist.\n\n🔑 KEY INSIGHTS\nFirst insight.\n\nSecond insight.\n\n💡 TAKEAWAYS\nDo the thing.";
        let markup = format_summary(raw, SummaryMode::Detailed);

        assert_eq!(count(&markup, "<div class=\"summary-section\">"), 3);
        let overview = markup.find("section-header overview").unwrap();
        let insights = markup.find("section-header insights").unwrap();
        let takeaways = markup.find("section-header takeaways").unwrap();
        assert!(overview < insights && insights < takeaways);
        assert!(markup.ends_with("</div>"));
        assert!(markup.contains("<p class=\"summary-text\">Second insight.</p>"));
        assert_balanced(&markup);
    }

    #[test]
    fn test_detailed_markers_are_case_insensitive_and_glyph_optional() {
        let raw = "Overview\nshort\n\nkey insights: many\n\nTakeaways\nfew";
        let markup = format_summary(raw, SummaryMode::Detailed);

        assert_eq!(count(&markup, "<div class=\"summary-section\">"), 3);
        assert!(markup.contains("<p class=\"summary-text\">many</p>"));
        assert_balanced(&markup);
    }

    #[test]
    fn test_detailed_markdown_bold_markers() {
        let raw = "**📌 OVERVIEW**\nThe gist.\n\n**🔑 KEY INSIGHTS**\nPoint.\n\n**💡 TAKEAWAYS**\nDo it.";
        let markup = format_summary(raw, SummaryMode::Detailed);

        assert_eq!(count(&markup, "<div class=\"summary-section\">"), 3);
        assert!(!markup.contains("**"));
        assert!(markup.contains("<p class=\"summary-text\">The gist.</p>"));
        assert_balanced(&markup);
    }

    #[test]
    fn test_detailed_markdown_heading_markers() {
        let raw = "## 📌 OVERVIEW\nThe gist.\n\n### KEY INSIGHTS:\nPoint.";
        let markup = format_summary(raw, SummaryMode::Detailed);

        assert_eq!(count(&markup, "<div class=\"summary-section\">"), 2);
        assert!(!markup.contains('#'));
        assert!(markup.contains("<p class=\"summary-text\">Point.</p>"));
        assert_balanced(&markup);
    }

    #[test]
    fn test_detailed_glyph_marker_mid_line() {
        let raw = "Here is the summary. 📌 OVERVIEW The gist.";
        let markup = format_summary(raw, SummaryMode::Detailed);

        assert!(markup.starts_with("<p class=\"summary-text\">Here is the summary.</p>"));
        assert_eq!(count(&markup, "<div class=\"summary-section\">"), 1);
        assert!(markup.contains("<p class=\"summary-text\">The gist.</p>"));
        assert_balanced(&markup);
    }

    #[test]
    fn test_detailed_missing_markers_are_absent() {
        let raw = "🔑 KEY INSIGHTS\nOnly insights here.";
        let markup = format_summary(raw, SummaryMode::Detailed);

        assert_eq!(count(&markup, "<div class=\"summary-section\">"), 1);
        assert!(!markup.contains("overview"));
        assert!(!markup.contains("takeaways"));
        assert_balanced(&markup);
    }

    #[test]
    fn test_detailed_keeps_text_before_first_marker() {
        let raw = "Intro line.\n\n📌 OVERVIEW\nBody.";
        let markup = format_summary(raw, SummaryMode::Detailed);
        assert!(markup.starts_with("<p class=\"summary-text\">Intro line.</p><div class=\"summary-section\">"));
    }

    #[test]
    fn test_detailed_ignores_marker_words_mid_line() {
        let raw = "This article gives an overview of takeaways.";
        let markup = format_summary(raw, SummaryMode::Detailed);
        assert_eq!(markup, format_summary(raw, SummaryMode::Brief));
    }
}
