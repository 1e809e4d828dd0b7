/// Presentation helpers for history cards
use chrono::{Local, TimeZone};
use regex::Regex;
use std::sync::LazyLock;

/// Characters of plain text shown in a history card
pub const PREVIEW_CHARS: usize = 120;

pub const UNTITLED_SUMMARY: &str = "Untitled Summary";
pub const UNTITLED_PAGE: &str = "Untitled Page";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// "Just now", "5m ago", "3h ago", "2d ago", then a calendar date
pub fn relative_age(timestamp: i64, now: i64) -> String {
    let elapsed = now.saturating_sub(timestamp);

    if elapsed < MINUTE_MS {
        "Just now".to_string()
    } else if elapsed < HOUR_MS {
        format!("{}m ago", elapsed / MINUTE_MS)
    } else if elapsed < DAY_MS {
        format!("{}h ago", elapsed / HOUR_MS)
    } else if elapsed < 7 * DAY_MS {
        format!("{}d ago", elapsed / DAY_MS)
    } else {
        Local
            .timestamp_millis_opt(timestamp)
            .single()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

/// Plain text of stored markup
pub fn strip_markup(markup: &str) -> String {
    let text = TAG.replace_all(markup, " ");
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&");
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// First characters of the summary's text, always followed by "..."
pub fn preview(markup: &str) -> String {
    let text: String = strip_markup(markup).chars().take(PREVIEW_CHARS).collect();
    format!("{}...", text)
}

pub fn entry_title(title: &str) -> &str {
    if title.trim().is_empty() { UNTITLED_SUMMARY } else { title }
}

pub fn page_title(title: Option<String>) -> String {
    title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNTITLED_PAGE.to_string())
}
