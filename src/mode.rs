/// Summary modes and the per-mode behaviour table
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::formatter;

/// The summary style selected in the popup
///
/// Stored as its lowercase name. Anything unrecognised reads back as `Brief`,
/// so an old or hand-edited history entry still renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SummaryMode {
    #[default]
    Brief,
    Detailed,
    Bullets,
}

/// Everything that differs between modes
pub struct ModeProfile {
    /// Human readable name for history cards
    pub label: &'static str,
    /// Instruction placed in front of the article text
    pub prompt_preamble: &'static str,
    /// Rendering rule from raw generated text to markup
    pub render: fn(&str) -> String,
}

const BRIEF_PREAMBLE: &str = "You are a modern content curator creating engaging summaries. \
Provide a brief, punchy summary of the following article in 2-3 sentences. \
Make it clear, compelling, and easy to understand. \
Use active voice and present tense where appropriate:\n\n";

const DETAILED_PREAMBLE: &str = "You are a modern content curator creating comprehensive summaries. \
Provide a detailed, well-structured summary of the following article. Use the following format:

📌 OVERVIEW
[A compelling 1-2 sentence overview]

🔑 KEY INSIGHTS
[Cover all main points with clear explanations, organized logically]

💡 TAKEAWAYS
[2-3 practical takeaways or conclusions]

Make it engaging, informative, and easy to scan. \
Use clear language and maintain a modern, professional tone:\n\n";

const BULLETS_PREAMBLE: &str = "You are a modern content curator creating scannable summaries. \
Extract the most important insights from the following article and present them as 5-7 bullet points.

Format each point as:
• [Concise, impactful statement of the key insight]

Requirements:
- Start each bullet with \"•\" (bullet symbol)
- Keep each point to 1-2 sentences maximum
- Use active voice and clear language
- Make each point standalone and actionable
- Focus on the most valuable insights
- Use modern, engaging language

Article to summarize:\n\n";

static BRIEF: ModeProfile = ModeProfile {
    label: "Brief",
    prompt_preamble: BRIEF_PREAMBLE,
    render: formatter::render_paragraphs,
};

static DETAILED: ModeProfile = ModeProfile {
    label: "Detailed",
    prompt_preamble: DETAILED_PREAMBLE,
    render: formatter::render_sections,
};

static BULLETS: ModeProfile = ModeProfile {
    label: "Bullets",
    prompt_preamble: BULLETS_PREAMBLE,
    render: formatter::render_bullets,
};

impl SummaryMode {
    pub const ALL: [SummaryMode; 3] = [SummaryMode::Brief, SummaryMode::Detailed, SummaryMode::Bullets];

    pub fn profile(self) -> &'static ModeProfile {
        match self {
            SummaryMode::Brief => &BRIEF,
            SummaryMode::Detailed => &DETAILED,
            SummaryMode::Bullets => &BULLETS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SummaryMode::Brief => "brief",
            SummaryMode::Detailed => "detailed",
            SummaryMode::Bullets => "bullets",
        }
    }

    pub fn label(self) -> &'static str {
        self.profile().label
    }

    /// Parse a stored or selected mode name, defaulting to `Brief`
    pub fn parse(value: &str) -> SummaryMode {
        match value.trim().to_ascii_lowercase().as_str() {
            "detailed" => SummaryMode::Detailed,
            "bullets" => SummaryMode::Bullets,
            _ => SummaryMode::Brief,
        }
    }

    /// Full prompt for an already truncated article
    pub fn prompt(self, article: &str) -> String {
        format!("{}{}", self.profile().prompt_preamble, article)
    }
}

impl From<String> for SummaryMode {
    fn from(value: String) -> Self {
        SummaryMode::parse(&value)
    }
}

impl From<SummaryMode> for String {
    fn from(mode: SummaryMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
