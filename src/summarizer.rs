/// The "Summarize" action

use log::{error, info, warn};
use std::cell::Cell;

use crate::bridge;
use crate::display;
use crate::error::SummarizeError;
use crate::formatter::display_summary;
use crate::generation::{FetchTransport, GenerationClient, GenerationConfig, Transport};
use crate::history::{HistoryEntry, HistoryStore};
use crate::mode::SummaryMode;
use crate::storage::{ChromeStorage, KeyValueStore};

/// Settings key written by the options page
pub const API_KEY_SETTING: &str = "geminiApiKey";

/// What the popup needs from the browser for one summary
#[allow(async_fn_in_trait)]
pub trait PopupHost {
    async fn api_key(&self) -> Result<Option<String>, SummarizeError>;

    /// Text extracted by the content script of the active tab
    async fn article_text(&self) -> Result<Option<String>, SummarizeError>;

    async fn page_title(&self) -> Result<Option<String>, SummarizeError>;
}

/// The real extension environment, through popup.js
#[derive(Debug, Clone, Copy)]
pub struct BrowserHost {
    settings: ChromeStorage,
}

impl BrowserHost {
    pub fn new() -> Self {
        BrowserHost {
            settings: ChromeStorage::sync(),
        }
    }
}

impl Default for BrowserHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PopupHost for BrowserHost {
    async fn api_key(&self) -> Result<Option<String>, SummarizeError> {
        self.settings
            .get_as::<String>(API_KEY_SETTING)
            .await
            .map_err(|e| SummarizeError::Host(e.to_string()))
    }

    async fn article_text(&self) -> Result<Option<String>, SummarizeError> {
        bridge::request_article_text()
            .await
            .map(|text| text.as_string())
            .map_err(|e| SummarizeError::Host(bridge::describe_js_error(&e)))
    }

    async fn page_title(&self) -> Result<Option<String>, SummarizeError> {
        bridge::get_active_tab_title()
            .await
            .map(|title| title.as_string())
            .map_err(|e| SummarizeError::Host(bridge::describe_js_error(&e)))
    }
}

/// Result of a successful summary
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub markup: String,
    /// `None` when saving to history failed
    pub entry: Option<HistoryEntry>,
}

/// Clears the in-flight flag when the action ends, however it ends
struct InFlightGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(InFlightGuard { flag })
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

pub struct Summarizer<H, T = FetchTransport, S = ChromeStorage> {
    host: H,
    client: GenerationClient<T>,
    history: HistoryStore<S>,
    in_flight: Cell<bool>,
}

impl Summarizer<BrowserHost> {
    /// Wired to chrome.storage, the active tab and the Gemini API
    pub fn for_extension() -> Self {
        Summarizer::new(
            BrowserHost::new(),
            GenerationClient::new(GenerationConfig::default()),
            HistoryStore::new(ChromeStorage::local()),
        )
    }
}

impl<H: PopupHost, T: Transport, S: KeyValueStore> Summarizer<H, T, S> {
    pub fn new(host: H, client: GenerationClient<T>, history: HistoryStore<S>) -> Self {
        Summarizer {
            host,
            client,
            history,
            in_flight: Cell::new(false),
        }
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn client(&self) -> &GenerationClient<T> {
        &self.client
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    pub async fn summarize(&self, mode: SummaryMode) -> Result<Summary, SummarizeError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            warn!("Summary requested while another is running");
            SummarizeError::Busy
        })?;

        let api_key = self
            .host
            .api_key()
            .await?
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                warn!("No API key configured");
                SummarizeError::MissingCredential
            })?;

        let article = self
            .host
            .article_text()
            .await?
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                warn!("Content script returned no article text");
                SummarizeError::MissingArticleText
            })?;

        let text = self.client.generate(&article, mode, &api_key).await?;
        let markup = display_summary(&text, mode);

        let title = match self.host.page_title().await {
            Ok(title) => display::page_title(title),
            Err(e) => {
                warn!("Could not read page title: {}", e);
                display::page_title(None)
            }
        };

        let entry = match self.history.save(&title, &markup, mode).await {
            Ok(entry) => Some(entry),
            Err(e) => {
                error!("Failed to save summary to history: {}", e);
                None
            }
        };

        info!("Generated {} summary for '{}'", mode, title);
        Ok(Summary { markup, entry })
    }
}
