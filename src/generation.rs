/// Client for the Gemini `generateContent` API

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;
use url::Url;

use crate::error::{API_REQUEST_FAILED_MESSAGE, GenerationError};
use crate::mode::SummaryMode;

/// Base URL of the model collection
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Low temperature keeps summaries factual
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Articles longer than this many characters are cut before prompting
pub const MAX_ARTICLE_CHARS: usize = 20_000;

pub const TRUNCATION_MARKER: &str = "...";

/// Returned when a successful response carries no text
pub const NO_SUMMARY_PLACEHOLDER: &str = "No summary available.";

/// Endpoint and sampling settings
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f64,
    pub max_article_chars: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_article_chars: MAX_ARTICLE_CHARS,
        }
    }
}

impl GenerationConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_article_chars(mut self, max: usize) -> Self {
        self.max_article_chars = max;
        self
    }

    /// `{endpoint}/{model}:generateContent?key={credential}`
    pub fn endpoint_url(&self, credential: &str) -> Result<Url, url::ParseError> {
        let base = format!("{}/{}:generateContent", self.endpoint.trim_end_matches('/'), self.model);
        Url::parse_with_params(&base, &[("key", credential)])
    }
}

// Wire types

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f64,
}

/// Request body for `generateContent`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationSettings,
}

impl GenerateRequest {
    pub fn new(prompt: String, temperature: f64) -> Self {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: GenerationSettings { temperature },
        }
    }

    /// The prompt text carried by the request
    pub fn prompt(&self) -> Option<&str> {
        self.contents.first()?.parts.first()?.text.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// `candidates[0].content.parts[0].text`, if present and non-empty
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

/// Raw HTTP answer handed back by a transport
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response
#[derive(Error, Debug)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Sends one JSON POST
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post_json(&self, url: &Url, body: String) -> Result<TransportResponse, TransportError>;
}

/// reqwest transport; on wasm32 reqwest goes through `fetch`
#[derive(Debug, Clone, Default)]
pub struct FetchTransport {
    client: reqwest::Client,
}

impl FetchTransport {
    pub fn new() -> Self {
        FetchTransport::default()
    }
}

impl Transport for FetchTransport {
    async fn post_json(&self, url: &Url, body: String) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TransportError(e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}

/// Cut `text` to `max_chars` characters, appending the truncation marker
pub fn truncate_article(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &text[..cut], TRUNCATION_MARKER)),
        None => Cow::Borrowed(text),
    }
}

/// Summary generation over a pluggable transport
#[derive(Debug, Clone)]
pub struct GenerationClient<T = FetchTransport> {
    transport: T,
    config: GenerationConfig,
}

impl GenerationClient<FetchTransport> {
    pub fn new(config: GenerationConfig) -> Self {
        GenerationClient::with_transport(FetchTransport::new(), config)
    }
}

impl<T: Transport> GenerationClient<T> {
    pub fn with_transport(transport: T, config: GenerationConfig) -> Self {
        GenerationClient { transport, config }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Summarize `article` in the given mode
    pub async fn generate(&self, article: &str, mode: SummaryMode, credential: &str) -> Result<String, GenerationError> {
        let article = truncate_article(article, self.config.max_article_chars);
        if matches!(article, Cow::Owned(_)) {
            debug!("Article truncated to {} characters", self.config.max_article_chars);
        }

        let request = GenerateRequest::new(mode.prompt(&article), self.config.temperature);

        let url = self.config.endpoint_url(credential).map_err(|e| {
            error!("Invalid generation endpoint '{}': {}", self.config.endpoint, e);
            GenerationError::Failed
        })?;

        let body = serde_json::to_string(&request).map_err(|e| {
            error!("Failed to encode generation request: {}", e);
            GenerationError::Failed
        })?;

        debug!("Requesting {} summary from {} ({} bytes)", mode, self.config.model, body.len());

        let response = self.transport.post_json(&url, body).await.map_err(|e| {
            error!("Error calling generation API: {}", e);
            GenerationError::Failed
        })?;

        if !response.is_success() {
            return Err(api_error(&response));
        }

        let parsed: GenerateResponse = serde_json::from_str(&response.body).map_err(|e| {
            error!("Malformed generation response: {}", e);
            GenerationError::Failed
        })?;

        Ok(parsed.into_text().unwrap_or_else(|| {
            warn!("Generation response had no text");
            NO_SUMMARY_PLACEHOLDER.to_string()
        }))
    }
}

fn api_error(response: &TransportResponse) -> GenerationError {
    match serde_json::from_str::<ApiErrorBody>(&response.body) {
        Ok(body) => {
            let message = body
                .error
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| API_REQUEST_FAILED_MESSAGE.to_string());
            warn!("Generation API returned {}: {}", response.status, message);
            GenerationError::Api(message)
        }
        Err(e) => {
            error!("Generation API returned {} with unreadable body: {}", response.status, e);
            GenerationError::Failed
        }
    }
}
