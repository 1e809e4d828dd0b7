/// Error types for the summarizer popup
use thiserror::Error;

/// Message shown for any failure that has no better explanation
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate summary. Please try again later.";

/// Used when the API rejects a request without saying why
pub const API_REQUEST_FAILED_MESSAGE: &str = "API request failed";

/// Failures of a single generation request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The API answered with an error body
    #[error("{0}")]
    Api(String),

    /// Transport or decoding failure; the cause is logged, not shown
    #[error("Failed to generate summary. Please try again later.")]
    Failed,
}

/// Failures reading or writing extension storage
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage bridge error: {0}")]
    Bridge(String),

    #[error("Stored data is malformed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Failed to convert storage value: {0}")]
    Codec(String),
}

/// Failures of the summarize action as presented to the user
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("API key not found. Please set your API key in the extension options.")]
    MissingCredential,

    #[error("Could not extract article text from this page.")]
    MissingArticleText,

    #[error("Error: {0}")]
    Generation(#[from] GenerationError),

    #[error("A summary is already being generated.")]
    Busy,

    #[error("Browser error: {0}")]
    Host(String),
}
