/// Article Summarizer - Chrome Extension popup that summarizes the current page
/// Built with Rust + WASM + Yew

mod bridge;
pub mod display;
pub mod error;
pub mod formatter;
pub mod generation;
pub mod history;
pub mod mode;
pub mod storage;
pub mod summarizer;
pub mod ui;

#[cfg(test)]
mod testing;

use wasm_bindgen::prelude::*;

pub use error::{GenerationError, StorageError, SummarizeError};
pub use mode::SummaryMode;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the formatter for JavaScript access
#[wasm_bindgen]
pub fn format_summary(text: &str, mode: &str) -> String {
    formatter::format_summary(text, SummaryMode::parse(mode))
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
