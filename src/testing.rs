/// Test doubles shared by the unit tests
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use url::Url;

use crate::error::SummarizeError;
use crate::generation::{GenerateRequest, Transport, TransportError, TransportResponse};
use crate::summarizer::PopupHost;

/// Records requests and answers every one with the same canned result
pub struct FakeTransport {
    answer: Result<TransportResponse, String>,
    pub requests: RefCell<Vec<(Url, String)>>,
}

impl FakeTransport {
    pub fn responding(status: u16, body: &str) -> Self {
        FakeTransport {
            answer: Ok(TransportResponse { status, body: body.to_string() }),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn succeeding(text: &str) -> Self {
        let body = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        });
        FakeTransport::responding(200, &body.to_string())
    }

    pub fn failing(reason: &str) -> Self {
        FakeTransport {
            answer: Err(reason.to_string()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> GenerateRequest {
        let requests = self.requests.borrow();
        let (_, body) = requests.last().expect("no request was sent");
        serde_json::from_str(body).expect("request body is a GenerateRequest")
    }
}

impl Transport for FakeTransport {
    async fn post_json(&self, url: &Url, body: String) -> Result<TransportResponse, TransportError> {
        self.requests.borrow_mut().push((url.clone(), body));
        self.answer.clone().map_err(TransportError)
    }
}

/// Browser stand-in with fixed answers
#[derive(Default)]
pub struct FakeHost {
    pub api_key: Option<String>,
    pub article: Option<String>,
    pub title: Option<String>,
    /// Suspend once inside `api_key`, to interleave two summaries
    pub yield_on_api_key: bool,
}

impl FakeHost {
    pub fn ready(article: &str) -> Self {
        FakeHost {
            api_key: Some("test-key".to_string()),
            article: Some(article.to_string()),
            title: Some("Test Page".to_string()),
            yield_on_api_key: false,
        }
    }
}

impl PopupHost for FakeHost {
    async fn api_key(&self) -> Result<Option<String>, SummarizeError> {
        if self.yield_on_api_key {
            YieldNow::default().await;
        }
        Ok(self.api_key.clone())
    }

    async fn article_text(&self) -> Result<Option<String>, SummarizeError> {
        Ok(self.article.clone())
    }

    async fn page_title(&self) -> Result<Option<String>, SummarizeError> {
        Ok(self.title.clone())
    }
}

/// Returns `Pending` once, then completes
#[derive(Default)]
pub struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
