//! Nullable fetcher: scripted HTTP responses for testing.
//!
//! URLs without a scripted answer return 404, so a fresh fetcher models a web
//! where nothing has been published yet.

use async_trait::async_trait;
use registry_verification::{FetchError, FetchResponse, Fetcher};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct NullFetcher {
    responses: Mutex<HashMap<String, Result<FetchResponse, FetchError>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<String>>,
}

impl NullFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `status` and `body` from now on.
    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(FetchResponse::new(status, body)));
    }

    /// Fail every fetch of `url` with `error`.
    pub fn fail(&self, url: &str, error: FetchError) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(error));
    }

    /// Sleep before answering `url`. Pair with a paused tokio clock.
    pub fn delay(&self, url: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(url.to_string(), delay);
    }

    /// Forget any scripted answer for `url`; it reverts to 404.
    pub fn clear(&self, url: &str) {
        self.responses.lock().unwrap().remove(url);
        self.delays.lock().unwrap().remove(url);
    }

    /// Every URL fetched, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl Fetcher for NullFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        let delay = self.delays.lock().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Ok(FetchResponse::new(404, "")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unscripted_urls_are_not_found() {
        let fetcher = NullFetcher::new();
        let resp = fetcher.fetch("https://example.com/").await.unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(fetcher.call_count("https://example.com/"), 1);
    }

    #[tokio::test]
    async fn scripted_answers_can_be_replaced_and_cleared() {
        let fetcher = NullFetcher::new();
        let url = "https://example.com/a";
        fetcher.respond(url, 200, "hello");
        assert_eq!(fetcher.fetch(url).await.unwrap().body, "hello");

        fetcher.fail(url, FetchError::Transport("reset".into()));
        assert!(fetcher.fetch(url).await.is_err());

        fetcher.clear(url);
        assert_eq!(fetcher.fetch(url).await.unwrap().status, 404);
        assert_eq!(fetcher.calls().len(), 3);
    }
}
