//! Production [`Fetcher`] over `reqwest`.

use async_trait::async_trait;
use registry_verification::{FetchError, FetchResponse, Fetcher};
use std::time::Duration;

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Bodies beyond this are cut; proofs sit near the top of any page we fetch.
const MAX_BODY_BYTES: usize = 512 * 1024;

const USER_AGENT: &str = concat!("registry-engine/", env!("CARGO_PKG_VERSION"));

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .user_agent(USER_AGENT)
            .https_only(true)
            .build()
            .map_err(|e| FetchError::Transport(format!("client setup: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let mut response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/dns-json, application/json, text/*")
            .send()
            .await
            .map_err(classify)?;
        let status = response.status().as_u16();

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            let room = MAX_BODY_BYTES - body.len();
            body.extend_from_slice(&chunk[..chunk.len().min(room)]);
            if body.len() >= MAX_BODY_BYTES {
                break;
            }
        }
        Ok(FetchResponse::new(
            status,
            String::from_utf8_lossy(&body).into_owned(),
        ))
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Transport(format!("connection failed: {e}"))
    } else {
        FetchError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_custom_timeout() {
        assert!(HttpFetcher::new(Duration::from_secs(3)).is_ok());
    }

    #[tokio::test]
    async fn plain_http_is_refused() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1)).unwrap();
        let err = fetcher.fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
