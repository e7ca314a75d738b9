//! Page retrieval over HTTP.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, USER_AGENT,
};
use reqwest::StatusCode;
use thiserror::Error;

/// A hung server must not stall the scheduler slot indefinitely.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser-like User-Agent; some sites reject obvious bots.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/122.0.0.0 Safari/537.36";

/// Errors surfaced while fetching the monitored page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client itself could not be constructed.
    #[error("building HTTP client failed: {0}")]
    Client(#[source] reqwest::Error),
    /// Connection, TLS, or timeout failure before a response arrived.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with an error status.
    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },
    /// The response body could not be read as text.
    #[error("reading body from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Blocking page fetcher with a browser-like header set.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .default_headers(browser_headers())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// GET `url` and return the response body as text.
    ///
    /// Redirects are followed; a final 4xx/5xx status is an error. Single
    /// attempt, no retries.
    pub fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

// Accept-Encoding is left to the client itself so bodies arrive decoded.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ja,en-US;q=0.9,en;q=0.8"),
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(
        "upgrade-insecure-requests",
        HeaderValue::from_static("1"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers
}
