use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA, USER_AGENT,
};
use tracing::{debug, info, warn};

const PRICE_URL: &str = "https://bdex.ru/price/primorskiy-kray/?type=eat";

const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 1000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];

// bdex.ru serves a stripped page to obvious non-browser clients
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Fetches the price listing page, posing as a regular browser.
pub struct Fetcher {
    client: reqwest::Client,
    url: String,
}

struct AttemptError {
    message: String,
    transient: bool,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_url(PRICE_URL)
    }

    /// Build a fetcher pointed at an alternate listing URL.
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7"),
        );
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Fetch the page body as text, retrying transient failures.
    ///
    /// Up to `MAX_RETRIES` retries after the first attempt, with 1s/2s/4s
    /// backoff between attempts. Retries cover 500/502/503/504 and transport
    /// errors (timeouts included); any other status is terminal.
    pub async fn fetch(&self) -> Result<String> {
        info!("Fetching prices from {}", self.url);

        for attempt in 0..=MAX_RETRIES {
            let err = match self.attempt().await {
                Ok(text) => {
                    debug!("Received {} bytes of page text", text.len());
                    return Ok(text);
                }
                Err(e) => e,
            };

            if !err.transient || attempt == MAX_RETRIES {
                bail!("Fetching {} failed: {}", self.url, err.message);
            }

            let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
            warn!(
                "Attempt {}/{} failed ({}), backing off {:.1}s",
                attempt + 1,
                MAX_RETRIES + 1,
                err.message,
                backoff.as_secs_f64()
            );
            tokio::time::sleep(backoff).await;
        }

        unreachable!("retry loop returns or bails on the last attempt")
    }

    async fn attempt(&self) -> std::result::Result<String, AttemptError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AttemptError {
                transient: e.is_timeout() || e.is_connect(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError {
                transient: RETRY_STATUSES.contains(&status.as_u16()),
                message: format!("server returned {}", status),
            });
        }

        response.text().await.map_err(|e| AttemptError {
            transient: false,
            message: format!("failed to decode response body: {}", e),
        })
    }
}

// ── Tests ──
