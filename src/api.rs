use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const BROWSER_LANGUAGE: &str = "en-US,en;q=0.5";

/// Anything that can hand back the raw results page.
#[allow(async_fn_in_trait)]
pub trait MarkupSource {
    async fn fetch(&self) -> Result<String>;
}

/// Fetches the results page over HTTP. One GET, no retries.
pub struct ResultsPage {
    client: reqwest::Client,
    url: String,
}

impl ResultsPage {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_LANGUAGE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl MarkupSource for ResultsPage {
    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("error fetching page {}", self.url))?
            .error_for_status()
            .with_context(|| format!("error fetching page {}", self.url))?;

        let body = response
            .text()
            .await
            .with_context(|| format!("error reading body of {}", self.url))?;
        Ok(body)
    }
}
