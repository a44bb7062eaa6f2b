//! Blocking HTTP client for the channel preview pages.
//!
//! One client is constructed per scrape invocation; there is no shared
//! session. Pages are fetched strictly sequentially because each pagination
//! cursor is only known after the previous page is parsed. Retry policy, if
//! any, belongs to the caller.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use super::ScrapeError;
use crate::config::ScrapeSettings;

/// Base URL of the channel preview feed.
pub const PREVIEW_BASE_URL: &str = "https://t.me/s";

/// HTTP client for preview page fetching with a fixed identity.
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client with the configured user agent, language, and
    /// per-request timeout.
    pub fn new(settings: &ScrapeSettings) -> Self {
        let client = Client::builder()
            .user_agent(&settings.user_agent)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .gzip(true)
            .brotli(true)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                if let Ok(value) = settings.accept_language.parse() {
                    headers.insert(reqwest::header::ACCEPT_LANGUAGE, value);
                }
                headers
            })
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: PREVIEW_BASE_URL.to_string(),
        }
    }

    /// Fetch one page of a channel feed, optionally scoped to messages
    /// older than the `before` cursor.
    pub fn fetch_channel_page(
        &self,
        slug: &str,
        before: Option<i64>,
    ) -> Result<String, ScrapeError> {
        let url = match before {
            Some(cursor) => format!("{}/{}?before={}", self.base_url, slug, cursor),
            None => format!("{}/{}", self.base_url, slug),
        };
        self.fetch(&url)
    }

    /// Fetch the preview page for one specific post.
    pub fn fetch_post_page(&self, slug: &str, post_id: i64) -> Result<String, ScrapeError> {
        let url = format!("{}/{}/{}", self.base_url, slug, post_id);
        self.fetch(&url)
    }

    fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        debug!(url, "fetching preview page");
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        match status {
            200 => Ok(response.text()?),
            404 => Err(ScrapeError::NotFoundOrPrivate),
            403 | 429 => Err(ScrapeError::AccessBlocked(status)),
            _ => Err(ScrapeError::UnexpectedStatus(status)),
        }
    }
}
