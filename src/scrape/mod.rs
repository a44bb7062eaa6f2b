//! Channel preview scraping pipeline.
//!
//! The pipeline turns a user-supplied channel reference into an ordered
//! batch of [`Post`] records by fetching the public preview feed page by
//! page, extracting message fields, and paginating backward with a
//! `before` cursor until history, the page budget, or the cursor runs out.
//! Direct single-post retrieval by numeric id uses the same extraction on
//! the post's own preview page.
//!
//! Everything is synchronous and sequential per call; async callers should
//! dispatch a whole scrape through `tokio::task::spawn_blocking`.

pub mod channel;
mod extract;
mod http_client;

use thiserror::Error;
use tracing::{debug, info};

pub use channel::{channel_link, normalize_channel, parse_post_link};
pub use http_client::{HttpClient, PREVIEW_BASE_URL};

use crate::config::ScrapeSettings;
use crate::models::Post;
use extract::{parse_channel_page, parse_post_page, PagePost};

/// Hard ceiling on pages fetched in one call.
pub const MAX_PAGES: usize = 20;

/// Failures at the scraping boundary. All are terminal for the current
/// call; none are retried internally. Field-level extraction problems never
/// surface here, they degrade to defaults during extraction.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network-level failure: DNS, connect, or timeout.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 404: the channel or post does not exist or is private.
    #[error("channel or post not found (it may be private or deleted)")]
    NotFoundOrPrivate,

    /// HTTP 403 or 429: the preview host refused the request.
    #[error("access to the preview host is blocked (HTTP {0}), try again later or via a proxy")]
    AccessBlocked(u16),

    /// Any other non-200 status.
    #[error("preview host returned status {0}")]
    UnexpectedStatus(u16),

    /// HTTP 200 whose body carries the host's error-page marker.
    #[error("preview host served an error page (the channel may be hidden or require authorization)")]
    UpstreamErrorPage,

    /// No usable posts across all fetched pages. Indistinguishable from a
    /// legitimately empty channel, which is treated the same way.
    #[error("no posts could be extracted (the page layout may have changed or the channel is empty)")]
    NoPostsExtracted,

    /// The supplied reference contains no channel name at all.
    #[error("no usable channel name in {0:?}")]
    InvalidChannel(String),
}

/// Scraper for public channel previews.
///
/// Each call builds its own HTTP client and accumulator, so concurrent
/// calls for different channels are fully independent.
pub struct ChannelScraper {
    settings: ScrapeSettings,
}

impl ChannelScraper {
    pub fn new(settings: ScrapeSettings) -> Self {
        Self { settings }
    }

    /// Scrape up to `pages` pages of a channel (clamped to `1..=20`),
    /// returning posts newest first.
    pub fn fetch_posts(&self, channel: &str, pages: usize) -> Result<Vec<Post>, ScrapeError> {
        let slug = normalize_channel(channel);
        if slug.is_empty() {
            return Err(ScrapeError::InvalidChannel(channel.to_string()));
        }

        let client = HttpClient::new(&self.settings);
        let collected = walk_pages(
            |before| client.fetch_channel_page(&slug, before),
            &slug,
            pages.clamp(1, MAX_PAGES),
        )?;

        info!(channel = %slug, posts = collected.len(), "channel scrape complete");
        Ok(assemble(collected))
    }

    /// Fetch one specific post by its numeric id.
    pub fn fetch_single_post(&self, channel: &str, post_id: i64) -> Result<Post, ScrapeError> {
        let slug = normalize_channel(channel);
        if slug.is_empty() {
            return Err(ScrapeError::InvalidChannel(channel.to_string()));
        }

        let client = HttpClient::new(&self.settings);
        let html = client.fetch_post_page(&slug, post_id)?;
        parse_post_page(&html, &slug, post_id)
    }
}

impl Default for ChannelScraper {
    fn default() -> Self {
        Self::new(ScrapeSettings::default())
    }
}

/// Drive the pagination loop over a page-fetching function.
///
/// Each iteration fetches one page with the current cursor, parses it, and
/// advances the cursor to the minimum message id seen. The loop stops when
/// the page budget is spent, a page yields nothing (normal end of history),
/// or the cursor collapses to `<= 1`. Zero posts overall is a failure.
fn walk_pages<F>(mut fetch: F, slug: &str, pages: usize) -> Result<Vec<PagePost>, ScrapeError>
where
    F: FnMut(Option<i64>) -> Result<String, ScrapeError>,
{
    let mut collected: Vec<PagePost> = Vec::new();
    let mut before: Option<i64> = None;

    for page in 0..pages {
        let html = fetch(before)?;
        let page_posts = parse_channel_page(&html, slug)?;
        if page_posts.is_empty() {
            debug!(page, "empty page, stopping pagination");
            break;
        }

        let min_id = page_posts.iter().filter_map(|p| p.message_id).min();
        collected.extend(page_posts);

        match min_id {
            Some(id) if id > 1 => before = Some(id),
            _ => {
                debug!(page, "pagination cursor exhausted");
                break;
            }
        }
    }

    if collected.is_empty() {
        return Err(ScrapeError::NoPostsExtracted);
    }
    Ok(collected)
}

/// Merge the accumulated pages newest first and strip the internal ids.
fn assemble(mut collected: Vec<PagePost>) -> Vec<Post> {
    collected.sort_by_key(|p| std::cmp::Reverse(p.message_id.unwrap_or(0)));
    collected.into_iter().map(|p| p.post).collect()
}
