//! Field extraction from channel preview markup.
//!
//! Every extractor operates on one `.tgme_widget_message` node and is
//! independently best-effort: a missing sub-element degrades to the field's
//! default (empty string, zero, `None`) instead of failing the call. The
//! single exception is the date-stamp anchor; a message without one has no
//! permalink and is dropped from the page entirely.
//!
//! The media URL extractors are ordered cascades of independent strategies;
//! the ordering is a tested contract because upstream markup changes tend to
//! break individual strategies, not all of them at once.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::ScrapeError;
use crate::models::{MediaKind, MediaType, Post};
use crate::scrape::channel::PREVIEW_HOST;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

static MESSAGE: LazyLock<Selector> = LazyLock::new(|| selector(".tgme_widget_message"));
static ERROR_PAGE: LazyLock<Selector> = LazyLock::new(|| selector(".tgme_page_error"));
static TEXT_BLOCK: LazyLock<Selector> = LazyLock::new(|| selector(".tgme_widget_message_text"));
static DATE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.tgme_widget_message_date"));
static VIEWS: LazyLock<Selector> = LazyLock::new(|| selector(".tgme_widget_message_views"));
static FORWARDS: LazyLock<Selector> = LazyLock::new(|| selector(".tgme_widget_message_forwards"));
static POLL: LazyLock<Selector> = LazyLock::new(|| selector(".tgme_widget_message_poll"));
static VOICE: LazyLock<Selector> = LazyLock::new(|| selector(".tgme_widget_message_voice"));
static DOCUMENT: LazyLock<Selector> = LazyLock::new(|| selector(".tgme_widget_message_document"));
static VIDEO: LazyLock<Selector> = LazyLock::new(|| selector(".tgme_widget_message_video"));
static PHOTO: LazyLock<Selector> = LazyLock::new(|| selector(".tgme_widget_message_photo"));
static PHOTO_WRAP: LazyLock<Selector> =
    LazyLock::new(|| selector(".tgme_widget_message_photo_wrap"));
static FORWARDED_FROM: LazyLock<Selector> =
    LazyLock::new(|| selector(".tgme_widget_message_forwarded_from"));
static FORWARDED_AUTHOR: LazyLock<Selector> =
    LazyLock::new(|| selector(".tgme_widget_message_forwarded_post_author"));
static TIME_TAG: LazyLock<Selector> = LazyLock::new(|| selector("time"));
static STYLED: LazyLock<Selector> = LazyLock::new(|| selector("[style]"));
static IMG_TAG: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static VIDEO_TAG: LazyLock<Selector> = LazyLock::new(|| selector("video"));
static SOURCE_TAG: LazyLock<Selector> = LazyLock::new(|| selector("source"));
static LAZY_SRC: LazyLock<Selector> = LazyLock::new(|| selector("[data-src]"));

/// Containers checked for a photo URL, in order.
static PHOTO_CONTAINERS: LazyLock<Selector> = LazyLock::new(|| {
    selector(
        ".tgme_widget_message_photo_wrap, .tgme_widget_message_photo, \
         .tgme_widget_message_video_thumb, .tgme_widget_message_video_player",
    )
});

/// Containers checked for a video URL, in order.
static VIDEO_CONTAINERS: LazyLock<Selector> = LazyLock::new(|| {
    selector(
        ".tgme_widget_message_video, .tgme_widget_message_video_player, \
         .tgme_widget_message_video_wrap",
    )
});

/// Channel avatar image class, excluded from the photo fallback search.
const AVATAR_CLASS: &str = "tgme_widget_message_user_photo";

static STYLE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(['"]?(.*?)['"]?\)"#).unwrap());

/// Counter grammar: digits with an optional single decimal separator and an
/// optional K/M suffix, anchored at the start of the token.
static COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+(?:[.,][0-9]+)?)([KM]?)").unwrap());

/// One message successfully extracted from a page, still carrying its
/// internal id. The id drives pagination and ordering only and is stripped
/// before posts are handed to the caller.
#[derive(Debug, Clone)]
pub(crate) struct PagePost {
    pub message_id: Option<i64>,
    pub post: Post,
}

/// Parse one channel preview page into its messages, newest first.
///
/// Returns `UpstreamErrorPage` when the page carries the host's error
/// marker (the preview host renders errors as HTTP 200 pages). An empty
/// vector is the normal end-of-history signal, not an error.
pub(crate) fn parse_channel_page(html: &str, slug: &str) -> Result<Vec<PagePost>, ScrapeError> {
    let document = Html::parse_document(html);
    if document.select(&ERROR_PAGE).next().is_some() {
        return Err(ScrapeError::UpstreamErrorPage);
    }

    let mut posts = Vec::new();
    // The page lists oldest first; reverse so the newest comes first.
    for message in document.select(&MESSAGE).collect::<Vec<_>>().into_iter().rev() {
        if let Some(page_post) = extract_message(&message, slug) {
            posts.push(page_post);
        }
    }
    Ok(posts)
}

/// Parse a single-post preview page, locating the message whose `data-post`
/// attribute matches `<slug>/<post_id>`.
pub(crate) fn parse_post_page(html: &str, slug: &str, post_id: i64) -> Result<Post, ScrapeError> {
    let document = Html::parse_document(html);
    if document.select(&ERROR_PAGE).next().is_some() {
        return Err(ScrapeError::UpstreamErrorPage);
    }

    let wanted = format!("{}/{}", slug, post_id);
    let message = document
        .select(&MESSAGE)
        .find(|m| m.value().attr("data-post") == Some(wanted.as_str()))
        .ok_or(ScrapeError::NoPostsExtracted)?;

    extract_message(&message, slug)
        .map(|page_post| page_post.post)
        .ok_or(ScrapeError::NoPostsExtracted)
}

/// Extract one message node into a post, or `None` when the message lacks
/// its date-stamp anchor (no permalink means the record is unusable).
fn extract_message(message: &ElementRef, slug: &str) -> Option<PagePost> {
    let post_link = extract_post_link(message)?;
    let media_type = detect_media_type(message);

    let post = Post {
        channel_slug: slug.to_string(),
        channel_link: format!("https://{}/{}", PREVIEW_HOST, slug),
        post_link,
        text: extract_text(message),
        posted_at: extract_timestamp(message),
        views: extract_views(message),
        forwards: extract_forwards(message),
        has_media: media_type.is_media(),
        is_forwarded: is_forwarded(message),
        media_type,
        photo_url: extract_photo_url(message),
        video_url: extract_video_url(message),
    };

    Some(PagePost {
        message_id: extract_message_id(message),
        post,
    })
}

/// Message body: line-level text content of the text block, blank lines
/// collapsed, surrounding whitespace trimmed. Empty if there is no block.
fn extract_text(message: &ElementRef) -> String {
    match message.select(&TEXT_BLOCK).next() {
        Some(block) => block
            .text()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        None => String::new(),
    }
}

/// Permalink from the date-stamp anchor.
fn extract_post_link(message: &ElementRef) -> Option<String> {
    message
        .select(&DATE_LINK)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(|href| href.to_string())
}

fn extract_views(message: &ElementRef) -> u64 {
    counter_text(message, &VIEWS)
}

fn extract_forwards(message: &ElementRef) -> u64 {
    counter_text(message, &FORWARDS)
}

fn counter_text(message: &ElementRef, which: &Selector) -> u64 {
    match message.select(which).next() {
        Some(tag) => parse_counter(&tag.text().collect::<String>()),
        None => 0,
    }
}

/// Parse a counter token with K/M suffixes: `1 234` → 1234, `1.2K` → 1200,
/// `3,5M` → 3500000. A token matching no numeric pattern degrades to
/// "strip non-digits, parse what's left, else 0".
pub(crate) fn parse_counter(raw: &str) -> u64 {
    let token: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if let Some(captures) = COUNTER.captures(&token) {
        let number: f64 = captures[1].replace(',', ".").parse().unwrap_or(0.0);
        let scaled = match &captures[2] {
            "K" => number * 1_000.0,
            "M" => number * 1_000_000.0,
            _ => number,
        };
        return scaled as u64;
    }

    let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Timestamp from the first `<time datetime="...">` attribute, converted to
/// naive UTC. Unparseable or absent values yield `None`.
fn extract_timestamp(message: &ElementRef) -> Option<NaiveDateTime> {
    let value = message
        .select(&TIME_TAG)
        .next()
        .and_then(|tag| tag.value().attr("datetime"))?;
    parse_datetime(value)
}

pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(aware) = DateTime::parse_from_rfc3339(value) {
        return Some(aware.with_timezone(&Utc).naive_utc());
    }
    // Values without an offset are already naive UTC.
    value.parse::<NaiveDateTime>().ok()
}

/// Ordered media classification: poll → voice → document → video →
/// gallery/photo → plain text.
fn detect_media_type(message: &ElementRef) -> MediaType {
    let has_text = message.select(&TEXT_BLOCK).next().is_some();

    if message.select(&POLL).next().is_some() {
        return MediaType::single(MediaKind::Poll, has_text);
    }
    if message.select(&VOICE).next().is_some() {
        return MediaType::single(MediaKind::Voice, has_text);
    }
    if message.select(&DOCUMENT).next().is_some() {
        return MediaType::single(MediaKind::Document, has_text);
    }
    if message.select(&VIDEO).next().is_some() {
        return MediaType::single(MediaKind::Video, has_text);
    }

    let photo_wraps = message.select(&PHOTO_WRAP).count();
    if photo_wraps > 1 {
        return MediaType::gallery(photo_wraps, has_text);
    }
    if photo_wraps == 1 || message.select(&PHOTO).next().is_some() {
        return MediaType::single(MediaKind::Photo, has_text);
    }

    MediaType::text(has_text)
}

/// Forwarded when either of the two forwarded-from markers is present.
fn is_forwarded(message: &ElementRef) -> bool {
    message.select(&FORWARDED_FROM).next().is_some()
        || message.select(&FORWARDED_AUTHOR).next().is_some()
}

/// Internal message id from the `data-post="<slug>/<id>"` attribute.
fn extract_message_id(message: &ElementRef) -> Option<i64> {
    let attribute = message.value().attr("data-post")?;
    attribute.rsplit('/').next()?.parse().ok()
}

/// Protocol-relative URLs come back scheme-qualified.
fn absolutize(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        url.to_string()
    }
}

fn background_image_url(element: &ElementRef) -> Option<String> {
    let style = element.value().attr("style")?;
    let captures = STYLE_URL.captures(style)?;
    Some(absolutize(&captures[1]))
}

/// Best-effort photo URL, first strategy wins:
/// 1. known photo/thumb containers: background-image style, or `src` when
///    the container itself is an `<img>`;
/// 2. any element styled with a background-image;
/// 3. any `<img>` that is not the channel avatar.
fn extract_photo_url(message: &ElementRef) -> Option<String> {
    for container in message.select(&PHOTO_CONTAINERS) {
        if let Some(url) = background_image_url(&container) {
            return Some(url);
        }
        if container.value().name() == "img" {
            if let Some(src) = container.value().attr("src") {
                return Some(absolutize(src));
            }
        }
    }

    for styled in message.select(&STYLED) {
        let has_background = styled
            .value()
            .attr("style")
            .is_some_and(|style| style.contains("background-image"));
        if has_background {
            if let Some(url) = background_image_url(&styled) {
                return Some(url);
            }
        }
    }

    for image in message.select(&IMG_TAG) {
        let is_avatar = image.value().classes().any(|class| class == AVATAR_CLASS);
        if is_avatar {
            continue;
        }
        if let Some(src) = image.value().attr("src") {
            return Some(absolutize(src));
        }
    }

    None
}

/// Best-effort video URL, first strategy wins:
/// 1. known video containers: background-image style, then an embedded
///    `<video>` (its `src`, then a `<source>` child);
/// 2. any `<video>` in the message, same `src`/`<source>` order;
/// 3. any `data-src` lazy-load attribute.
fn extract_video_url(message: &ElementRef) -> Option<String> {
    for container in message.select(&VIDEO_CONTAINERS) {
        let has_background = container
            .value()
            .attr("style")
            .is_some_and(|style| style.contains("background-image"));
        if has_background {
            if let Some(url) = background_image_url(&container) {
                return Some(url);
            }
        }
        if let Some(video) = container.select(&VIDEO_TAG).next() {
            if let Some(url) = video_source(&video) {
                return Some(url);
            }
        }
    }

    for video in message.select(&VIDEO_TAG) {
        if let Some(url) = video_source(&video) {
            return Some(url);
        }
    }

    for lazy in message.select(&LAZY_SRC) {
        if let Some(url) = lazy.value().attr("data-src") {
            return Some(absolutize(url));
        }
    }

    None
}

fn video_source(video: &ElementRef) -> Option<String> {
    if let Some(src) = video.value().attr("src") {
        return Some(absolutize(src));
    }
    video
        .select(&SOURCE_TAG)
        .next()
        .and_then(|source| source.value().attr("src"))
        .map(absolutize)
}
