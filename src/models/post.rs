//! Post model produced by the channel preview scrape.
//!
//! A `Post` is constructed fresh per extraction call and is immutable
//! afterwards; the pipeline holds no persistent store.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Kind of media attached to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Text,
    Photo,
    Video,
    Gallery,
    Poll,
    Voice,
    Document,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Gallery => "gallery",
            Self::Poll => "poll",
            Self::Voice => "voice",
            Self::Document => "document",
        }
    }
}

/// Media classification for a post: the kind, whether a text block
/// accompanies it, and how many photo containers a gallery holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaType {
    pub kind: MediaKind,
    pub has_text: bool,
    pub media_count: usize,
}

impl MediaType {
    /// Plain text classification (no media).
    pub fn text(has_text: bool) -> Self {
        Self {
            kind: MediaKind::Text,
            has_text,
            media_count: 0,
        }
    }

    /// Single-media classification of the given kind.
    pub fn single(kind: MediaKind, has_text: bool) -> Self {
        Self {
            kind,
            has_text,
            media_count: 1,
        }
    }

    /// Photo gallery with the given container count.
    pub fn gallery(count: usize, has_text: bool) -> Self {
        Self {
            kind: MediaKind::Gallery,
            has_text,
            media_count: count,
        }
    }

    /// True for any classification other than plain text.
    pub fn is_media(&self) -> bool {
        self.kind != MediaKind::Text
    }

    /// Emoji marker used when rendering a post line in a summary.
    pub fn emoji(&self) -> &'static str {
        match self.kind {
            MediaKind::Poll => "📊",
            MediaKind::Voice => "🎤",
            MediaKind::Document => "📎",
            MediaKind::Video => {
                if self.has_text {
                    "🎬"
                } else {
                    "📹"
                }
            }
            MediaKind::Gallery => {
                if self.has_text {
                    "🖼📸"
                } else {
                    "🖼"
                }
            }
            MediaKind::Photo => {
                if self.has_text {
                    "🖼✍️"
                } else {
                    "🖼"
                }
            }
            MediaKind::Text => "📄",
        }
    }
}

/// A single post extracted from a channel preview page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Bare channel identifier, as supplied.
    pub channel_slug: String,
    /// Canonical `https://t.me/<slug>` link.
    pub channel_link: String,
    /// Permalink to this specific post.
    pub post_link: String,
    /// Post body, empty if the post has no text block.
    pub text: String,
    /// Publication time in naive UTC, when the markup carried one.
    pub posted_at: Option<NaiveDateTime>,
    pub views: u64,
    pub forwards: u64,
    pub has_media: bool,
    pub is_forwarded: bool,
    pub media_type: MediaType,
    /// Best-effort direct photo URL, when derivable from the markup.
    pub photo_url: Option<String>,
    /// Best-effort direct video URL, when derivable from the markup.
    pub video_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_as_str() {
        assert_eq!(MediaKind::Gallery.as_str(), "gallery");
        assert_eq!(MediaKind::Text.as_str(), "text");
    }

    #[test]
    fn test_text_classification_is_not_media() {
        let media = MediaType::text(true);
        assert!(!media.is_media());
        assert_eq!(media.media_count, 0);
    }

    #[test]
    fn test_emoji_varies_with_text_presence() {
        assert_eq!(MediaType::single(MediaKind::Video, true).emoji(), "🎬");
        assert_eq!(MediaType::single(MediaKind::Video, false).emoji(), "📹");
        assert_eq!(MediaType::text(true).emoji(), "📄");
    }
}
