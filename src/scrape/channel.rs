//! Channel reference normalization and direct-post-link classification.
//!
//! User-supplied channel references arrive in many shapes: full preview
//! URLs (with or without the `s/` feed-view segment), bare `t.me/...`
//! forms, `@mentions`, or plain slugs, optionally carrying a trailing post
//! id. Everything here reduces those to a bare slug or a `(slug, post id)`
//! pair.

use std::sync::LazyLock;

use regex::Regex;

/// Host serving the public channel preview.
pub const PREVIEW_HOST: &str = "t.me";

/// Leading scheme-and-host prefix, with the optional `s/` feed-view segment.
/// The scheme itself is optional so bare `t.me/...` forms match too.
static HOST_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:https?://)?t\.me/(?:s/)?").unwrap());

/// Strip the preview-host prefix and any leading `@` from a reference.
fn strip_reference(reference: &str) -> &str {
    let cleaned = reference.trim();
    let cleaned = match HOST_PREFIX.find(cleaned) {
        Some(prefix) => &cleaned[prefix.end()..],
        None => cleaned,
    };
    cleaned.trim_start_matches('@')
}

/// Normalize a channel reference to its bare slug.
///
/// Accepts `https://t.me/name`, `https://t.me/s/name`, `t.me/name`,
/// `@name`, `name`, and any of those with a trailing `/123` post id or
/// extra path segments, which are discarded. Returns an empty string when
/// no usable channel token exists. No character-set validation happens
/// here; that is the caller's concern.
pub fn normalize_channel(reference: &str) -> String {
    strip_reference(reference)
        .split('/')
        .next()
        .unwrap_or("")
        .to_string()
}

/// Canonical link for a channel reference in any accepted form.
pub fn channel_link(reference: &str) -> String {
    format!("https://{}/{}", PREVIEW_HOST, normalize_channel(reference))
}

/// Classify a reference as a direct post link, extracting `(slug, post id)`.
///
/// A direct link has exactly two non-empty segments after prefix stripping:
/// the slug and an all-digit id parsing to a strictly positive integer.
/// Leading zeros are accepted (`00345` parses as 345). Anything else, a
/// channel-level reference included, yields `None`.
pub fn parse_post_link(reference: &str) -> Option<(String, i64)> {
    let cleaned = strip_reference(reference);
    let mut parts = cleaned.split('/');
    let slug = parts.next()?;
    let id_part = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    if slug.is_empty() || id_part.is_empty() {
        return None;
    }
    if !id_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let post_id: i64 = id_part.parse().ok()?;
    if post_id <= 0 {
        return None;
    }
    Some((slug.to_string(), post_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_full_urls() {
        assert_eq!(normalize_channel("https://t.me/channelname"), "channelname");
        assert_eq!(normalize_channel("https://t.me/s/channelname"), "channelname");
        assert_eq!(normalize_channel("http://t.me/channelname"), "channelname");
        assert_eq!(normalize_channel("HTTPS://T.ME/channelname"), "channelname");
    }

    #[test]
    fn test_normalize_bare_forms() {
        assert_eq!(normalize_channel("t.me/channelname"), "channelname");
        assert_eq!(normalize_channel("@channelname"), "channelname");
        assert_eq!(normalize_channel("channelname"), "channelname");
    }

    #[test]
    fn test_normalize_discards_trailing_segments() {
        assert_eq!(normalize_channel("https://t.me/channelname/123"), "channelname");
        assert_eq!(normalize_channel("channelname/123/extra"), "channelname");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_channel("  @channelname  "), "channelname");
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize_channel(""), "");
        assert_eq!(normalize_channel("   "), "");
        assert_eq!(normalize_channel("@"), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["https://t.me/s/prog_ai/345", "@prog_ai", "t.me/prog_ai"] {
            let once = normalize_channel(input);
            assert_eq!(normalize_channel(&once), once);
        }
    }

    #[test]
    fn test_channel_link_canonical_form() {
        assert_eq!(channel_link("@prog_ai"), "https://t.me/prog_ai");
        assert_eq!(channel_link("https://t.me/s/prog_ai"), "https://t.me/prog_ai");
    }

    #[test]
    fn test_post_link_accepted_forms() {
        let expected = Some(("prog_ai".to_string(), 345));
        assert_eq!(parse_post_link("https://t.me/prog_ai/345"), expected);
        assert_eq!(parse_post_link("https://t.me/s/prog_ai/345"), expected);
        assert_eq!(parse_post_link("http://t.me/prog_ai/345"), expected);
        assert_eq!(parse_post_link("t.me/prog_ai/345"), expected);
        assert_eq!(parse_post_link("@prog_ai/345"), expected);
        assert_eq!(parse_post_link("  https://t.me/prog_ai/345  "), expected);
    }

    #[test]
    fn test_post_link_leading_zeros() {
        assert_eq!(parse_post_link("https://t.me/prog_ai/00345"), Some(("prog_ai".to_string(), 345)));
    }

    #[test]
    fn test_post_link_large_id() {
        assert_eq!(
            parse_post_link("https://t.me/prog_ai/999999999"),
            Some(("prog_ai".to_string(), 999999999))
        );
    }

    #[test]
    fn test_post_link_slug_characters() {
        assert_eq!(
            parse_post_link("https://t.me/my_test_channel/123"),
            Some(("my_test_channel".to_string(), 123))
        );
        assert_eq!(
            parse_post_link("https://t.me/my-test-channel/123"),
            Some(("my-test-channel".to_string(), 123))
        );
    }

    #[test]
    fn test_post_link_rejects_channel_forms() {
        assert_eq!(parse_post_link("https://t.me/prog_ai"), None);
        assert_eq!(parse_post_link("@prog_ai"), None);
        assert_eq!(parse_post_link("prog_ai"), None);
        assert_eq!(parse_post_link(""), None);
        assert_eq!(parse_post_link("   "), None);
    }

    #[test]
    fn test_post_link_rejects_bad_ids() {
        assert_eq!(parse_post_link("https://t.me/prog_ai/abc"), None);
        assert_eq!(parse_post_link("https://t.me/prog_ai/12.5"), None);
        assert_eq!(parse_post_link("https://t.me/prog_ai/-5"), None);
        assert_eq!(parse_post_link("https://t.me/prog_ai/0"), None);
        assert_eq!(parse_post_link("https://t.me/prog_ai/000"), None);
    }

    #[test]
    fn test_post_link_rejects_extra_segments() {
        assert_eq!(parse_post_link("https://t.me/prog_ai/345/extra"), None);
        assert_eq!(parse_post_link("https://t.me//345"), None);
    }
}
