//! Rendering a scraped batch into one delivery-sized summary message.
//!
//! Output uses the delivery platform's HTML parse mode (`<b>`, `<i>`,
//! `<a>`); the whole summary is capped at the message body ceiling with a
//! visible truncation notice when the batch is too large.

use crate::chunk::truncate_text;
use crate::models::Post;

/// Characters of post text shown per summary line.
const PREVIEW_LEN: usize = 200;

/// Headroom reserved for the truncation notice.
const TRUNCATION_RESERVE: usize = 100;

/// Render up to `max_posts` posts into a single summary string no longer
/// than `max_len` characters.
pub fn format_summary(posts: &[Post], max_posts: usize, max_len: usize) -> String {
    if posts.is_empty() {
        return "❌ No posts found".to_string();
    }

    let posts = &posts[..posts.len().min(max_posts)];

    let mut lines = vec![
        format!("📊 <b>Channel summary</b> ({} posts)\n", posts.len()),
        format!("💡 <i>Send a post number (1-{}) to rewrite it</i>\n", posts.len()),
        "=".repeat(40),
    ];

    for (index, post) in posts.iter().enumerate() {
        let mut parts = vec![format!("\n{} <b>Post #{}</b>", post.media_type.emoji(), index + 1)];

        if !post.post_link.is_empty() {
            parts.push(format!("🔗 <a href=\"{}\">Open</a>", post.post_link));
        }

        parts.push(format!(
            "👁 {} | 📤 {}",
            group_digits(post.views),
            group_digits(post.forwards)
        ));

        if post.is_forwarded {
            parts.push("↪️ <i>Forwarded</i>".to_string());
        }

        if !post.text.is_empty() {
            parts.push(format!("📝 {}", truncate_text(&post.text, PREVIEW_LEN)));
        }

        parts.push("-".repeat(40));
        lines.push(parts.join("\n"));
    }

    let summary = lines.join("\n");
    if summary.chars().count() <= max_len {
        return summary;
    }

    let cut = summary
        .char_indices()
        .nth(max_len.saturating_sub(TRUNCATION_RESERVE))
        .map(|(offset, _)| offset)
        .unwrap_or(summary.len());
    format!(
        "{}\n\n⚠️ Message truncated (too many posts)",
        &summary[..cut]
    )
}

/// Thousands-grouped rendering of a counter (`1234567` → `1,234,567`).
fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaKind, MediaType};

    fn sample_post(id: u64, text: &str) -> Post {
        Post {
            channel_slug: "test_channel".to_string(),
            channel_link: "https://t.me/test_channel".to_string(),
            post_link: format!("https://t.me/test_channel/{id}"),
            text: text.to_string(),
            posted_at: None,
            views: 1000,
            forwards: 50,
            has_media: false,
            is_forwarded: false,
            media_type: MediaType::text(true),
            photo_url: None,
            video_url: None,
        }
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(format_summary(&[], 20, 4096), "❌ No posts found");
    }

    #[test]
    fn test_single_post_summary() {
        let posts = vec![sample_post(1, "A test post")];
        let summary = format_summary(&posts, 20, 4096);
        assert!(summary.contains("(1 posts)"));
        assert!(summary.contains("A test post"));
        assert!(summary.contains("1,000"));
        assert!(summary.contains("test_channel/1"));
    }

    #[test]
    fn test_post_cap_applies() {
        let posts: Vec<Post> = (1..=30).map(|id| sample_post(id, "text")).collect();
        let summary = format_summary(&posts, 20, 100_000);
        assert!(summary.contains("(20 posts)"));
        assert!(summary.contains("Post #20"));
        assert!(!summary.contains("Post #21"));
    }

    #[test]
    fn test_forwarded_marker() {
        let mut post = sample_post(3, "fwd");
        post.is_forwarded = true;
        let summary = format_summary(&[post], 20, 4096);
        assert!(summary.contains("Forwarded"));
    }

    #[test]
    fn test_media_emoji_in_line() {
        let mut post = sample_post(4, "clip");
        post.media_type = MediaType::single(MediaKind::Video, true);
        post.has_media = true;
        let summary = format_summary(&[post], 20, 4096);
        assert!(summary.contains("🎬"));
    }

    #[test]
    fn test_overlong_summary_truncated() {
        let long_text = "word ".repeat(100);
        let posts: Vec<Post> = (1..=20).map(|id| sample_post(id, &long_text)).collect();
        let summary = format_summary(&posts, 20, 1000);
        assert!(summary.chars().count() <= 1000);
        assert!(summary.ends_with("⚠️ Message truncated (too many posts)"));
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(1234567), "1,234,567");
    }
}
