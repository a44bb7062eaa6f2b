//! Splitting long text into delivery-sized segments.
//!
//! Telegram enforces two independent ceilings: 4096 characters for a plain
//! message and 1024 for a media caption. A rewritten post is fitted to both
//! from one source string: `split_once_at` peels a caption-sized head, then
//! `split_all` cuts the remainder into message-sized segments.
//!
//! All functions here are pure and count in characters, not bytes.

/// Split `text` once at the given ceiling.
///
/// Returns `(head, tail)`. If the trimmed text already fits, the tail is
/// empty. Otherwise the split lands on the last whitespace inside the first
/// `max_len + 1` characters, so words stay intact; a continuous run of
/// non-whitespace longer than the ceiling is hard-cut at exactly `max_len`.
pub fn split_once_at(text: &str, max_len: usize) -> (String, String) {
    let text = text.trim();
    if text.chars().count() <= max_len {
        return (text.to_string(), String::new());
    }

    // Last whitespace boundary within the first max_len + 1 characters.
    let mut boundary = None;
    for (position, (offset, ch)) in text.char_indices().enumerate() {
        if position > max_len {
            break;
        }
        if ch == '\n' || ch == ' ' || ch == '\t' {
            boundary = Some(offset);
        }
    }

    match boundary {
        Some(offset) if offset > 0 => {
            let head = text[..offset].trim_end().to_string();
            let tail = text[offset + 1..].trim_start().to_string();
            (head, tail)
        }
        _ => {
            // No usable boundary: hard cut at exactly max_len characters.
            let cut = text
                .char_indices()
                .nth(max_len)
                .map(|(offset, _)| offset)
                .unwrap_or(text.len());
            (text[..cut].to_string(), text[cut..].to_string())
        }
    }
}

/// Split `text` into an ordered sequence of segments, each at most `max_len`
/// characters. Empty or whitespace-only input yields an empty sequence.
pub fn split_all(text: &str, max_len: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut rest = text.trim().to_string();
    while !rest.is_empty() {
        let (head, tail) = split_once_at(&rest, max_len);
        if head.is_empty() {
            break;
        }
        segments.push(head);
        rest = tail;
    }
    segments
}

/// Shorten `text` to at most `max_length` characters for preview display,
/// backing up to the previous word boundary and appending `...`.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let cut = text
        .char_indices()
        .nth(max_length)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len());
    let window = &text[..cut];
    let head = match window.rfind(' ') {
        Some(space) => &window[..space],
        None => window,
    };
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_once_fits() {
        assert_eq!(split_once_at("hello world", 20), ("hello world".to_string(), String::new()));
        assert_eq!(split_once_at("  padded  ", 6), ("padded".to_string(), String::new()));
        assert_eq!(split_once_at("", 10), (String::new(), String::new()));
    }

    #[test]
    fn test_split_once_on_word_boundary() {
        let (head, tail) = split_once_at("one two three", 7);
        assert_eq!(head, "one two");
        assert_eq!(tail, "three");
    }

    #[test]
    fn test_split_once_prefers_last_boundary_in_window() {
        let (head, tail) = split_once_at("a b c d e f", 5);
        assert_eq!(head, "a b c");
        assert_eq!(tail, "d e f");
    }

    #[test]
    fn test_split_once_hard_cut_without_whitespace() {
        let (head, tail) = split_once_at("abcdefghij", 4);
        assert_eq!(head, "abcd");
        assert_eq!(tail, "efghij");
    }

    #[test]
    fn test_split_once_breaks_on_newline_and_tab() {
        let (head, tail) = split_once_at("first\nsecond third", 10);
        assert_eq!(head, "first");
        assert_eq!(tail, "second third");

        let (head, tail) = split_once_at("first\tsecond third", 10);
        assert_eq!(head, "first");
        assert_eq!(tail, "second third");
    }

    #[test]
    fn test_split_once_multibyte() {
        let (head, tail) = split_once_at("привет мир и все", 10);
        assert_eq!(head, "привет мир");
        assert_eq!(tail, "и все");
    }

    #[test]
    fn test_split_all_empty_input() {
        assert!(split_all("", 10).is_empty());
        assert!(split_all("   \n\t ", 10).is_empty());
    }

    #[test]
    fn test_split_all_segment_lengths() {
        let text = "the quick brown fox jumps over the lazy dog";
        let segments = split_all(text, 10);
        assert!(!segments.is_empty());
        for segment in &segments {
            assert!(segment.chars().count() <= 10, "segment too long: {:?}", segment);
        }
    }

    #[test]
    fn test_split_all_round_trip() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let segments = split_all(text, 12);
        let rejoined = segments.join(" ");
        let normalized: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined.split_whitespace().collect::<Vec<_>>(), normalized);
    }

    #[test]
    fn test_split_all_single_segment() {
        assert_eq!(split_all("short", 100), vec!["short".to_string()]);
    }

    #[test]
    fn test_split_all_long_word_runs() {
        let segments = split_all("aaaaaaaaaaaaaaaaaaaa", 6);
        assert_eq!(segments, vec!["aaaaaa", "aaaaaa", "aaaaaa", "aa"]);
    }

    #[test]
    fn test_truncate_text_short_input() {
        assert_eq!(truncate_text("hello", 100), "hello");
        assert_eq!(truncate_text("", 100), "");
        assert_eq!(truncate_text("   ", 100), "");
    }

    #[test]
    fn test_truncate_text_word_boundary() {
        assert_eq!(truncate_text("the quick brown fox", 13), "the quick...");
    }

    #[test]
    fn test_truncate_text_no_space_in_window() {
        assert_eq!(truncate_text("abcdefghij", 5), "abcde...");
    }
}
