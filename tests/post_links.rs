//! Reference-form coverage for channel normalization and post-link
//! classification across every accepted input shape.

use telegrab::scrape::{channel_link, normalize_channel, parse_post_link};

#[test]
fn direct_post_links_in_all_forms() {
    let cases = [
        "https://t.me/prog_ai/123",
        "http://t.me/prog_ai/123",
        "https://t.me/s/prog_ai/123",
        "t.me/prog_ai/123",
        "t.me/s/prog_ai/123",
        "@prog_ai/123",
        "prog_ai/123",
        "  https://t.me/prog_ai/123  ",
    ];
    for case in cases {
        assert_eq!(
            parse_post_link(case),
            Some(("prog_ai".to_string(), 123)),
            "failed on {case:?}"
        );
    }
}

#[test]
fn leading_zeros_parse_numerically() {
    assert_eq!(
        parse_post_link("https://t.me/prog_ai/00345"),
        Some(("prog_ai".to_string(), 345))
    );
}

#[test]
fn channel_level_references_are_not_direct_links() {
    let cases = [
        "https://t.me/prog_ai",
        "https://t.me/s/prog_ai",
        "t.me/prog_ai",
        "@prog_ai",
        "prog_ai",
        "",
        "   ",
        "https://t.me/prog_ai/abc",
        "https://t.me/prog_ai/12.5",
        "https://t.me/prog_ai/-5",
        "https://t.me/prog_ai/0",
        "https://t.me/prog_ai/123/extra",
        "https://t.me//123",
    ];
    for case in cases {
        assert_eq!(parse_post_link(case), None, "should reject {case:?}");
    }
}

#[test]
fn normalization_reduces_every_form_to_the_slug() {
    let cases = [
        "https://t.me/prog_ai",
        "https://t.me/s/prog_ai",
        "t.me/prog_ai",
        "@prog_ai",
        "prog_ai",
        "https://t.me/prog_ai/345",
        "  @prog_ai  ",
    ];
    for case in cases {
        assert_eq!(normalize_channel(case), "prog_ai", "failed on {case:?}");
    }
}

#[test]
fn normalization_is_idempotent_on_canonical_output() {
    for case in ["https://t.me/s/prog_ai/345", "@prog_ai", "weird/../input"] {
        let once = normalize_channel(case);
        assert_eq!(normalize_channel(&once), once);
    }
}

#[test]
fn canonical_link_shape() {
    assert_eq!(channel_link("@prog_ai"), "https://t.me/prog_ai");
    assert_eq!(channel_link("https://t.me/s/prog_ai/9"), "https://t.me/prog_ai");
}
