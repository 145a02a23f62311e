//! Plain-text previews and image discovery for HTML post bodies.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>").unwrap()
});

static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</?(?:p|div|li|ul|ol|blockquote|h[1-6]|tr|td)\b[^>]*>").unwrap()
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static IMG_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#).unwrap()
});

/// Marker appended to truncated previews.
pub const ELLIPSIS: char = '…';

/// Converts an HTML fragment to a single line of plain text.
#[must_use]
pub fn strip_html(html: &str) -> String {
    if !html.contains('<') && !html.contains('&') {
        return WHITESPACE_RE.replace_all(html.trim(), " ").into_owned();
    }

    let text = SCRIPT_STYLE_RE.replace_all(html, "");
    let text = BLOCK_TAG_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, "");
    let text = decode_entities(&text);

    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Returns the stripped text cut to `max_chars` characters.
/// A cut preview ends with [`ELLIPSIS`].
#[must_use]
pub fn preview_text(html: &str, max_chars: usize) -> String {
    let text = strip_html(html);
    if text.chars().count() <= max_chars {
        return text;
    }

    let mut preview: String = text.chars().take(max_chars).collect();
    preview.truncate(preview.trim_end().len());
    preview.push(ELLIPSIS);
    preview
}

/// Returns the `src` of every `<img>` tag, in document order, without duplicates.
#[must_use]
pub fn extract_image_sources(html: &str) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();

    for cap in IMG_SRC_RE.captures_iter(html) {
        let Some(src) = cap.get(1).or_else(|| cap.get(2)).or_else(|| cap.get(3)) else {
            continue;
        };
        let src = decode_entities(src.as_str().trim());
        if !src.is_empty() && !sources.contains(&src) {
            sources.push(src);
        }
    }

    sources
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_owned();
    }

    let text = NUMERIC_ENTITY_RE.replace_all(text, |cap: &Captures<'_>| {
        let code = match (cap.get(1), cap.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            (None, None) => None,
        };
        code.and_then(char::from_u32)
            .map_or_else(|| cap[0].to_owned(), String::from)
    });

    // &amp; last so "&amp;lt;" stays a literal "&lt;".
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("<p>Hello <b>world</b></p>", "Hello world" ; "inline_tags")]
    #[test_case("<p>First</p><p>Second</p>", "First Second" ; "block_tags_separate_words")]
    #[test_case("line<br>break<br/>here", "line break here" ; "line_breaks")]
    #[test_case("Tom &amp; Jerry &lt;3", "Tom & Jerry <3" ; "named_entities")]
    #[test_case("it&#39;s &#x263A;", "it's \u{263A}" ; "numeric_entities")]
    #[test_case("&amp;lt;", "&lt;" ; "no_double_decode")]
    #[test_case("<style>p{}</style><script>x()</script>kept", "kept" ; "drops_script_and_style")]
    #[test_case("  plain\n\ttext  ", "plain text" ; "plain_text_whitespace")]
    fn test_strip_html(input: &str, expected: &str) {
        assert_eq!(strip_html(input), expected);
    }

    #[test]
    fn test_preview_short_text_untouched() {
        assert_eq!(preview_text("<p>short</p>", 10), "short");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let html = "<p>인사팀 이야기를 나눠요</p>";
        assert_eq!(preview_text(html, 4), "인사팀…");
    }

    #[test]
    fn test_extract_image_sources_quoting_styles() {
        let html = r#"
            <img src="https://a.com/1.png">
            <IMG alt='x' src='https://a.com/2.jpg' />
            <img width=10 src=https://a.com/3.webp>
        "#;

        assert_eq!(
            extract_image_sources(html),
            vec![
                "https://a.com/1.png",
                "https://a.com/2.jpg",
                "https://a.com/3.webp"
            ]
        );
    }

    #[test]
    fn test_extract_image_sources_any_tag_case() {
        let html = r#"<Img src="https://a.com/1.png"><iMG SRC='https://a.com/2.png'>"#;
        assert_eq!(
            extract_image_sources(html),
            ["https://a.com/1.png", "https://a.com/2.png"]
        );
    }

    #[test]
    fn test_extract_image_sources_dedup_and_skip_empty() {
        let html = r#"<img src="https://a.com/1.png"><img src=""><img src="https://a.com/1.png">"#;
        assert_eq!(extract_image_sources(html), vec!["https://a.com/1.png"]);
    }

    #[test]
    fn test_extract_image_sources_decodes_entities() {
        let html = r#"<img src="https://a.com/i.png?w=10&amp;h=20">"#;
        assert_eq!(
            extract_image_sources(html),
            vec!["https://a.com/i.png?w=10&h=20"]
        );
    }

    #[test]
    fn test_no_images() {
        assert!(extract_image_sources("<p>text only</p>").is_empty());
    }
}
