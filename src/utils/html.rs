//! HTML utility functions.
//!
//! Provides the small set of HTML helpers the editor needs:
//! - `escape()` - entity escaping for markup we generate ourselves
//! - `escape_text()`, `escape_attr_value()` - serializer-style escaping for
//!   content written back into a page (matches what browsers emit)
//! - `unescape()` - entity decoding for values read out of a page
//! - `text_content()` - the decoded text of a markup fragment
//! - `is_void_element()` - elements that never have a closing tag

use scraper::Html;
use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Characters escaped in text nodes by the HTML serializer.
const TEXT_CHARS: [char; 4] = ['<', '>', '&', '\u{00A0}'];

/// Characters escaped in attribute values by the HTML serializer.
const ATTR_CHARS: [char; 3] = ['&', '"', '\u{00A0}'];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        '\u{00A0}' => Some("&nbsp;"),
        _ => None,
    }
}

/// Escape HTML special characters for markup the editor renders itself.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

/// Escape a value that replaces the text content of a page element.
///
/// Quotes are left alone, the same way `outerHTML` serializes text nodes.
#[inline]
pub fn escape_text(s: &str) -> Cow<'_, str> {
    escape_with(s, &TEXT_CHARS)
}

/// Escape a value written into a double-quoted attribute of a page element.
#[inline]
pub fn escape_attr_value(s: &str) -> Cow<'_, str> {
    escape_with(s, &ATTR_CHARS)
}

/// Internal: escape with specified character set.
#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c).filter(|_| chars.contains(&c)) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Unescape HTML entities back to characters.
///
/// Decodes every named and numeric character reference the HTML standard
/// defines, the same way a browser reads text out of markup. Text without
/// an `&` is returned as is.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    // Keep `<` literal so the input is read as text only
    Cow::Owned(text_content(&s.replace('<', "&lt;")))
}

/// Text content of a markup fragment: tags dropped, entities decoded.
pub fn text_content(markup: &str) -> String {
    Html::parse_fragment(markup)
        .root_element()
        .text()
        .collect()
}

// =============================================================================
// Element Classification
// =============================================================================

/// Check if an HTML tag is a void element (no content, no closing tag).
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain() {
        assert_eq!(escape("hello world"), "hello world");
    }

    #[test]
    fn test_escape_special_chars() {
        assert_eq!(escape("<script>"), "&lt;script&gt;");
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape("say \"hi\""), "say &quot;hi&quot;");
        assert_eq!(escape("it's"), "it&#39;s");
    }

    #[test]
    fn test_escape_text_keeps_quotes() {
        assert_eq!(escape_text("say \"hi\" & <b>"), "say \"hi\" &amp; &lt;b&gt;");
        assert_eq!(escape_text("a\u{00A0}b"), "a&nbsp;b");
    }

    #[test]
    fn test_escape_attr_value() {
        assert_eq!(escape_attr_value("mailto:a@b.c"), "mailto:a@b.c");
        assert_eq!(escape_attr_value("/x?a=1&b=\"2\""), "/x?a=1&amp;b=&quot;2&quot;");
        assert_eq!(escape_attr_value("<ok>"), "<ok>");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("hello"), "hello");
        assert_eq!(unescape("&lt;script&gt;"), "<script>");
        assert_eq!(unescape("a &amp; b"), "a & b");
        assert_eq!(unescape("&quot;hi&quot;"), "\"hi\"");
        assert_eq!(unescape("&#39;"), "'");
        assert_eq!(unescape("&#x27;"), "'");
        assert_eq!(unescape("&#65;"), "A");
        assert_eq!(unescape("&nbsp;"), "\u{00A0}");
    }

    #[test]
    fn test_unescape_leaves_bare_ampersands() {
        assert_eq!(unescape("Tom & Jerry"), "Tom & Jerry");
        assert_eq!(unescape("&unknown;"), "&unknown;");
        assert_eq!(unescape("AT&T"), "AT&T");
    }

    #[test]
    fn test_unescape_named_entities() {
        assert_eq!(unescape("Caf&eacute; it&rsquo;s"), "Café it\u{2019}s");
        assert_eq!(unescape("&euro;5 &times; 2 &ldquo;ok&rdquo;"), "€5 × 2 \u{201C}ok\u{201D}");
        assert_eq!(unescape("a &lt;b&gt; <i>"), "a <b> <i>");
    }

    #[test]
    fn test_decoded_text_escapes_back_unchanged() {
        let decoded = unescape("Caf&eacute; it&rsquo;s");
        assert_eq!(escape_text(&format!("{decoded}!")), "Café it\u{2019}s!");
    }

    #[test]
    fn test_text_content() {
        assert_eq!(text_content("one <b>two</b> &amp; three"), "one two & three");
        assert_eq!(text_content("Hello\n"), "Hello\n");
        assert_eq!(text_content(""), "");
    }

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("br"));
        assert!(is_void_element("img"));
        assert!(!is_void_element("a"));
        assert!(!is_void_element("span"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n  b\tc "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }
}
