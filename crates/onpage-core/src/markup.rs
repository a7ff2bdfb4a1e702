//! Lightweight markup scanning.
//!
//! The scorer never builds a DOM. It needs plain text for word counting and
//! density, the raw contents of `<h1>`/`<h2>` elements, image `alt` values,
//! and anchor `href` values; all of these are extracted with regular
//! expressions compiled once and cached for the life of the process.
//!
//! Matching is tolerant of attribute order, quoting style (`"`, `'` or
//! unquoted), and tag-name case.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Result, SeoError};
use crate::models::FocusKeyword;

fn script_style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
            .expect("valid regex")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("valid regex"))
}

fn heading_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        (1..=6)
            .map(|level| {
                Regex::new(&format!(r"(?is)<h{level}\b[^>]*>(.*?)</h{level}\s*>"))
                    .expect("valid regex")
            })
            .collect()
    })
}

fn img_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<img\b[^>]*>").expect("valid regex"))
}

fn anchor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<a\b[^>]*>").expect("valid regex"))
}

fn alt_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)\salt\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).expect("valid regex")
    })
}

fn href_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("valid regex")
    })
}

/// Strip tags, comments, and `<script>`/`<style>` blocks, leaving plain text.
///
/// Tags are replaced by a space so that `<p>one</p><p>two</p>` yields two
/// words, not `onetwo`. A handful of common entities are decoded, and runs of
/// whitespace collapse to a single space so that inline tags inside a phrase
/// (`red <em>running</em> shoes`) leave it contiguous.
pub fn strip_markup(markup: &str) -> String {
    let without_code = script_style_re().replace_all(markup, " ");
    let text = tag_re().replace_all(&without_code, " ");
    collapse_whitespace(&decode_entities(&text))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Number of whitespace-separated tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The first `n` whitespace-separated words, re-joined by single spaces.
pub fn leading_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

/// Count whole-word, case-insensitive occurrences of the keyword phrase.
///
/// Word boundaries are only required on an edge of the phrase that is itself
/// a word character, so `c++` still matches in `learn c++ today`. Tokens of
/// a multi-word phrase may be separated by any run of whitespace.
pub fn count_whole_word(text: &str, keyword: &FocusKeyword) -> Result<usize> {
    let phrase = keyword.as_str();
    let lead = if phrase.starts_with(is_word_char) { r"\b" } else { "" };
    let trail = if phrase.ends_with(is_word_char) { r"\b" } else { "" };
    let body = phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let pattern = format!("(?i){lead}{body}{trail}");
    let re = Regex::new(&pattern)
        .map_err(|e| SeoError::invalid(format!("keyword cannot be matched: {}", e)))?;
    Ok(re.find_iter(text).count())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Raw inner contents of every `<hN>` element, in document order.
///
/// Nested markup is kept, so a keyword split across an inline tag will not
/// match.
pub fn heading_contents(markup: &str, level: u8) -> Vec<&str> {
    let Some(re) = level
        .checked_sub(1)
        .and_then(|i| heading_res().get(i as usize))
    else {
        return Vec::new();
    };
    re.captures_iter(markup)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// `alt` values of every `<img>` element that has one.
pub fn image_alts(markup: &str) -> Vec<&str> {
    img_re()
        .find_iter(markup)
        .filter_map(|tag| attr_value(alt_attr_re(), tag.as_str()))
        .collect()
}

/// `href` values of every `<a>` element that has one.
pub fn link_hrefs(markup: &str) -> Vec<&str> {
    anchor_re()
        .find_iter(markup)
        .filter_map(|tag| attr_value(href_attr_re(), tag.as_str()))
        .collect()
}

fn attr_value<'a>(re: &Regex, tag: &'a str) -> Option<&'a str> {
    let cap = re.captures(tag)?;
    cap.get(1)
        .or_else(|| cap.get(2))
        .or_else(|| cap.get(3))
        .map(|m| m.as_str().trim())
}

/// Where a link points relative to the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// The URL contains the site base URL.
    Internal,
    /// Absolute `http(s)://` or protocol-relative `//` URL on another host.
    External,
    /// Path-relative, fragment, `mailto:` and anything else.
    Other,
}

/// Classify an `href` against the site base URL.
///
/// Both sides are compared case-insensitively with any `http://`,
/// `https://` or `//` prefix removed, so a link counts as internal
/// regardless of its scheme. The href must begin with the base and the base
/// must end on a URL boundary (end, `/`, `?`, `#` or a port `:`), so
/// `notshop.test` and `shop.test.evil.org` are not internal to `shop.test`.
/// A link is never both internal and external.
pub fn classify_link(href: &str, site_base_url: &str) -> LinkKind {
    let href_lower = href.trim().to_lowercase();
    let base = strip_scheme(&site_base_url.trim().to_lowercase())
        .trim_end_matches('/')
        .to_string();

    if !base.is_empty() && is_under_base(strip_scheme(&href_lower), &base) {
        return LinkKind::Internal;
    }

    if href_lower.starts_with("http://")
        || href_lower.starts_with("https://")
        || href_lower.starts_with("//")
    {
        LinkKind::External
    } else {
        LinkKind::Other
    }
}

fn is_under_base(href: &str, base: &str) -> bool {
    match href.strip_prefix(base) {
        Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#', ':']),
        None => false,
    }
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .or_else(|| url.strip_prefix("//"))
        .unwrap_or(url)
}
