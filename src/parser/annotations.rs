//! Inline annotations inside plain text: `<u>...</u>` and
//! `<link>url</link>(display)`.
//!
//! The parser only records the literal matches. Markers are removed when the
//! text is drawn, which is why the literal strings are kept: the renderer
//! locates them by substring.

use regex::Regex;
use std::sync::LazyLock;

/// Underline open marker.
pub const UNDERLINE_OPEN: &str = "<u>";
/// Underline close marker.
pub const UNDERLINE_CLOSE: &str = "</u>";
/// Hyperlink open marker.
pub const LINK_OPEN: &str = "<link>";
/// Hyperlink close marker.
pub const LINK_CLOSE: &str = "</link>";

static UNDERLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<u>.*?</u>").expect("UNDERLINE_RE is a valid static regex pattern")
});

static HYPERLINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<link>(.*?)</link>(?:\(([^)]*)\))?")
        .expect("HYPERLINK_RE is a valid static regex pattern")
});

/// A resolved hyperlink annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink {
    /// Target opened on click.
    pub url: String,
    /// Text drawn in place of the annotation.
    pub display: String,
}

fn non_blank(matches: impl Iterator<Item = String>) -> Vec<String> {
    matches.filter(|m| !m.trim().is_empty()).collect()
}

/// Literal `<u>...</u>` matches, in order.
pub fn underline_matches(text: &str) -> Vec<String> {
    non_blank(UNDERLINE_RE.find_iter(text).map(|m| m.as_str().to_string()))
}

/// Literal `<link>...</link>(...)` matches, in order. The `(display)`
/// suffix is optional.
pub fn hyperlink_matches(text: &str) -> Vec<String> {
    non_blank(HYPERLINK_RE.find_iter(text).map(|m| m.as_str().to_string()))
}

/// Resolve one literal hyperlink match. Without a display suffix the URL is
/// also the display text.
pub fn parse_hyperlink(literal: &str) -> Option<Hyperlink> {
    let captures = HYPERLINK_RE.captures(literal)?;
    let url = captures.get(1)?.as_str().trim().to_string();
    let display = captures
        .get(2)
        .map(|m| m.as_str().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| url.clone());
    Some(Hyperlink { url, display })
}

/// Underline annotation with its markers removed.
pub fn underline_content(literal: &str) -> &str {
    literal
        .strip_prefix(UNDERLINE_OPEN)
        .and_then(|rest| rest.strip_suffix(UNDERLINE_CLOSE))
        .unwrap_or(literal)
}

/// Text as it is drawn: underline markers removed (content kept) and each
/// hyperlink replaced by its display text.
pub fn strip_markup(text: &str) -> String {
    let linked = HYPERLINK_RE.replace_all(text, |captures: &regex::Captures<'_>| {
        captures
            .get(2)
            .map(|m| m.as_str())
            .filter(|d| !d.is_empty())
            .or_else(|| captures.get(1).map(|m| m.as_str().trim()))
            .unwrap_or_default()
            .to_string()
    });
    UNDERLINE_RE
        .replace_all(&linked, |captures: &regex::Captures<'_>| {
            underline_content(&captures[0]).to_string()
        })
        .into_owned()
}
