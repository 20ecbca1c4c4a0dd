//! Parsed description units.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Identity of a tag handler.
///
/// The tag set is closed: every variant is registered once at startup by
/// [`TagRegistry::builtin`](crate::parser::TagRegistry::builtin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TagKind {
    /// `<font>NAME</font>` - sets the current font, zero height.
    Font,
    /// `<anchor>NAME</anchor>` - sets the current alignment, zero height.
    Anchor,
    /// `<title>text</title>` - bold heading with a rule beneath.
    Title,
    /// `<img [attrs]>name</img>` - local or downloaded image.
    Image,
    /// `<gif [attrs]>name</gif>` - animated frame set.
    Gif,
}

impl TagKind {
    /// Every tag kind, in registration order.
    pub const ALL: [Self; 5] = [Self::Font, Self::Anchor, Self::Title, Self::Image, Self::Gif];

    /// Short name used in log messages and dedup keys.
    pub fn name(self) -> &'static str {
        match self {
            Self::Font => "Font",
            Self::Anchor => "Anchor",
            Self::Title => "Title",
            Self::Image => "Image",
            Self::Gif => "Gif",
        }
    }

    /// Default `(open, close)` markers.
    ///
    /// Container tags leave their opening bracket unterminated so attributes
    /// can follow the marker: `<img WIDTH=10>`.
    pub fn markers(self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::Font => ("<font>", Some("</font>")),
            Self::Anchor => ("<anchor>", Some("</anchor>")),
            Self::Title => ("<title>", Some("</title>")),
            Self::Image => ("<img", Some("</img>")),
            Self::Gif => ("<gif", Some("</gif>")),
        }
    }

    /// Whether the tag only changes render-scope state and occupies no height.
    pub fn is_instruction(self) -> bool {
        matches!(self, Self::Font | Self::Anchor)
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One parsed unit of a description.
///
/// Either a tagged segment (`tag` is set, `text` is the inner content with
/// the markers stripped) or plain text (`tag` is `None`, `text` is the
/// original text with `<u>` / `<link>` annotations still in place and their
/// literal matches listed in `underline_ranges` / `hyperlink_ranges`).
///
/// Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionData {
    text: String,
    tag: Option<TagKind>,
    underline_ranges: Vec<String>,
    hyperlink_ranges: Vec<String>,
    span: Range<usize>,
}

impl DescriptionData {
    /// Tagged segment with its stripped inner text.
    pub fn tagged(tag: TagKind, inner: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            text: inner.into(),
            tag: Some(tag),
            underline_ranges: Vec::new(),
            hyperlink_ranges: Vec::new(),
            span,
        }
    }

    /// Plain segment with its annotation matches.
    pub fn plain(
        text: impl Into<String>,
        underline_ranges: Vec<String>,
        hyperlink_ranges: Vec<String>,
        span: Range<usize>,
    ) -> Self {
        Self {
            text: text.into(),
            tag: None,
            underline_ranges,
            hyperlink_ranges,
            span,
        }
    }

    /// Synthetic plain newline appended after parsing. Its span is empty and
    /// sits at `end`.
    pub fn newline(end: usize) -> Self {
        Self::plain("\n", Vec::new(), Vec::new(), end..end)
    }

    /// Inner text (tagged) or original annotated text (plain).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Tag handler, if this is a tagged segment.
    pub fn tag(&self) -> Option<TagKind> {
        self.tag
    }

    /// Literal `<u>...</u>` matches inside plain text.
    pub fn underline_ranges(&self) -> &[String] {
        &self.underline_ranges
    }

    /// Literal `<link>...</link>(...)` matches inside plain text.
    pub fn hyperlink_ranges(&self) -> &[String] {
        &self.hyperlink_ranges
    }

    /// Byte range of the unstripped piece in the parsed input.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Whether this is plain text carrying at least one annotation.
    pub fn is_annotated(&self) -> bool {
        !self.underline_ranges.is_empty() || !self.hyperlink_ranges.is_empty()
    }
}
