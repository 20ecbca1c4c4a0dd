//! Resolve the annotations of a plain segment into drawn text plus spans.
//!
//! Plain segments keep their `<u>` and `<link>` markup so each recorded
//! literal can be found again by substring. This module does that search
//! once, replaces every literal by what is actually drawn, and remembers
//! where the replacement landed. Wrapping the resulting text gives the
//! decoration rectangles without a second tokenisation pass.

use crate::logging::warn_once;
use crate::model::DescriptionData;
use crate::parser::annotations::{parse_hyperlink, underline_content};
use std::ops::Range;

/// What a span of drawn text is decorated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationKind {
    /// Underlined text.
    Underline,
    /// Clickable link.
    Link {
        /// Link target.
        url: String,
    },
}

/// A decorated byte range of [`DecoratedText::text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Byte range in the drawn text.
    pub range: Range<usize>,
    /// Decoration.
    pub kind: DecorationKind,
}

/// Text as drawn, with decorations sorted by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoratedText {
    /// Drawn text.
    pub text: String,
    /// Non-overlapping decorations in ascending order.
    pub spans: Vec<Decoration>,
}

#[derive(Clone, Copy)]
enum Literal {
    Underline,
    Link,
}

impl DecoratedText {
    /// Undecorated text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Drawn form of a plain segment.
    ///
    /// Each recorded literal is matched against its first occurrence that
    /// no earlier literal has claimed, so repeated annotations resolve in
    /// order. Hyperlinks are located before underlines; an underline inside
    /// a link is drawn verbatim.
    pub fn from_segment(segment: &DescriptionData) -> Self {
        Self::resolve(
            segment.text(),
            segment.underline_ranges(),
            segment.hyperlink_ranges(),
        )
    }

    /// See [`DecoratedText::from_segment`].
    pub fn resolve(text: &str, underlines: &[String], hyperlinks: &[String]) -> Self {
        let mut found: Vec<(Range<usize>, Literal)> = Vec::new();
        let literals = hyperlinks
            .iter()
            .map(|l| (l, Literal::Link))
            .chain(underlines.iter().map(|l| (l, Literal::Underline)));

        for (literal, kind) in literals {
            let free = text
                .match_indices(literal.as_str())
                .map(|(start, m)| start..start + m.len())
                .find(|candidate| {
                    found
                        .iter()
                        .all(|(taken, _)| candidate.end <= taken.start || candidate.start >= taken.end)
                });
            match free {
                Some(range) => found.push((range, kind)),
                None => warn_once(
                    &format!("decoration:{literal}"),
                    format_args!("Failed to find {literal:?} in {text:?}"),
                ),
            }
        }
        found.sort_by_key(|(range, _)| range.start);

        let mut decorated = Self::default();
        let mut last = 0;
        for (range, kind) in found {
            decorated.text.push_str(&text[last..range.start]);
            let literal = &text[range.clone()];
            let (shown, kind) = match kind {
                Literal::Underline => (underline_content(literal).to_string(), DecorationKind::Underline),
                Literal::Link => match parse_hyperlink(literal) {
                    Some(link) => (link.display, DecorationKind::Link { url: link.url }),
                    None => {
                        decorated.text.push_str(literal);
                        last = range.end;
                        continue;
                    }
                },
            };
            let start = decorated.text.len();
            decorated.text.push_str(&shown);
            decorated.spans.push(Decoration {
                range: start..decorated.text.len(),
                kind,
            });
            last = range.end;
        }
        decorated.text.push_str(&text[last..]);
        decorated
    }

    /// Text covered by `span`.
    pub fn span_text(&self, span: &Decoration) -> &str {
        &self.text[span.range.clone()]
    }
}
