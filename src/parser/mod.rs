//! Description markup parser.
//!
//! This module provides pure parsing functions for turning a raw description
//! string into an ordered list of [`DescriptionData`]. Parsing never fails:
//! text that does not form a complete tag is kept as plain text.

pub mod annotations;
pub mod attributes;
pub mod pattern_display;
pub mod registry;

pub use annotations::{parse_hyperlink, strip_markup, Hyperlink};
pub use attributes::{AttributeLookup, AttributeSpec, AttributeValue, CustomAttributeHook};
pub use registry::{Piece, TagDefinition, TagMatcher, TagRegistry};

use crate::model::DescriptionData;
use std::sync::LazyLock;

static BUILTIN_MATCHER: LazyLock<TagMatcher> = LazyLock::new(|| {
    TagRegistry::builtin()
        .compile()
        .expect("builtin tag pattern is a valid regex")
});

/// Splits descriptions using a compiled tag registry.
#[derive(Debug, Clone)]
pub struct SegmentParser {
    matcher: TagMatcher,
}

impl SegmentParser {
    /// Parser for a custom registry.
    ///
    /// # Errors
    ///
    /// Returns the regex error if the registry's pattern cannot be compiled.
    pub fn new(registry: &TagRegistry) -> Result<Self, regex::Error> {
        Ok(Self {
            matcher: registry.compile()?,
        })
    }

    /// Parser for the built-in tag set.
    pub fn builtin() -> Self {
        Self {
            matcher: BUILTIN_MATCHER.clone(),
        }
    }

    /// Split `raw` into segments.
    ///
    /// Tag pieces become tagged segments holding their inner text. Other
    /// pieces become plain segments carrying their unstripped text and the
    /// literal `<u>` / `<link>` matches found in it. Empty pieces and bare
    /// newlines are dropped.
    pub fn parse(&self, raw: &str) -> Vec<DescriptionData> {
        let definitions = self.matcher.definitions();
        self.matcher
            .split(raw)
            .into_iter()
            .filter_map(|piece| {
                let text = &raw[piece.span.clone()];
                if text.is_empty() || text == "\n" {
                    return None;
                }
                let tagged = piece
                    .tag
                    .and_then(|index| definitions.get(index))
                    .and_then(|definition| {
                        let inner = definition.strip(text)?;
                        Some(DescriptionData::tagged(
                            definition.kind(),
                            inner,
                            piece.span.clone(),
                        ))
                    });
                Some(tagged.unwrap_or_else(|| {
                    DescriptionData::plain(
                        text,
                        annotations::underline_matches(text),
                        annotations::hyperlink_matches(text),
                        piece.span,
                    )
                }))
            })
            .collect()
    }
}

impl Default for SegmentParser {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Parse with the built-in tag set.
pub fn parse(raw: &str) -> Vec<DescriptionData> {
    SegmentParser::builtin().parse(raw)
}

/// Append a plain `"\n"` segment when the last segment is empty or does not
/// end with a newline. An empty list stays empty.
pub fn ensure_trailing_newline(segments: &mut Vec<DescriptionData>, input_len: usize) {
    let Some(last) = segments.last() else {
        return;
    };
    if last.text().is_empty() || !last.text().ends_with('\n') {
        segments.push(DescriptionData::newline(input_len));
    }
}

/// Reassemble the input from segment spans. Dropped pieces are skipped.
pub fn reconstruct(raw: &str, segments: &[DescriptionData]) -> String {
    segments
        .iter()
        .filter_map(|segment| raw.get(segment.span()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TagKind;

    #[test]
    fn parses_mixed_text_and_tags() {
        let segments = parse("Hello <font>Tiny</font>World<img>icon</img>");
        let summary: Vec<_> = segments.iter().map(|s| (s.tag(), s.text())).collect();
        assert_eq!(
            summary,
            vec![
                (None, "Hello "),
                (Some(TagKind::Font), "Tiny"),
                (None, "World"),
                (Some(TagKind::Image), ">icon"),
            ]
        );
    }

    #[test]
    fn container_inner_text_keeps_attributes() {
        let segments = parse("<gif WIDTH=64 FPS=12>spin</gif>");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].tag(), Some(TagKind::Gif));
        assert_eq!(segments[0].text(), " WIDTH=64 FPS=12>spin");
    }

    #[test]
    fn hyperlink_is_recorded_on_plain_segment() {
        let segments = parse("<link>http://x.test</link>(Click)");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].tag(), None);
        assert_eq!(segments[0].text(), "<link>http://x.test</link>(Click)");
        assert_eq!(
            segments[0].hyperlink_ranges(),
            &["<link>http://x.test</link>(Click)".to_string()]
        );
    }

    #[test]
    fn underline_is_recorded_unstripped() {
        let segments = parse("a <u>b</u> c");
        assert_eq!(segments[0].text(), "a <u>b</u> c");
        assert_eq!(segments[0].underline_ranges(), &["<u>b</u>".to_string()]);
    }

    #[test]
    fn bare_newlines_and_empty_input_are_dropped() {
        assert!(parse("").is_empty());
        assert!(parse("\n").is_empty());
        let segments = parse("<title>T</title>\n<font>Small</font>\n");
        let tags: Vec<_> = segments.iter().map(|s| s.tag()).collect();
        assert_eq!(tags, vec![Some(TagKind::Title), Some(TagKind::Font)]);
    }

    #[test]
    fn final_newline_of_plain_text_is_split_off() {
        let segments = parse("text\n");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text(), "text");
    }

    #[test]
    fn inner_newlines_are_kept() {
        let segments = parse("one\ntwo\n\n");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text(), "one\ntwo\n");
    }

    #[test]
    fn reconstruct_restores_input_modulo_dropped_newlines() {
        let raw = "A <u>b</u>\n<title>T</title>\n<img WIDTH=2>i</img>";
        let segments = parse(raw);
        assert_eq!(
            reconstruct(raw, &segments),
            "A <u>b</u>\n<title>T</title><img WIDTH=2>i</img>"
        );

        let unbroken = "A\n<title>T</title>\nC<img>i</img>";
        assert_eq!(reconstruct(unbroken, &parse(unbroken)), unbroken);
    }

    #[test]
    fn trailing_newline_is_appended_once() {
        let raw = "text";
        let mut segments = parse(raw);
        ensure_trailing_newline(&mut segments, raw.len());
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].text(), "\n");
        ensure_trailing_newline(&mut segments, raw.len());
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn empty_description_gets_no_trailing_newline() {
        let mut segments = parse("");
        ensure_trailing_newline(&mut segments, 0);
        assert!(segments.is_empty());
    }

    #[test]
    fn trailing_newline_added_after_tag() {
        let mut segments = parse("<title>T</title>");
        ensure_trailing_newline(&mut segments, 16);
        assert_eq!(segments.last().map(|s| s.text()), Some("\n"));
    }

    #[test]
    fn custom_registry_parser() {
        let mut registry = TagRegistry::new();
        registry.register(TagDefinition::new(
            TagKind::Title,
            "<h1>",
            Some("</h1>".to_string()),
        ));
        let parser = SegmentParser::new(&registry).expect("compiles");
        let segments = parser.parse("<h1>Head</h1><title>x</title>");
        assert_eq!(segments[0].tag(), Some(TagKind::Title));
        assert_eq!(segments[0].text(), "Head");
        assert_eq!(segments[1].tag(), None);
    }
}
