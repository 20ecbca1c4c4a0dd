//! Tag registry and the compiled splitting matcher.
//!
//! The registry is filled once at startup and read-only afterwards. It turns
//! its definitions into two artifacts:
//!
//! - [`TagRegistry::compile_pattern`]: the human-readable alternation text,
//!   one `(open.*?close)` group per tag followed by a plain-text fallback
//!   `(.+?(?=open|open|$))`. Used for display and the pattern colorizer.
//! - [`TagRegistry::compile`]: a [`TagMatcher`] that performs the actual
//!   split. The `regex` crate has no lookahead, so the matcher compiles only
//!   the tag alternatives and derives the fallback pieces from the gaps
//!   between tag matches.

use crate::model::TagKind;
use regex::Regex;
use std::ops::Range;

/// Open and optional close marker bound to a tag handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDefinition {
    kind: TagKind,
    open: String,
    close: Option<String>,
}

impl TagDefinition {
    /// Create a definition with custom markers.
    pub fn new(kind: TagKind, open: impl Into<String>, close: Option<String>) -> Self {
        Self {
            kind,
            open: open.into(),
            close: close.filter(|c| !c.is_empty()),
        }
    }

    /// Definition using the kind's default markers.
    pub fn builtin(kind: TagKind) -> Self {
        let (open, close) = kind.markers();
        Self::new(kind, open, close.map(str::to_string))
    }

    /// Handler this definition produces segments for.
    pub fn kind(&self) -> TagKind {
        self.kind
    }

    /// Opening marker, e.g. `<img`.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// Closing marker, e.g. `</img>`.
    pub fn close(&self) -> Option<&str> {
        self.close.as_deref()
    }

    /// Strip this definition's markers from a matched piece.
    ///
    /// Returns `None` if the piece does not start with the open marker (or
    /// does not end with the close marker).
    pub fn strip<'a>(&self, piece: &'a str) -> Option<&'a str> {
        let inner = piece.strip_prefix(self.open.as_str())?;
        match &self.close {
            Some(close) => inner.strip_suffix(close.as_str()),
            None => Some(inner),
        }
    }
}

/// Append-only list of tag definitions, one per [`TagKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRegistry {
    tags: Vec<TagDefinition>,
}

impl TagRegistry {
    /// Empty registry. Every input parses as plain text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in tag, in [`TagKind::ALL`] order.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in TagKind::ALL {
            registry.register(TagDefinition::builtin(kind));
        }
        registry
    }

    /// Add a definition.
    ///
    /// Re-registering a kind replaces its markers in place, keeping its
    /// position. Definitions with an empty open marker are ignored.
    pub fn register(&mut self, definition: TagDefinition) {
        if definition.open.is_empty() {
            tracing::warn!(tag = %definition.kind, "Ignoring tag definition with empty open marker");
            return;
        }
        if let Some(existing) = self.tags.iter_mut().find(|t| t.kind == definition.kind) {
            tracing::debug!(tag = %definition.kind, "Replacing tag definition");
            *existing = definition;
        } else {
            self.tags.push(definition);
        }
    }

    /// Registered definitions in match-priority order.
    pub fn definitions(&self) -> &[TagDefinition] {
        &self.tags
    }

    /// Definition for `kind`, if registered.
    pub fn definition(&self, kind: TagKind) -> Option<&TagDefinition> {
        self.tags.iter().find(|t| t.kind == kind)
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether no tags are registered.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Alternation pattern text for this registry.
    ///
    /// Forward slashes in markers are escaped as `\/`. The fallback
    /// alternative is always last.
    pub fn compile_pattern(&self) -> String {
        let escape = |marker: &str| marker.replace('/', r"\/");
        let mut pattern = String::new();
        for tag in &self.tags {
            match &tag.close {
                Some(close) => {
                    pattern.push('(');
                    pattern.push_str(&tag.open);
                    pattern.push_str(".*?");
                    pattern.push_str(&escape(close));
                    pattern.push(')');
                }
                None => {
                    pattern.push('(');
                    pattern.push_str(&escape(&tag.open));
                    pattern.push(')');
                }
            }
            pattern.push('|');
        }
        pattern.push_str("(.+?(?=");
        for tag in &self.tags {
            pattern.push_str(&escape(&tag.open));
            pattern.push('|');
        }
        pattern.push_str("$))");
        pattern
    }

    /// Compile the registry into a matcher.
    ///
    /// # Errors
    ///
    /// Returns the regex error if the combined tag alternation exceeds the
    /// regex size limits.
    pub fn compile(&self) -> Result<TagMatcher, regex::Error> {
        let tags = if self.tags.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = self
                .tags
                .iter()
                .map(|tag| match &tag.close {
                    Some(close) => {
                        format!("({}.*?{})", regex::escape(&tag.open), regex::escape(close))
                    }
                    None => format!("({})", regex::escape(&tag.open)),
                })
                .collect();
            Some(Regex::new(&format!("(?s){}", alternatives.join("|")))?)
        };

        Ok(TagMatcher {
            definitions: self.tags.clone(),
            tags,
        })
    }
}

/// One piece of split input: a byte range plus the index of the matching
/// tag definition, or `None` for plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// Byte range in the input.
    pub span: Range<usize>,
    /// Index into [`TagMatcher::definitions`] of the tag that matched.
    pub tag: Option<usize>,
}

/// Compiled form of a [`TagRegistry`].
#[derive(Debug, Clone)]
pub struct TagMatcher {
    definitions: Vec<TagDefinition>,
    tags: Option<Regex>,
}

impl TagMatcher {
    /// Definitions in the order their capture groups were compiled.
    pub fn definitions(&self) -> &[TagDefinition] {
        &self.definitions
    }

    /// Split `text` into contiguous pieces.
    ///
    /// Tag pieces are the leftmost-first matches of the tag alternatives.
    /// Text between them is split before every open-marker occurrence that
    /// is not at the start of the piece, and a final `\n` at the end of
    /// input becomes its own piece. Concatenating all spans in order yields
    /// `0..text.len()`.
    pub fn split(&self, text: &str) -> Vec<Piece> {
        let mut pieces = Vec::new();
        let mut cursor = 0;

        if let Some(tags) = &self.tags {
            for captures in tags.captures_iter(text) {
                let Some(whole) = captures.get(0) else {
                    continue;
                };
                self.split_plain(text, cursor..whole.start(), &mut pieces);
                let tag = (1..captures.len()).find(|&group| captures.get(group).is_some());
                pieces.push(Piece {
                    span: whole.range(),
                    tag: tag.map(|group| group - 1),
                });
                cursor = whole.end();
            }
        }
        self.split_plain(text, cursor..text.len(), &mut pieces);
        pieces
    }

    /// Split a gap between tag matches the way the lazy fallback would.
    fn split_plain(&self, text: &str, gap: Range<usize>, pieces: &mut Vec<Piece>) {
        if gap.is_empty() {
            return;
        }
        let mut start = gap.start;
        let mut end_of_gap = gap.end;
        let mut trailing_newline = None;
        if gap.end == text.len() && gap.len() > 1 && text[gap.clone()].ends_with('\n') {
            end_of_gap = gap.end - 1;
            trailing_newline = Some(end_of_gap..gap.end);
        }

        while start < end_of_gap {
            let next = self.next_open_marker(text, start, end_of_gap);
            pieces.push(Piece {
                span: start..next,
                tag: None,
            });
            start = next;
        }

        if let Some(span) = trailing_newline {
            pieces.push(Piece { span, tag: None });
        }
    }

    /// First open-marker position strictly after `start`, bounded by `end`.
    fn next_open_marker(&self, text: &str, start: usize, end: usize) -> usize {
        let first_char = text[start..].chars().next().map_or(1, char::len_utf8);
        let search_from = start + first_char;
        if search_from >= end {
            return end;
        }
        self.definitions
            .iter()
            .filter_map(|tag| text[search_from..end].find(tag.open.as_str()))
            .min()
            .map_or(end, |offset| search_from + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans<'a>(text: &'a str, pieces: &[Piece]) -> Vec<&'a str> {
        pieces.iter().map(|p| &text[p.span.clone()]).collect()
    }

    mod pattern_text {
        use super::*;

        #[test]
        fn builtin_pattern_matches_documented_form() {
            insta::assert_snapshot!(
                TagRegistry::builtin().compile_pattern(),
                @r"(<font>.*?<\/font>)|(<anchor>.*?<\/anchor>)|(<title>.*?<\/title>)|(<img.*?<\/img>)|(<gif.*?<\/gif>)|(.+?(?=<font>|<anchor>|<title>|<img|<gif|$))"
            );
        }

        #[test]
        fn empty_registry_has_only_fallback() {
            assert_eq!(TagRegistry::new().compile_pattern(), "(.+?(?=$))");
        }

        #[test]
        fn tag_without_close_marker_is_a_bare_alternative() {
            let mut registry = TagRegistry::new();
            registry.register(TagDefinition::new(TagKind::Title, "<hr/>", None));
            assert_eq!(registry.compile_pattern(), r"(<hr\/>)|(.+?(?=<hr\/>|$))");
        }
    }

    mod register {
        use super::*;

        #[test]
        fn builtin_registers_every_kind_in_order() {
            let registry = TagRegistry::builtin();
            let kinds: Vec<_> = registry.definitions().iter().map(|d| d.kind()).collect();
            assert_eq!(kinds, TagKind::ALL.to_vec());
        }

        #[test]
        fn re_registering_replaces_in_place() {
            let mut registry = TagRegistry::builtin();
            registry.register(TagDefinition::new(
                TagKind::Font,
                "<f>",
                Some("</f>".to_string()),
            ));
            assert_eq!(registry.len(), TagKind::ALL.len());
            assert_eq!(registry.definitions()[0].open(), "<f>");
        }

        #[test]
        fn empty_open_marker_is_ignored() {
            let mut registry = TagRegistry::new();
            registry.register(TagDefinition::new(TagKind::Font, "", None));
            assert!(registry.is_empty());
        }

        #[test]
        fn empty_close_marker_is_treated_as_none() {
            let definition = TagDefinition::new(TagKind::Font, "<x>", Some(String::new()));
            assert_eq!(definition.close(), None);
        }
    }

    mod split {
        use super::*;

        fn builtin() -> TagMatcher {
            TagRegistry::builtin().compile().expect("builtin compiles")
        }

        #[test]
        fn splits_tags_and_plain_text() {
            let text = "Hello <font>Tiny</font>World<img>icon</img>";
            let pieces = builtin().split(text);
            assert_eq!(
                spans(text, &pieces),
                vec!["Hello ", "<font>Tiny</font>", "World", "<img>icon</img>"]
            );
            let tags: Vec<_> = pieces.iter().map(|p| p.tag).collect();
            assert_eq!(tags, vec![None, Some(0), None, Some(3)]);
        }

        #[test]
        fn dangling_open_marker_stays_plain_and_splits_the_gap() {
            let text = "a <img b <font>x";
            let pieces = builtin().split(text);
            assert_eq!(spans(text, &pieces), vec!["a ", "<img b ", "<font>x"]);
            assert!(pieces.iter().all(|p| p.tag.is_none()));
        }

        #[test]
        fn tags_span_newlines() {
            let text = "<title>a\nb</title>";
            let pieces = builtin().split(text);
            assert_eq!(pieces.len(), 1);
            assert_eq!(pieces[0].tag, Some(2));
        }

        #[test]
        fn final_newline_becomes_its_own_piece() {
            let text = "line one\n";
            let pieces = builtin().split(text);
            assert_eq!(spans(text, &pieces), vec!["line one", "\n"]);
        }

        #[test]
        fn lone_newline_gap_is_one_piece() {
            let text = "<font>Tiny</font>\n";
            let pieces = builtin().split(text);
            assert_eq!(spans(text, &pieces), vec!["<font>Tiny</font>", "\n"]);
        }

        #[test]
        fn empty_registry_yields_whole_input() {
            let matcher = TagRegistry::new().compile().expect("compiles");
            let text = "<img>icon</img> and more";
            let pieces = matcher.split(text);
            assert_eq!(spans(text, &pieces), vec![text]);
        }

        #[test]
        fn spans_are_contiguous() {
            let text = "x<gif FPS=2>a</gif>\ny<anchor>Left</anchor><u>z</u>\n";
            let pieces = builtin().split(text);
            let mut expected = 0;
            for piece in &pieces {
                assert_eq!(piece.span.start, expected);
                expected = piece.span.end;
            }
            assert_eq!(expected, text.len());
        }

        #[test]
        fn multibyte_text_is_split_on_char_boundaries() {
            let text = "é<font>Small</font>ü\n";
            let pieces = builtin().split(text);
            assert_eq!(spans(text, &pieces), vec!["é", "<font>Small</font>", "ü", "\n"]);
        }
    }

    #[test]
    fn strip_removes_both_markers() {
        let image = TagDefinition::builtin(TagKind::Image);
        assert_eq!(image.strip("<img WIDTH=2>icon</img>"), Some(" WIDTH=2>icon"));
        assert_eq!(image.strip("plain"), None);
    }
}
