//! Greedy word wrap shared by measuring and drawing.
//!
//! Both the height pre-pass and the renderer call [`wrap_text`], so the
//! line breaks used for decorations are the ones that were drawn.

use super::canvas::TextMeasurer;
use crate::model::FontSize;
use std::ops::Range;

/// One wrapped line.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    /// Byte range of the line in the wrapped text, from the first word's
    /// start to the last word's end.
    pub range: Range<usize>,
    /// Measured width of the line.
    pub width: f32,
}

impl WrappedLine {
    /// Line text.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.clone()]
    }
}

/// Byte ranges of whitespace-separated words in `paragraph`, offset by `base`.
fn words(paragraph: &str, base: usize) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut start = None;
    for (i, c) in paragraph.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                found.push(base + s..base + i);
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        found.push(base + s..base + paragraph.len());
    }
    found
}

/// Wrap `text` to `max_width`.
///
/// Every `\n`-terminated paragraph yields at least one line; a trailing
/// `\n` does not start an extra line, and empty text has no lines. Words
/// wider than the column are not broken and overflow on a line of their
/// own.
pub fn wrap_text<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    max_width: f32,
    font: FontSize,
) -> Vec<WrappedLine> {
    let mut lines = Vec::new();
    let mut base = 0;
    for raw in text.split_terminator('\n') {
        let paragraph = raw.strip_suffix('\r').unwrap_or(raw);
        let mut current: Option<Range<usize>> = None;
        for word in words(paragraph, base) {
            let candidate = match &current {
                Some(line) => line.start..word.end,
                None => word.clone(),
            };
            let fits = measurer.text_width(&text[candidate.clone()], font) <= max_width;
            match current.take() {
                Some(line) if !fits => {
                    lines.push(finish(measurer, text, line, font));
                    current = Some(word);
                }
                _ => current = Some(candidate),
            }
        }
        match current {
            Some(line) => lines.push(finish(measurer, text, line, font)),
            None => lines.push(WrappedLine {
                range: base..base,
                width: 0.0,
            }),
        }
        base += raw.len() + 1;
    }
    lines
}

fn finish<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    range: Range<usize>,
    font: FontSize,
) -> WrappedLine {
    let width = measurer.text_width(&text[range.clone()], font);
    WrappedLine { range, width }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::measure::MonospaceMeasurer;

    fn lines(text: &str, width: f32) -> Vec<String> {
        let measurer = MonospaceMeasurer::new(10.0, 20.0);
        wrap_text(&measurer, text, width, FontSize::Small)
            .iter()
            .map(|line| line.text(text).to_string())
            .collect()
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(lines("", 100.0).is_empty());
    }

    #[test]
    fn fits_on_one_line() {
        assert_eq!(lines("hello world", 110.0), vec!["hello world"]);
    }

    #[test]
    fn breaks_between_words() {
        assert_eq!(lines("hello world", 100.0), vec!["hello", "world"]);
    }

    #[test]
    fn long_word_overflows_alone() {
        assert_eq!(lines("a extraordinary b", 50.0), vec!["a", "extraordinary", "b"]);
    }

    #[test]
    fn newlines_start_paragraphs_and_trailing_newline_adds_none() {
        assert_eq!(lines("a\n\nb\n", 100.0), vec!["a", "", "b"]);
        assert_eq!(lines("\n", 100.0), vec![""]);
    }

    #[test]
    fn ranges_point_into_source() {
        let measurer = MonospaceMeasurer::new(10.0, 20.0);
        let text = "ab  cd\nef";
        let wrapped = wrap_text(&measurer, text, 1000.0, FontSize::Small);
        assert_eq!(wrapped[0].range, 0..6);
        assert_eq!(wrapped[0].width, 60.0);
        assert_eq!(wrapped[1].range, 7..9);
    }
}
