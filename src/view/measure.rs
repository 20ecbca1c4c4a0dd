//! Fixed-pitch text metrics for terminals, tests and the preview binary.

use super::canvas::TextMeasurer;
use crate::model::FontSize;
use unicode_width::UnicodeWidthStr;

/// Measures text as a grid of equal cells.
///
/// Width is the number of terminal columns (`unicode-width`) times the cell
/// width; each font size scales both dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    cell_width: f32,
    line_height: f32,
}

impl MonospaceMeasurer {
    /// Measurer with the given `Small` cell size.
    pub fn new(cell_width: f32, line_height: f32) -> Self {
        Self {
            cell_width,
            line_height,
        }
    }

    /// One unit per column and per line; heights come out in lines.
    pub fn cells() -> Self {
        Self::new(1.0, 1.0)
    }

    /// Scale applied to each font size.
    pub fn scale(font: FontSize) -> f32 {
        match font {
            FontSize::Tiny => 0.75,
            FontSize::Small => 1.0,
            FontSize::Medium => 1.25,
        }
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(7.0, 22.0)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn line_height(&self, font: FontSize) -> f32 {
        self.line_height * Self::scale(font)
    }

    fn text_width(&self, text: &str, font: FontSize) -> f32 {
        text.width() as f32 * self.cell_width * Self::scale(font)
    }
}
