//! Height pre-pass over a parsed description.
//!
//! Every segment's occupied height is computed once, in order, threading the
//! font/anchor scope through the instructions. The heights land in a
//! [`HeightIndex`] so offsets and the visible range are logarithmic.

use super::height_index::HeightIndex;
use super::layout_params::LayoutParams;
use super::visible_range::VisibleRange;
use crate::model::{DescriptionData, TextScope};
use crate::segments::{segment_height, LayoutEnv};
use tracing::debug;

/// Segment heights and total height of one description at one column width.
#[derive(Debug, Clone)]
pub struct DocumentLayout {
    heights: HeightIndex,
    bottom_padding: usize,
    final_scope: TextScope,
    params: LayoutParams,
}

impl DocumentLayout {
    /// Run the height pre-pass.
    pub fn compute(segments: &[DescriptionData], env: &LayoutEnv<'_>) -> Self {
        let mut scope = TextScope::default();
        let mut heights = HeightIndex::new(segments.len());
        for segment in segments {
            heights.push(segment_height(segment, &mut scope, env) as usize);
        }

        // One blank line of whatever font the text ended in.
        let bottom_padding = env.measurer.line_height(scope.font).ceil() as usize;
        let params = LayoutParams::new(env.column_width, env.images.generation());

        debug!(
            segments = segments.len(),
            content = heights.total(),
            column_width = env.column_width,
            "Computed description layout"
        );

        Self {
            heights,
            bottom_padding,
            final_scope: scope,
            params,
        }
    }

    /// Parameters this layout was computed with.
    pub fn params(&self) -> LayoutParams {
        self.params
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether the description had no segments.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Height of segment `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn segment_height(&self, index: usize) -> usize {
        self.heights.height(index)
    }

    /// Offset of the top of segment `index`. `len()` gives the content height.
    pub fn segment_offset(&self, index: usize) -> usize {
        if index >= self.len() {
            self.content_height()
        } else {
            self.heights.offset_of(index)
        }
    }

    /// Per-segment heights in order.
    pub fn heights(&self) -> Vec<usize> {
        (0..self.len()).map(|i| self.heights.height(i)).collect()
    }

    /// Sum of segment heights.
    pub fn content_height(&self) -> usize {
        self.heights.total()
    }

    /// Blank space reserved under the last segment.
    pub fn bottom_padding(&self) -> usize {
        self.bottom_padding
    }

    /// Scope in effect after the last segment.
    pub fn final_scope(&self) -> TextScope {
        self.final_scope
    }

    /// Content height plus bottom padding.
    pub fn total_height(&self) -> usize {
        self.content_height() + self.bottom_padding
    }

    /// Segments overlapping `[scroll_offset, scroll_offset + viewport_height)`.
    pub fn visible_range(&self, scroll_offset: usize, viewport_height: usize) -> VisibleRange {
        let start = self.heights.lower_bound(scroll_offset).unwrap_or(self.len());
        if viewport_height == 0 {
            return VisibleRange::new(start, start, scroll_offset, viewport_height);
        }

        // Segment holding the last visible row; zero-height segments right
        // after it start at the bottom edge and stay out.
        let last_row = scroll_offset + viewport_height - 1;
        let end = match self.heights.lower_bound(last_row) {
            Some(i) => i + 1,
            None => self.len(),
        };
        VisibleRange::new(start, end.max(start), scroll_offset, viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarkupSettings;
    use crate::images::texture::fixtures::solid;
    use crate::images::{ImageCache, Texture};
    use crate::model::FontSize;
    use crate::parser::parse;
    use crate::view::MonospaceMeasurer;

    fn layout_of(raw: &str) -> DocumentLayout {
        let settings = MarkupSettings {
            column_width: 400.0,
            ..MarkupSettings::default()
        };
        let mut images = ImageCache::new();
        images.insert_local("icon", Texture::new("icon", solid(200, 100)));
        let measurer = MonospaceMeasurer::new(10.0, 20.0);
        let env = LayoutEnv::new(&settings, &images, &measurer);
        DocumentLayout::compute(&parse(raw), &env)
    }

    mod heights {
        use super::*;

        #[test]
        fn sums_segments_and_adds_bottom_line() {
            let layout = layout_of("Hello <font>Tiny</font>World<img>icon</img>");
            assert_eq!(layout.heights(), vec![20, 0, 15, 200]);
            assert_eq!(layout.content_height(), 235);
            assert_eq!(layout.final_scope().font, FontSize::Tiny);
            assert_eq!(layout.bottom_padding(), 15);
            assert_eq!(layout.total_height(), 250);
        }

        #[test]
        fn empty_description_is_only_padding() {
            let layout = layout_of("");
            assert!(layout.is_empty());
            assert_eq!(layout.total_height(), 20);
        }

        #[test]
        fn offsets_accumulate() {
            let layout = layout_of("Hello <font>Tiny</font>World<img>icon</img>");
            assert_eq!(layout.segment_offset(0), 0);
            assert_eq!(layout.segment_offset(2), 20);
            assert_eq!(layout.segment_offset(3), 35);
            assert_eq!(layout.segment_offset(4), 235);
        }

        #[test]
        fn params_record_column_width() {
            let layout = layout_of("x");
            assert_eq!(layout.params(), LayoutParams::new(400.0, 0));
        }
    }

    mod visible {
        use super::*;

        #[test]
        fn viewport_over_image() {
            let layout = layout_of("Hello <font>Tiny</font>World<img>icon</img>");
            let range = layout.visible_range(40, 50);
            assert_eq!(range.indices(), 3..4);
        }

        #[test]
        fn viewport_at_top_includes_text() {
            let layout = layout_of("Hello <font>Tiny</font>World<img>icon</img>");
            let range = layout.visible_range(0, 30);
            assert_eq!(range.indices(), 0..3);
        }

        #[test]
        fn viewport_below_content_is_empty() {
            let layout = layout_of("Hello");
            let range = layout.visible_range(500, 100);
            assert!(range.is_empty());
            assert_eq!(range.start_index, 1);
        }

        #[test]
        fn zero_height_viewport_is_empty() {
            let layout = layout_of("Hello");
            assert!(layout.visible_range(0, 0).is_empty());
        }
    }
}
