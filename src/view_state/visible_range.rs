//! Visible range calculation result

use std::ops::Range;

/// Range of segments visible in the current viewport.
///
/// Computed via binary search on cumulative segment offsets.
/// Indices are into the entry's segment list.
///
/// # Invariants
/// - `start_index <= end_index`
/// - All segments in range have some portion visible in viewport, apart
///   from zero-height segments that share an offset with a visible one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    /// Index of first visible segment (inclusive).
    pub start_index: usize,
    /// Index of last visible segment (exclusive).
    pub end_index: usize,
    /// Scroll offset from the top of the document.
    pub scroll_offset: usize,
    /// Viewport height.
    pub viewport_height: usize,
}

impl VisibleRange {
    /// Create new visible range.
    ///
    /// # Panics
    /// In debug builds, panics if start_index > end_index.
    pub fn new(start_index: usize, end_index: usize, scroll_offset: usize, viewport_height: usize) -> Self {
        debug_assert!(
            start_index <= end_index,
            "start_index {} > end_index {}",
            start_index,
            end_index
        );
        Self {
            start_index,
            end_index,
            scroll_offset,
            viewport_height,
        }
    }

    /// Number of visible segments.
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    /// Check if range is empty.
    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    /// Visible segment indices.
    pub fn indices(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    /// Check if a specific segment index is visible.
    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod basics {
        use super::*;

        #[test]
        fn len_and_indices() {
            let range = VisibleRange::new(2, 5, 100, 50);
            assert_eq!(range.len(), 3);
            assert_eq!(range.indices().collect::<Vec<_>>(), vec![2, 3, 4]);
            assert!(!range.is_empty());
        }

        #[test]
        fn empty_range() {
            let range = VisibleRange::new(4, 4, 0, 0);
            assert!(range.is_empty());
            assert_eq!(range.len(), 0);
        }
    }

    mod contains {
        use super::*;

        #[test]
        fn bounds_are_half_open() {
            let range = VisibleRange::new(2, 5, 0, 10);
            assert!(!range.contains(1));
            assert!(range.contains(2));
            assert!(range.contains(4));
            assert!(!range.contains(5));
        }
    }
}
