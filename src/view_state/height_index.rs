//! Segment heights with logarithmic offset queries.
//!
//! A description is a column of segments stacked top to bottom. Finding the
//! segment under a scroll offset, or where segment `i` starts, is a prefix
//! sum over that column, kept in a Fenwick tree.
//!
//! `lower_bound` is a binary search over prefix sums, so O(log² n). `push`
//! is O(log n) until the tree is full, then one O(n) rebuild at double size.

/// Fenwick-backed column of segment heights.
///
/// Heights may be zero (font and anchor instructions), so several segments
/// can share a start offset.
#[derive(Debug, Clone)]
pub struct HeightIndex {
    tree: Vec<isize>,
    /// Source of truth for `height` and for rebuilds.
    heights: Vec<usize>,
}

impl HeightIndex {
    /// Empty column with room for `capacity` segments before a rebuild.
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Column over `heights`, in order.
    pub fn from_heights(heights: impl IntoIterator<Item = usize>) -> Self {
        let heights: Vec<usize> = heights.into_iter().collect();
        let mut index = Self::new(heights.len());
        for height in heights {
            index.push(height);
        }
        index
    }

    /// Replace the height of segment `index`, e.g. once its image arrives.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, height: usize) {
        assert!(index < self.len(), "segment {index} of {}", self.len());

        let delta = height as isize - self.heights[index] as isize;
        self.heights[index] = height;
        if delta != 0 {
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Height of segment `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn height(&self, index: usize) -> usize {
        self.heights[index]
    }

    /// Bottom edge of segment `index`: heights `0..=index` summed.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// ```
    /// # use richlog::view_state::HeightIndex;
    /// let column = HeightIndex::from_heights([3, 0, 5]);
    /// assert_eq!(column.prefix_sum(1), 3);
    /// assert_eq!(column.prefix_sum(2), 8);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(index < self.len(), "segment {index} of {}", self.len());
        fenwick::array::prefix_sum(&self.tree, index).max(0) as usize
    }

    /// Top edge of segment `index`.
    pub fn offset_of(&self, index: usize) -> usize {
        if index == 0 {
            0
        } else {
            self.prefix_sum(index - 1)
        }
    }

    /// Segment whose rows include offset `y`, i.e. the first one with
    /// `prefix_sum > y`. Zero-height segments never match. `None` once `y`
    /// is past the last row.
    ///
    /// ```
    /// # use richlog::view_state::HeightIndex;
    /// let column = HeightIndex::from_heights([10, 20, 0, 15]);
    /// assert_eq!(column.lower_bound(10), Some(1));
    /// assert_eq!(column.lower_bound(30), Some(3));
    /// assert_eq!(column.lower_bound(45), None);
    /// ```
    pub fn lower_bound(&self, y: usize) -> Option<usize> {
        // Segment i spans rows offset_of(i)..prefix_sum(i).
        let (mut lo, mut hi) = (0, self.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.prefix_sum(mid) > y {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        (lo < self.len()).then_some(lo)
    }

    /// Height of the whole column.
    pub fn total(&self) -> usize {
        self.len().checked_sub(1).map_or(0, |last| self.prefix_sum(last))
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether no segment has been pushed.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Append a segment below the current bottom.
    ///
    /// Fenwick nodes appended past the old end would have to cover earlier
    /// segments too, so a full tree is rebuilt at double size instead.
    pub fn push(&mut self, height: usize) {
        let slot = self.heights.len();
        self.heights.push(height);
        if slot < self.tree.len() {
            fenwick::array::update(&mut self.tree, slot, height as isize);
        } else {
            self.rebuild((self.tree.len().max(1) * 2).max(self.heights.len()));
        }
    }

    /// Drop every segment, keeping the allocation.
    pub fn clear(&mut self) {
        self.tree.fill(0);
        self.heights.clear();
    }

    fn rebuild(&mut self, capacity: usize) {
        self.tree = vec![0; capacity];
        for (i, &height) in self.heights.iter().enumerate() {
            fenwick::array::update(&mut self.tree, i, height as isize);
        }
    }
}

impl Default for HeightIndex {
    fn default() -> Self {
        Self::new(0)
    }
}
