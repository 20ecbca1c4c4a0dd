//! View-state layer - layout, visible range and hit-testing
//!
//! Everything here is computed from parsed segments without drawing.
//!
//! # Module Structure
//!
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `layout`: DocumentLayout - height pre-pass over one description
//! - `layout_params`: LayoutParams - invalidation key for a cached layout
//! - `visible_range`: VisibleRange - segments under a viewport
//! - `hit_test`: LinkRegions - clickable link rectangles from a render

pub mod height_index;
pub mod layout;
pub mod layout_params;
pub mod visible_range;

pub use height_index::HeightIndex;
pub use hit_test::{LinkRegion, LinkRegions};
pub use layout::DocumentLayout;
pub use layout_params::LayoutParams;
pub use visible_range::VisibleRange;
