//! Layout parameters for invalidation tracking.

/// Parameters that affect segment heights.
///
/// Used for invalidation: if current params != last layout params, the
/// height pre-pass runs again.
///
/// # Equality Semantics
/// Two LayoutParams are equal if they would produce identical layouts for
/// the same segments. The column width is compared bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutParams {
    column_width_bits: u32,
    /// Image cache generation; bumps when a download finishes and natural
    /// sizes may have changed.
    pub image_generation: u64,
}

impl LayoutParams {
    /// Create new layout params.
    pub fn new(column_width: f32, image_generation: u64) -> Self {
        Self {
            column_width_bits: column_width.to_bits(),
            image_generation,
        }
    }

    /// Column width the layout was computed for.
    pub fn column_width(&self) -> f32 {
        f32::from_bits(self.column_width_bits)
    }
}
