//! Domain model types (pure).
//!
//! All types in this module are plain data: parsed segments, style state,
//! geometry, the collaborator-provided entry record and the error taxonomy.

pub mod description;
pub mod entry;
pub mod error;
pub mod geometry;
pub mod style;

// Re-export for convenience
pub use description::{DescriptionData, TagKind};
pub use entry::{EntryPaths, EntryRecord, HyperlinkedIcon, RemoteImageSpec, UpdateOn};
pub use error::{
    AppError, AttributeError, AttributeType, ResourceError, StructuralError, StyleParseError,
};
pub use geometry::{Color, InvalidColor, Rect, Vec2};
pub use style::{FontSize, HorizontalAlign, TextAnchor, TextScope};
