//! richlog - rich-text changelog markup
//!
//! Parses a tagged description string into typed segments, computes their
//! layout heights and renders them through host-supplied drawing
//! capabilities.
//!
//! The pipeline is raw text → [`parser::parse`] → [`model::DescriptionData`]
//! list → [`view_state::DocumentLayout`] height pre-pass → render pass over
//! [`view::RichRenderer`]. [`entry::ChangelogEntry`] ties a description to
//! the textures it references for as long as it is open.

pub mod config;
pub mod entry;
pub mod images;
pub mod logging;
pub mod model;
pub mod parser;
pub mod segments;
pub mod view;
pub mod view_state;
