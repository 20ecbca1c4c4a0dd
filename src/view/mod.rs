//! Rendering against host-supplied drawing capabilities (impure shell)
//!
//! The markup core measures and draws only through [`TextMeasurer`] and
//! [`Canvas`]. [`RichRenderer`] is the layout cursor segments draw with;
//! [`MonospaceMeasurer`] and [`RecordingCanvas`] are the in-crate
//! implementations used by the preview binary and the tests.

pub mod canvas;
pub mod decorate;
pub mod measure;
pub mod recording;
pub mod rich;
pub mod wrap;

pub use canvas::{Canvas, TextMeasurer, TextStyle};
pub use decorate::{DecoratedText, Decoration, DecorationKind};
pub use measure::MonospaceMeasurer;
pub use recording::{DrawOp, RecordingCanvas};
pub use rich::{RenderOutput, RichRenderer};
pub use wrap::{wrap_text, WrappedLine};
