//! Tag dispatch: occupied height and render action per segment.
//!
//! The tag set is closed, so dispatch is a `match` on [`TagKind`] rather
//! than a handler table. Every handler gets the same two capabilities:
//!
//! - [`TagKind::height_occupied`] measures a tag body for the layout
//!   pre-pass. Font and anchor bodies update the [`TextScope`] here too, so
//!   plain text after them is measured with the right font.
//! - [`TagKind::render`] draws the body through a [`RichRenderer`].
//!
//! Failures never escape: each handler logs once per stable key and falls
//! back to a default.

pub mod animation;
pub mod container;
pub mod text_tags;

pub use animation::{frame_index, sprite_uv};
pub use container::{ContainerLayout, GIF_ATTRIBUTES, IMAGE_ATTRIBUTES};

use crate::config::MarkupSettings;
use crate::images::ImageCache;
use crate::model::{DescriptionData, TagKind, TextScope};
use crate::view::{Canvas, RichRenderer, TextMeasurer};

/// What height computation may consult.
#[derive(Clone, Copy)]
pub struct LayoutEnv<'a> {
    /// Markup settings.
    pub settings: &'a MarkupSettings,
    /// Entry image cache, for natural image sizes.
    pub images: &'a ImageCache,
    /// Text metrics.
    pub measurer: &'a dyn TextMeasurer,
    /// Width text wraps to and containers default to.
    pub column_width: f32,
}

impl<'a> LayoutEnv<'a> {
    /// Environment for a column `settings.column_width` wide.
    pub fn new(
        settings: &'a MarkupSettings,
        images: &'a ImageCache,
        measurer: &'a dyn TextMeasurer,
    ) -> Self {
        Self {
            settings,
            images,
            measurer,
            column_width: settings.column_width,
        }
    }

    /// Same environment with another column width.
    pub fn with_column_width(self, column_width: f32) -> Self {
        Self {
            column_width,
            ..self
        }
    }

    /// Environment matching what `renderer` draws with.
    pub fn for_renderer<C: Canvas>(renderer: &'a RichRenderer<'_, C>) -> Self {
        Self::new(renderer.settings(), renderer.images(), renderer.canvas())
            .with_column_width(renderer.column_width())
    }

    /// Default container width: the column, rounded down.
    pub fn container_width(&self) -> i32 {
        self.column_width.max(0.0).floor() as i32
    }
}

impl std::fmt::Debug for LayoutEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEnv")
            .field("column_width", &self.column_width)
            .field("images", &self.images.len())
            .finish_non_exhaustive()
    }
}

impl TagKind {
    /// Height reserved for a segment with this tag and inner `body`.
    ///
    /// Font and anchor tags return 0 and update `scope`.
    pub fn height_occupied(self, body: &str, scope: &mut TextScope, env: &LayoutEnv<'_>) -> u32 {
        match self {
            Self::Font | Self::Anchor => {
                text_tags::apply_instruction(self, body, scope);
                0
            }
            Self::Title => text_tags::title_height(body, env),
            Self::Image | Self::Gif => container::height(self, body, env),
        }
    }

    /// Draw a segment with this tag and inner `body`.
    pub fn render<C: Canvas>(self, body: &str, renderer: &mut RichRenderer<'_, C>) {
        match self {
            Self::Font | Self::Anchor => {
                text_tags::apply_instruction(self, body, renderer.scope_mut());
            }
            Self::Title => {
                renderer.title(body);
            }
            Self::Image => container::render_image(body, renderer),
            Self::Gif => animation::render_gif(body, renderer),
        }
    }
}

/// Height of any segment, updating `scope` for instructions.
pub fn segment_height(segment: &DescriptionData, scope: &mut TextScope, env: &LayoutEnv<'_>) -> u32 {
    match segment.tag() {
        Some(tag) => tag.height_occupied(segment.text(), scope, env),
        None => text_tags::plain_height(segment, scope, env),
    }
}

/// Draw any segment.
pub fn render_segment<C: Canvas>(segment: &DescriptionData, renderer: &mut RichRenderer<'_, C>) {
    match segment.tag() {
        Some(tag) => tag.render(segment.text(), renderer),
        None => {
            renderer.place_annotated(segment);
        }
    }
}
