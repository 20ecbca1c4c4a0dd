//! Rendering capabilities supplied by the host.
//!
//! The markup core never draws pixels itself. It measures text through
//! [`TextMeasurer`] and issues draw calls through [`Canvas`].

use super::wrap::wrap_text;
use crate::images::Texture;
use crate::model::{Color, FontSize, Rect, Vec2};

/// Style of one `draw_text` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size.
    pub font: FontSize,
    /// Text colour.
    pub color: Color,
    /// Bold weight.
    pub bold: bool,
}

impl TextStyle {
    /// Regular white text at `font`.
    pub fn plain(font: FontSize) -> Self {
        Self {
            font,
            color: Color::WHITE,
            bold: false,
        }
    }

    /// Same style with another colour.
    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    /// Same style in bold.
    pub fn bold(self) -> Self {
        Self { bold: true, ..self }
    }
}

/// Text metrics.
pub trait TextMeasurer {
    /// Height of one line at `font`.
    fn line_height(&self, font: FontSize) -> f32;

    /// Advance width of `text` on a single line.
    fn text_width(&self, text: &str, font: FontSize) -> f32;

    /// Height of `text` word-wrapped to `width`.
    fn text_height(&self, text: &str, width: f32, font: FontSize) -> f32 {
        wrap_text(self, text, width, font).len() as f32 * self.line_height(font)
    }
}

/// Drawing surface plus the pointer state needed for links.
pub trait Canvas: TextMeasurer {
    /// Draw one line of text with its top-left corner at `pos`.
    fn draw_text(&mut self, pos: Vec2, text: &str, style: TextStyle);

    /// Draw the `uv` sub-rectangle (unit coordinates) of `texture` into `rect`.
    fn draw_texture(&mut self, rect: Rect, texture: &Texture, uv: Rect);

    /// Draw a straight line.
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, thickness: f32);

    /// Draw a stand-in box with a status message.
    fn draw_placeholder(&mut self, rect: Rect, message: &str);

    /// Pointer position, if the pointer is over the surface.
    fn mouse_position(&self) -> Option<Vec2>;

    /// Whether `rect` was clicked this frame.
    fn clicked(&mut self, rect: Rect) -> bool;

    /// Show `text` when the pointer rests on `rect`.
    fn tooltip(&mut self, rect: Rect, text: &str);

    /// Open `url` in the system browser.
    fn open_url(&mut self, url: &str) {
        match open::that(url) {
            Ok(()) => tracing::info!(url, "Opened link"),
            Err(err) => tracing::warn!(url, %err, "Failed to open link"),
        }
    }

    /// Whether the pointer is over `rect`.
    fn is_hovered(&self, rect: Rect) -> bool {
        self.mouse_position().is_some_and(|p| rect.contains(p))
    }
}
