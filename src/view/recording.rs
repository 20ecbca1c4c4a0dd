//! A canvas that records draw calls instead of rasterising them.
//!
//! Used by the preview binary to dump what would be drawn, and by tests to
//! assert on placement. Pointer state is scripted.

use super::canvas::{Canvas, TextMeasurer, TextStyle};
use super::measure::MonospaceMeasurer;
use crate::images::{Texture, TextureId};
use crate::model::{Color, FontSize, Rect, Vec2};
use serde::Serialize;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// `draw_text`.
    Text {
        /// Top-left corner.
        pos: Vec2,
        /// Drawn text.
        text: String,
        /// Font size.
        font: FontSize,
        /// Colour.
        color: Color,
        /// Bold weight.
        bold: bool,
    },
    /// `draw_texture`.
    Texture {
        /// Destination rectangle.
        rect: Rect,
        /// Texture name.
        name: String,
        /// Texture id.
        #[serde(skip)]
        id: Option<TextureId>,
        /// Source sub-rectangle in unit coordinates.
        uv: Rect,
    },
    /// `draw_line`.
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Colour.
        color: Color,
    },
    /// `draw_placeholder`.
    Placeholder {
        /// Box.
        rect: Rect,
        /// Status message.
        message: String,
    },
    /// `tooltip`.
    Tooltip {
        /// Hover region.
        rect: Rect,
        /// Tooltip text.
        text: String,
    },
}

/// Recording canvas over a [`MonospaceMeasurer`].
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    measurer: MonospaceMeasurer,
    mouse: Option<Vec2>,
    click: Option<Vec2>,
    ops: Vec<DrawOp>,
    opened: Vec<String>,
}

impl RecordingCanvas {
    /// Canvas measuring with `measurer`.
    pub fn new(measurer: MonospaceMeasurer) -> Self {
        Self {
            measurer,
            ..Self::default()
        }
    }

    /// Place the pointer at `pos` (or off the surface).
    pub fn set_mouse(&mut self, pos: Option<Vec2>) {
        self.mouse = pos;
    }

    /// Place the pointer at `pos` and press it for the next frame.
    pub fn click_at(&mut self, pos: Vec2) {
        self.mouse = Some(pos);
        self.click = Some(pos);
    }

    /// Recorded calls, in order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Take the recorded calls, leaving the canvas empty.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// URLs passed to `open_url`.
    pub fn opened_urls(&self) -> &[String] {
        &self.opened
    }

    /// Concatenated text of every `draw_text` call.
    pub fn text_runs(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl TextMeasurer for RecordingCanvas {
    fn line_height(&self, font: FontSize) -> f32 {
        self.measurer.line_height(font)
    }

    fn text_width(&self, text: &str, font: FontSize) -> f32 {
        self.measurer.text_width(text, font)
    }
}

impl Canvas for RecordingCanvas {
    fn draw_text(&mut self, pos: Vec2, text: &str, style: TextStyle) {
        self.ops.push(DrawOp::Text {
            pos,
            text: text.to_string(),
            font: style.font,
            color: style.color,
            bold: style.bold,
        });
    }

    fn draw_texture(&mut self, rect: Rect, texture: &Texture, uv: Rect) {
        self.ops.push(DrawOp::Texture {
            rect,
            name: texture.name().to_string(),
            id: Some(texture.id()),
            uv,
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, _thickness: f32) {
        self.ops.push(DrawOp::Line { from, to, color });
    }

    fn draw_placeholder(&mut self, rect: Rect, message: &str) {
        self.ops.push(DrawOp::Placeholder {
            rect,
            message: message.to_string(),
        });
    }

    fn mouse_position(&self) -> Option<Vec2> {
        self.mouse
    }

    fn clicked(&mut self, rect: Rect) -> bool {
        match self.click {
            Some(pos) if rect.contains(pos) => {
                self.click = None;
                true
            }
            _ => false,
        }
    }

    fn tooltip(&mut self, rect: Rect, text: &str) {
        self.ops.push(DrawOp::Tooltip {
            rect,
            text: text.to_string(),
        });
    }

    fn open_url(&mut self, url: &str) {
        self.opened.push(url.to_string());
    }
}
