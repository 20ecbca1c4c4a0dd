//! Sequential layout cursor over a fixed-width column.
//!
//! [`RichRenderer`] places text blocks, textures and placeholders one below
//! the other, starting at an origin on the canvas. It owns the render-scope
//! [`TextScope`] so font and anchor instructions reach every later segment,
//! and it collects the link regions drawn during the pass.

use super::canvas::{Canvas, TextStyle};
use super::decorate::{DecoratedText, DecorationKind};
use super::wrap::{wrap_text, WrappedLine};
use crate::config::MarkupSettings;
use crate::images::{ImageCache, Texture};
use crate::model::{Color, DescriptionData, FontSize, HorizontalAlign, Rect, TextScope, Vec2};
use crate::view_state::hit_test::LinkRegions;
use serde::Serialize;
use std::ops::Range;
use std::time::Duration;

/// Underline position as a fraction of the line height, from the line top.
const UNDERLINE_OFFSET: f32 = 0.85;

/// Underline position for standalone link rows.
const LINK_ROW_UNDERLINE_OFFSET: f32 = 0.75;

/// Result of one render pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderOutput {
    /// Vertical space used, from the origin to the final cursor.
    pub height: f32,
    /// Clickable regions drawn during the pass.
    pub links: LinkRegions,
}

/// Layout cursor drawing into `C`.
pub struct RichRenderer<'a, C: Canvas> {
    canvas: &'a mut C,
    settings: &'a MarkupSettings,
    images: &'a ImageCache,
    origin: Vec2,
    column_width: f32,
    cursor_y: f32,
    scope: TextScope,
    elapsed: Duration,
    links: LinkRegions,
}

impl<'a, C: Canvas> RichRenderer<'a, C> {
    /// Renderer whose column starts at `origin` and is `settings.column_width` wide.
    pub fn new(
        canvas: &'a mut C,
        settings: &'a MarkupSettings,
        images: &'a ImageCache,
        origin: Vec2,
    ) -> Self {
        Self {
            canvas,
            settings,
            images,
            origin,
            column_width: settings.column_width,
            cursor_y: 0.0,
            scope: TextScope::default(),
            elapsed: Duration::ZERO,
            links: LinkRegions::new(),
        }
    }

    /// Override the column width.
    pub fn with_column_width(mut self, width: f32) -> Self {
        self.column_width = width.max(0.0);
        self
    }

    /// Time since the entry was opened, used for animation and status text.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Start from a given text scope.
    pub fn with_scope(mut self, scope: TextScope) -> Self {
        self.scope = scope;
        self
    }

    /// Target canvas.
    pub fn canvas(&self) -> &C {
        &*self.canvas
    }

    /// Target canvas, mutably.
    pub fn canvas_mut(&mut self) -> &mut C {
        &mut *self.canvas
    }

    /// Markup settings.
    pub fn settings(&self) -> &'a MarkupSettings {
        self.settings
    }

    /// Entry image cache.
    pub fn images(&self) -> &'a ImageCache {
        self.images
    }

    /// Column width.
    pub fn column_width(&self) -> f32 {
        self.column_width
    }

    /// Cursor offset below the origin.
    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    /// Current font and anchor.
    pub fn scope(&self) -> TextScope {
        self.scope
    }

    /// Current font and anchor, mutably.
    pub fn scope_mut(&mut self) -> &mut TextScope {
        &mut self.scope
    }

    /// Time since the entry was opened.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Move the cursor down without drawing.
    pub fn skip(&mut self, height: f32) {
        self.cursor_y += height.max(0.0);
    }

    /// Word-wrap and draw `text` at the current font and anchor. Returns the
    /// height placed.
    pub fn place_text(&mut self, text: &str) -> f32 {
        let style = TextStyle::plain(self.scope.font);
        self.place_block(&DecoratedText::plain(text), style)
    }

    /// Draw a plain segment with its underline and hyperlink decorations.
    pub fn place_annotated(&mut self, segment: &DescriptionData) -> f32 {
        let style = TextStyle::plain(self.scope.font);
        self.place_block(&DecoratedText::from_segment(segment), style)
    }

    /// Draw `uv` of `texture` centred in the column, `height` tall, keeping
    /// the aspect ratio of the sampled region.
    pub fn place_texture(&mut self, texture: &Texture, height: f32, uv: Rect) -> f32 {
        let source_width = texture.width() as f32 * uv.width;
        let source_height = texture.height() as f32 * uv.height;
        let width = if source_height > 0.0 {
            source_width / source_height * height
        } else {
            0.0
        };
        let rect = Rect::new(
            self.origin.x + (self.column_width - width) / 2.0,
            self.origin.y + self.cursor_y,
            width,
            height,
        );
        self.canvas.draw_texture(rect, texture, uv);
        self.skip(height);
        height
    }

    /// Draw a status box of the given size centred in the column.
    pub fn place_placeholder(&mut self, width: f32, height: f32, message: &str) -> f32 {
        let width = width.clamp(0.0, self.column_width);
        let rect = Rect::new(
            self.origin.x + (self.column_width - width) / 2.0,
            self.origin.y + self.cursor_y,
            width,
            height,
        );
        self.canvas.draw_placeholder(rect, message);
        self.skip(height);
        height
    }

    /// Bold heading at the small font with a rule beneath, followed by the
    /// title padding. The current font is left untouched.
    pub fn title(&mut self, text: &str) -> f32 {
        let style = TextStyle::plain(FontSize::Small).bold();
        let text_height = self.place_block(&DecoratedText::plain(text), style);
        let rule_y = self.origin.y + self.cursor_y;
        self.canvas.draw_line(
            Vec2::new(self.origin.x, rule_y),
            Vec2::new(self.origin.x + self.column_width, rule_y),
            style.color,
            1.0,
        );
        let padding = self.settings.title_padding as f32;
        self.skip(padding);
        text_height + padding
    }

    /// One-line link: link colour, hover colour plus underline while hovered,
    /// opens `url` when clicked.
    pub fn hyperlink_row(&mut self, name: &str, url: &str) -> f32 {
        let font = self.scope.font;
        let line_height = self.canvas.line_height(font);
        let rect = Rect::new(
            self.origin.x,
            self.origin.y + self.cursor_y,
            self.canvas.text_width(name, font),
            line_height,
        );
        let hovered = self.canvas.is_hovered(rect);
        let color = if hovered {
            Color::MOUSEOVER
        } else {
            self.settings.link_color
        };
        self.canvas
            .draw_text(Vec2::new(rect.x, rect.y), name, TextStyle::plain(font).with_color(color));
        if hovered {
            let y = rect.y + line_height * LINK_ROW_UNDERLINE_OFFSET;
            self.canvas
                .draw_line(Vec2::new(rect.x, y), Vec2::new(rect.x_max(), y), Color::MOUSEOVER, 1.0);
        }
        if self.canvas.clicked(rect) {
            self.canvas.open_url(url);
        }
        self.links.push(rect, url);
        self.skip(line_height);
        line_height
    }

    /// End the pass.
    pub fn finish(self) -> RenderOutput {
        RenderOutput {
            height: self.cursor_y,
            links: self.links,
        }
    }

    fn align_offset(&self, line_width: f32) -> f32 {
        let slack = (self.column_width - line_width).max(0.0);
        match self.scope.anchor.horizontal() {
            HorizontalAlign::Left => 0.0,
            HorizontalAlign::Center => slack / 2.0,
            HorizontalAlign::Right => slack,
        }
    }

    fn place_block(&mut self, block: &DecoratedText, style: TextStyle) -> f32 {
        let line_height = self.canvas.line_height(style.font);
        let top = self.origin.y + self.cursor_y;
        let placed: Vec<(WrappedLine, Vec2)> =
            wrap_text(&*self.canvas, &block.text, self.column_width, style.font)
                .into_iter()
                .enumerate()
                .map(|(i, line)| {
                    let x = self.origin.x + self.align_offset(line.width);
                    let y = top + i as f32 * line_height;
                    (line, Vec2::new(x, y))
                })
                .collect();

        let rects: Vec<Vec<Rect>> = block
            .spans
            .iter()
            .map(|span| self.span_rects(&block.text, &placed, &span.range, style.font, line_height))
            .collect();
        let hovered: Vec<bool> = rects
            .iter()
            .map(|rects| rects.iter().any(|rect| self.canvas.is_hovered(*rect)))
            .collect();

        for (line, pos) in &placed {
            self.draw_line_runs(block, line, *pos, style, &hovered);
        }

        for ((span, rects), hovered) in block.spans.iter().zip(&rects).zip(&hovered) {
            match &span.kind {
                DecorationKind::Underline => {
                    for rect in rects {
                        let y = rect.y + line_height * UNDERLINE_OFFSET;
                        self.canvas.draw_line(
                            Vec2::new(rect.x, y),
                            Vec2::new(rect.x_max(), y),
                            style.color,
                            1.0,
                        );
                    }
                }
                DecorationKind::Link { url } => {
                    for rect in rects {
                        self.canvas.tooltip(*rect, url);
                        if *hovered {
                            let y = rect.y + line_height * UNDERLINE_OFFSET;
                            self.canvas.draw_line(
                                Vec2::new(rect.x, y),
                                Vec2::new(rect.x_max(), y),
                                Color::MOUSEOVER,
                                1.0,
                            );
                        }
                        if self.canvas.clicked(*rect) {
                            self.canvas.open_url(url);
                        }
                        self.links.push(*rect, url.as_str());
                    }
                }
            }
        }

        let height = placed.len() as f32 * line_height;
        self.skip(height);
        height
    }

    /// On-screen rectangles of `range`, one per wrapped line it touches.
    fn span_rects(
        &self,
        text: &str,
        placed: &[(WrappedLine, Vec2)],
        range: &Range<usize>,
        font: FontSize,
        line_height: f32,
    ) -> Vec<Rect> {
        placed
            .iter()
            .filter_map(|(line, pos)| {
                let start = range.start.max(line.range.start);
                let end = range.end.min(line.range.end);
                (start < end).then(|| {
                    let x = pos.x + self.canvas.text_width(&text[line.range.start..start], font);
                    let width = self.canvas.text_width(&text[start..end], font);
                    Rect::new(x, pos.y, width, line_height)
                })
            })
            .collect()
    }

    /// Draw one wrapped line, recolouring the parts covered by links.
    fn draw_line_runs(
        &mut self,
        block: &DecoratedText,
        line: &WrappedLine,
        pos: Vec2,
        style: TextStyle,
        hovered: &[bool],
    ) {
        let mut at = line.range.start;
        for (span, hovered) in block.spans.iter().zip(hovered) {
            if !matches!(span.kind, DecorationKind::Link { .. }) {
                continue;
            }
            let start = span.range.start.max(line.range.start);
            let end = span.range.end.min(line.range.end);
            if start >= end {
                continue;
            }
            if at < start {
                self.draw_run(&block.text, line, at..start, pos, style);
            }
            let color = if *hovered {
                self.settings.link_hover_color
            } else {
                self.settings.link_color
            };
            self.draw_run(&block.text, line, start..end, pos, style.with_color(color));
            at = end;
        }
        if at < line.range.end {
            self.draw_run(&block.text, line, at..line.range.end, pos, style);
        }
    }

    fn draw_run(&mut self, text: &str, line: &WrappedLine, run: Range<usize>, pos: Vec2, style: TextStyle) {
        let x = pos.x + self.canvas.text_width(&text[line.range.start..run.start], style.font);
        self.canvas.draw_text(Vec2::new(x, pos.y), &text[run], style);
    }
}

#[cfg(test)]
#[path = "rich_tests.rs"]
mod tests;
