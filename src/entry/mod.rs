//! One open changelog entry: its parsed description, textures and layout.
//!
//! An entry is acquired with [`ChangelogEntry::open`] when it becomes
//! active and released with [`ChangelogEntry::close`]. Nothing is released
//! implicitly; [`EntrySlot`] closes the previous entry whenever another one
//! replaces it.

use crate::config::MarkupSettings;
use crate::images::{ImageCache, ImageFetcher, ImageLookup, Texture};
use crate::logging::error_once;
use crate::model::{
    DescriptionData, EntryPaths, EntryRecord, HyperlinkedIcon, ResourceError, TagKind, Vec2,
};
use crate::parser::{ensure_trailing_newline, parse};
use crate::segments::{render_segment, LayoutEnv};
use crate::view::{Canvas, RenderOutput, RichRenderer, TextMeasurer};
use crate::view_state::{DocumentLayout, LayoutParams, VisibleRange};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Which icon bar to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSide {
    /// Icons left of the title.
    Left,
    /// Icons right of the title.
    Right,
}

/// Vertical window of the document to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Distance from the top of the document to the top of the window.
    pub scroll_offset: usize,
    /// Window height.
    pub height: usize,
}

impl Viewport {
    /// Window `height` tall starting `scroll_offset` below the top.
    pub fn new(scroll_offset: usize, height: usize) -> Self {
        Self {
            scroll_offset,
            height,
        }
    }
}

/// An opened changelog entry.
#[derive(Debug)]
pub struct ChangelogEntry {
    record: EntryRecord,
    settings: MarkupSettings,
    images: ImageCache,
    segments: Vec<DescriptionData>,
    layout: Option<DocumentLayout>,
    opened_at: Instant,
    open: bool,
}

impl ChangelogEntry {
    /// Load the entry's images, start its downloads and parse its
    /// description.
    pub fn open(
        record: EntryRecord,
        paths: &EntryPaths,
        settings: MarkupSettings,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Self {
        let mut images = ImageCache::open(paths, &settings);
        if !record.images.is_empty() {
            images.begin_remote_downloads(&record.images, fetcher);
        }
        Self::with_images(record, settings, images)
    }

    /// Entry over an already populated cache.
    pub fn with_images(record: EntryRecord, settings: MarkupSettings, images: ImageCache) -> Self {
        let raw = record.enhanced_description();
        let mut segments = parse(&raw);
        ensure_trailing_newline(&mut segments, raw.len());

        info!(
            version = %record.current_version,
            segments = segments.len(),
            images = images.len(),
            "Opened changelog entry"
        );

        Self {
            record,
            settings,
            images,
            segments,
            layout: None,
            opened_at: Instant::now(),
            open: true,
        }
    }

    /// The underlying record.
    pub fn record(&self) -> &EntryRecord {
        &self.record
    }

    /// Mutable record, for update bookkeeping.
    pub fn record_mut(&mut self) -> &mut EntryRecord {
        &mut self.record
    }

    /// Settings the entry lays out with.
    pub fn settings(&self) -> &MarkupSettings {
        &self.settings
    }

    /// The entry's textures.
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Mutable cache, for waiting on downloads.
    pub fn images_mut(&mut self) -> &mut ImageCache {
        &mut self.images
    }

    /// Parsed description.
    pub fn segments(&self) -> &[DescriptionData] {
        &self.segments
    }

    /// Time since the entry was opened; drives animations.
    pub fn elapsed(&self) -> Duration {
        self.opened_at.elapsed()
    }

    /// Whether [`close`](Self::close) has not been called yet.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Layout for the current column width and image generation, reusing
    /// the cached one when neither changed.
    pub fn layout(&mut self, measurer: &dyn TextMeasurer) -> &DocumentLayout {
        let params = LayoutParams::new(self.settings.column_width, self.images.generation());
        let layout = match self.layout.take() {
            Some(layout) if layout.params() == params => layout,
            previous => {
                if previous.is_some() {
                    debug!(generation = params.image_generation, "Layout invalidated");
                }
                let env = LayoutEnv::new(&self.settings, &self.images, measurer);
                DocumentLayout::compute(&self.segments, &env)
            }
        };
        self.layout.insert(layout)
    }

    /// Total layout height, bottom padding included.
    pub fn total_height(&mut self, measurer: &dyn TextMeasurer) -> usize {
        self.layout(measurer).total_height()
    }

    /// Change the column width. The next layout recomputes.
    pub fn set_column_width(&mut self, column_width: f32) {
        self.settings.column_width = column_width;
    }

    /// Draw the description at `origin`, animating from the time the entry
    /// was opened.
    pub fn render<C: Canvas>(&mut self, canvas: &mut C, origin: Vec2, viewport: Option<Viewport>) -> RenderOutput {
        let elapsed = self.elapsed();
        self.render_at(canvas, origin, viewport, elapsed)
    }

    /// Draw the description as it looks `elapsed` after opening.
    ///
    /// With a viewport, the document is shifted up by the scroll offset and
    /// only segments overlapping the window are drawn. Font and anchor
    /// instructions above the window still apply.
    pub fn render_at<C: Canvas>(
        &mut self,
        canvas: &mut C,
        origin: Vec2,
        viewport: Option<Viewport>,
        elapsed: Duration,
    ) -> RenderOutput {
        if !self.open {
            return RenderOutput::default();
        }
        self.layout(&*canvas);
        let Some(layout) = self.layout.as_ref() else {
            return RenderOutput::default();
        };

        let range = match viewport {
            Some(view) => layout.visible_range(view.scroll_offset, view.height),
            None => VisibleRange::new(0, self.segments.len(), 0, layout.total_height()),
        };
        let shift = viewport.map_or(0.0, |view| view.scroll_offset as f32);
        let mut renderer = RichRenderer::new(
            canvas,
            &self.settings,
            &self.images,
            Vec2::new(origin.x, origin.y - shift),
        )
        .with_elapsed(elapsed);

        for segment in &self.segments[..range.start_index] {
            if segment.tag().is_some_and(TagKind::is_instruction) {
                render_segment(segment, &mut renderer);
            }
        }
        for index in range.indices() {
            align_to(&mut renderer, layout.segment_offset(index));
            render_segment(&self.segments[index], &mut renderer);
        }
        align_to(&mut renderer, layout.segment_offset(range.end_index));
        if range.end_index == self.segments.len() {
            renderer.skip(layout.bottom_padding() as f32);
        }
        renderer.finish()
    }

    /// Icons of one bar with their textures. Icons whose image is not in
    /// the local cache come back with `None`.
    pub fn icon_bar(&self, side: IconSide) -> Vec<(HyperlinkedIcon, Option<Texture>)> {
        let icons = match side {
            IconSide::Left => &self.record.left_icon_bar,
            IconSide::Right => &self.record.right_icon_bar,
        };
        icons
            .iter()
            .map(|icon| {
                let texture = match self.images.lookup(&icon.icon) {
                    ImageLookup::Ready(texture) => Some(texture),
                    _ => {
                        error_once(
                            &format!("icon:{}", icon.icon),
                            ResourceError::MissingImage {
                                name: icon.icon.clone(),
                            },
                        );
                        None
                    }
                };
                (icon.clone(), texture)
            })
            .collect()
    }

    /// Release every texture and stop rendering. Returns the number of
    /// textures released; a second call releases nothing.
    pub fn close(&mut self) -> usize {
        let released = self.images.dispose();
        self.layout = None;
        if self.open {
            info!(version = %self.record.current_version, released, "Closed changelog entry");
        }
        self.open = false;
        released
    }
}

/// Advance the cursor to `offset` so drawing stays on the pre-pass grid.
fn align_to<C: Canvas>(renderer: &mut RichRenderer<'_, C>, offset: usize) {
    let gap = offset as f32 - renderer.cursor_y();
    if gap > 0.0 {
        renderer.skip(gap);
    }
}

/// Holds the active entry and closes it when replaced.
#[derive(Debug, Default)]
pub struct EntrySlot {
    active: Option<ChangelogEntry>,
}

impl EntrySlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `entry` active, closing the previous one. Returns the number of
    /// textures the previous entry released.
    pub fn replace(&mut self, entry: ChangelogEntry) -> usize {
        let released = self.close();
        self.active = Some(entry);
        released
    }

    /// Close and drop the active entry.
    pub fn close(&mut self) -> usize {
        self.active.take().map_or(0, |mut entry| entry.close())
    }

    /// Active entry.
    pub fn active(&self) -> Option<&ChangelogEntry> {
        self.active.as_ref()
    }

    /// Mutable active entry.
    pub fn active_mut(&mut self) -> Option<&mut ChangelogEntry> {
        self.active.as_mut()
    }

    /// Whether an entry is active.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
