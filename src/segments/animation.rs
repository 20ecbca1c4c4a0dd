//! `<gif>` frame selection and drawing.

use super::container::{resolve_for_render, ContainerLayout};
use crate::logging::error_once;
use crate::model::{Rect, ResourceError, TagKind};
use crate::parser::attributes::{DELAY, FPS};
use crate::view::{Canvas, RichRenderer};

/// Frame to show after `elapsed_secs`.
///
/// Each cycle is `frame_count + delay` ticks long; the first `delay` ticks
/// hold frame 0, then every frame is shown for one tick. Negative `fps` and
/// `delay` count as zero. `None` when there are no frames.
pub fn frame_index(elapsed_secs: f64, fps: i32, delay: i32, frame_count: usize) -> Option<usize> {
    if frame_count == 0 {
        return None;
    }
    let frames = frame_count as i64;
    let delay = i64::from(delay.max(0));
    let tick = (elapsed_secs.max(0.0) * f64::from(fps.max(0))).floor() as i64;
    let index = (tick.rem_euclid(frames + delay) - delay).clamp(0, frames);
    Some(index as usize)
}

/// Unit-space source rectangle of cell `index` in a `columns x rows` sheet,
/// read row by row.
pub fn sprite_uv(index: usize, columns: u32, rows: u32) -> Rect {
    let columns = columns.max(1) as usize;
    let rows = rows.max(1) as usize;
    let cell = index % (columns * rows);
    let (column, row) = (cell % columns, cell / columns);
    let (width, height) = (1.0 / columns as f32, 1.0 / rows as f32);
    Rect::new(column as f32 * width, row as f32 * height, width, height)
}

/// Draw a `<gif>` body: the current frame of its frame set, or the current
/// cell when the set is a single sprite sheet.
pub fn render_gif<C: Canvas>(body: &str, renderer: &mut RichRenderer<'_, C>) {
    let layout = match resolve_for_render(TagKind::Gif, body, renderer) {
        Ok(layout) => layout,
        Err(sentinel) => {
            renderer.skip(sentinel as f32);
            return;
        }
    };
    let height = layout.height_px() as f32;

    let Some(frames) = renderer.images().frames(&layout.name) else {
        let key = format!("frames:{}", layout.name);
        error_once(&key, ResourceError::MissingFrameSet { name: layout.name });
        renderer.skip(height);
        return;
    };

    let fps = layout
        .attributes
        .int_or(FPS, renderer.settings().default_gif_fps as i32);
    let delay = layout.attributes.int_or(DELAY, 0);
    let elapsed = renderer.elapsed().as_secs_f64();

    match (sheet(&layout, frames.len()), frames.first()) {
        (Some((columns, rows)), Some(texture)) => {
            let cells = (columns * rows) as usize;
            let index = frame_index(elapsed, fps, delay, cells).unwrap_or(0);
            renderer.place_texture(texture, height, sprite_uv(index, columns, rows));
        }
        _ => {
            let index = frame_index(elapsed, fps, delay, frames.len()).unwrap_or(0);
            match frames.get(index).or_else(|| frames.frames().last()) {
                Some(texture) => {
                    renderer.place_texture(texture, height, Rect::UNIT);
                }
                None => renderer.skip(height),
            }
        }
    }
}

fn sheet(layout: &ContainerLayout, frame_count: usize) -> Option<(u32, u32)> {
    if frame_count == 1 {
        layout.sheet_grid()
    } else {
        None
    }
}
