//! `<img>` and `<gif>` bodies: `[attributes]>name`.
//!
//! Both tags share the sizing rule. Width defaults to the container width.
//! Without a `HEIGHT` the height follows the referenced image's natural
//! aspect ratio at that width, or equals the width when the size is unknown.
//! A declared `HEIGHT` is used as written.

use super::LayoutEnv;
use crate::images::{ImageLookup, WebTexture};
use crate::logging::error_once;
use crate::model::{AttributeError, AttributeType, Rect, ResourceError, StructuralError, TagKind};
use crate::parser::attributes::{DELAY, FPS, HEIGHT, SIZE, WIDTH};
use crate::parser::{AttributeLookup, AttributeSpec, AttributeValue, CustomAttributeHook};
use crate::view::{Canvas, RichRenderer};

/// Attributes `<img>` recognises.
pub const IMAGE_ATTRIBUTES: &[AttributeSpec] = &[AttributeSpec::int(WIDTH), AttributeSpec::int(HEIGHT)];

/// Attributes `<gif>` recognises directly. `FPS` and `DELAY` go through the
/// animated hook.
pub const GIF_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::int(WIDTH),
    AttributeSpec::int(HEIGHT),
    AttributeSpec::dimensions(SIZE),
];

fn animated_hook(name: &str, value: &str) -> Option<Result<AttributeValue, AttributeError>> {
    match name {
        FPS | DELAY => Some(AttributeValue::convert(name, value, AttributeType::Int)),
        _ => None,
    }
}

/// Resolved size and name of one container body.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerLayout {
    /// Referenced image or frame-set name.
    pub name: String,
    /// Resolved width.
    pub width: i32,
    /// Declared height, or the aspect-derived one.
    pub height: i32,
    /// Parsed bracket attributes.
    pub attributes: AttributeLookup,
}

impl ContainerLayout {
    /// Resolve `body` for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::MissingSeparator`] when the body has no `>`.
    pub fn resolve(kind: TagKind, body: &str, env: &LayoutEnv<'_>) -> Result<Self, StructuralError> {
        let parts: Vec<&str> = body.split('>').collect();
        if parts.len() < 2 {
            return Err(StructuralError::MissingSeparator {
                text: body.to_string(),
            });
        }

        let name = parts[1].split('<').next().unwrap_or_default().trim().to_string();
        let attributes = if parts[0].trim().is_empty() {
            AttributeLookup::default()
        } else {
            let (recognized, hook): (&[AttributeSpec], Option<CustomAttributeHook>) = match kind {
                TagKind::Gif => (GIF_ATTRIBUTES, Some(animated_hook)),
                _ => (IMAGE_ATTRIBUTES, None),
            };
            AttributeLookup::parse(parts[0], recognized, hook, kind)
        };

        let width = attributes.int_or(WIDTH, env.container_width());
        let height = match attributes.get(HEIGHT) {
            Some(AttributeValue::Int(declared)) => declared,
            _ => natural_aspect(kind, &name, &attributes, env)
                .map_or(width, |aspect| (aspect * width as f32).ceil() as i32),
        };

        Ok(Self {
            name,
            width,
            height,
            attributes,
        })
    }

    /// Height clamped to zero.
    pub fn height_px(&self) -> u32 {
        self.height.max(0) as u32
    }

    /// `(columns, rows)` of a sprite-sheet `SIZE`, if both are positive.
    pub fn sheet_grid(&self) -> Option<(u32, u32)> {
        match self.attributes.dimensions(SIZE)? {
            (columns, rows) if columns > 0 && rows > 0 => Some((columns as u32, rows as u32)),
            _ => None,
        }
    }
}

/// Height over width of what `name` draws, when known.
///
/// For a gif with `SIZE` over a single-texture frame set this is the aspect
/// of one sprite cell.
fn natural_aspect(kind: TagKind, name: &str, attributes: &AttributeLookup, env: &LayoutEnv<'_>) -> Option<f32> {
    let (width, height) = match kind {
        TagKind::Gif => {
            let frames = env.images.frames(name)?;
            let first = frames.first()?;
            let (mut width, mut height) = (first.width() as f32, first.height() as f32);
            if let (1, Some((columns, rows))) = (frames.len(), attributes.dimensions(SIZE)) {
                if columns > 0 && rows > 0 {
                    width /= columns as f32;
                    height /= rows as f32;
                }
            }
            (width, height)
        }
        _ => {
            let (width, height) = env.images.natural_size(name)?;
            (width as f32, height as f32)
        }
    };
    (width > 0.0).then(|| height / width)
}

/// Height of a container body. A body without `>` is logged once and
/// reserves the preview image height.
pub fn height(kind: TagKind, body: &str, env: &LayoutEnv<'_>) -> u32 {
    match ContainerLayout::resolve(kind, body, env) {
        Ok(layout) => layout.height_px(),
        Err(err) => {
            error_once(&format!("structure:{kind}:{body}"), err);
            env.settings.preview_image_height
        }
    }
}

/// Resolve a body against the renderer's environment, logging structural
/// errors. `Err` carries the sentinel height to skip.
pub(crate) fn resolve_for_render<C: Canvas>(
    kind: TagKind,
    body: &str,
    renderer: &RichRenderer<'_, C>,
) -> Result<ContainerLayout, u32> {
    let env = LayoutEnv::for_renderer(renderer);
    ContainerLayout::resolve(kind, body, &env).map_err(|err| {
        error_once(&format!("structure:{kind}:{body}"), err);
        env.settings.preview_image_height
    })
}

/// Draw an `<img>` body: the texture, a download placeholder, or nothing
/// when the name is unknown.
pub fn render_image<C: Canvas>(body: &str, renderer: &mut RichRenderer<'_, C>) {
    let layout = match resolve_for_render(TagKind::Image, body, renderer) {
        Ok(layout) => layout,
        Err(sentinel) => {
            renderer.skip(sentinel as f32);
            return;
        }
    };
    let height = layout.height_px() as f32;

    match renderer.images().lookup(&layout.name) {
        ImageLookup::Ready(texture) => {
            renderer.place_texture(&texture, height, Rect::UNIT);
        }
        ImageLookup::Remote { status } => {
            let message = WebTexture::status_text(&layout.name, status, renderer.elapsed());
            renderer.place_placeholder(layout.width.max(0) as f32, height, &message);
        }
        ImageLookup::Missing => {
            let key = format!("texture:{}", layout.name);
            error_once(&key, ResourceError::MissingImage { name: layout.name });
            renderer.skip(height);
        }
    }
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
