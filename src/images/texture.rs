//! Decoded image handles.

use crate::model::{ResourceError, Vec2};
use image::RgbaImage;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a decoded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u64);

impl TextureId {
    fn next() -> Self {
        Self(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tex#{}", self.0)
    }
}

/// Decoded RGBA pixels with a process-unique id.
///
/// Cloning shares the pixel buffer. Canvases that upload pixels to the GPU
/// key their uploads by [`Texture::id`].
#[derive(Clone)]
pub struct Texture {
    id: TextureId,
    name: String,
    pixels: Arc<RgbaImage>,
}

impl Texture {
    /// Wrap already-decoded pixels.
    pub fn new(name: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            id: TextureId::next(),
            name: name.into(),
            pixels: Arc::new(pixels),
        }
    }

    /// Decode an encoded image (PNG, JPEG, ...).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Decode`] if the format is unknown or the data
    /// is corrupt.
    pub fn decode(name: impl Into<String>, bytes: &[u8]) -> Result<Self, ResourceError> {
        let name = name.into();
        let decoded = image::load_from_memory(bytes).map_err(|source| ResourceError::Decode {
            name: name.clone(),
            source,
        })?;
        Ok(Self::new(name, decoded.to_rgba8()))
    }

    /// Read and decode a file. The texture is named after the file stem.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Io`] if the file cannot be read or
    /// [`ResourceError::Decode`] if it is not a decodable image.
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let bytes = std::fs::read(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let decoded = image::load_from_memory(&bytes).map_err(|source| ResourceError::Decode {
            name: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(name, decoded.to_rgba8()))
    }

    /// Process-unique id.
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Cache key or source name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    /// Decoded pixels.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = Texture::new("a", solid(1, 1));
        let b = Texture::new("a", solid(1, 1));
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn decode_reads_png_dimensions() {
        let texture = Texture::decode("remote", &png_bytes(20, 10)).expect("decodes");
        assert_eq!((texture.width(), texture.height()), (20, 10));
        assert_eq!(texture.name(), "remote");
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = Texture::decode("junk", b"not an image").expect_err("garbage");
        assert!(matches!(err, ResourceError::Decode { .. }));
    }

    #[test]
    fn load_names_texture_after_file_stem() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("banner.png");
        write_png(&path, 4, 2);
        let texture = Texture::load(&path).expect("loads");
        assert_eq!(texture.name(), "banner");
        assert_eq!(texture.size(), Vec2::new(4.0, 2.0));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Texture::load(Path::new("/nonexistent/richlog.png")).expect_err("missing");
        assert!(matches!(err, ResourceError::Io { .. }));
    }
}
