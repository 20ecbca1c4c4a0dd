//! Images read from an entry's directories on disk.

use super::texture::Texture;
use crate::config::MarkupSettings;
use crate::model::ResourceError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Ordered frames of one animated group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSet {
    frames: Vec<Texture>,
}

impl FrameSet {
    /// Frame set from already-decoded frames, in display order.
    pub fn new(frames: Vec<Texture>) -> Self {
        Self { frames }
    }

    /// Frames in display order.
    pub fn frames(&self) -> &[Texture] {
        &self.frames
    }

    /// Frame at `index`.
    pub fn get(&self, index: usize) -> Option<&Texture> {
        self.frames.get(index)
    }

    /// First frame, used for the natural aspect ratio.
    pub fn first(&self) -> Option<&Texture> {
        self.frames.first()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the group had no loadable frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

fn has_allowed_extension(path: &Path, settings: &MarkupSettings) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| settings.accepts_extension(ext))
}

/// Sorted entries of `dir`.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ResourceError> {
    let io_error = |source| ResourceError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        paths.push(entry.map_err(io_error)?.path());
    }
    paths.sort();
    Ok(paths)
}

/// Allow-listed image files under `dir`, recursively, in path order.
fn image_files(dir: &Path, settings: &MarkupSettings, recursive: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let entries = match sorted_entries(&current) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::error!(%err, "Skipping unreadable image directory");
                continue;
            }
        };
        for path in entries {
            if path.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if has_allowed_extension(&path, settings) {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

fn decode_logged(path: &Path) -> Option<Texture> {
    match Texture::load(path) {
        Ok(texture) => Some(texture),
        Err(err) => {
            tracing::error!(path = %path.display(), %err, "Unable to load image file");
            None
        }
    }
}

/// Load every allow-listed image under `dir`, keyed by file stem.
///
/// Files that fail to decode are logged and skipped. A missing directory
/// yields an empty map. Later paths (in sorted order) win on stem
/// collisions.
pub fn load_local(dir: &Path, settings: &MarkupSettings) -> HashMap<String, Texture> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "No image directory");
        return HashMap::new();
    }

    let mut textures = HashMap::new();
    for path in image_files(dir, settings, true) {
        if let Some(texture) = decode_logged(&path) {
            if let Some(previous) = textures.insert(texture.name().to_string(), texture) {
                tracing::warn!(name = previous.name(), path = %path.display(), "Duplicate image name");
            }
        }
    }
    tracing::info!(dir = %dir.display(), count = textures.len(), "Loaded local images");
    textures
}

/// Load each immediate subdirectory of `dir` as one animated group.
///
/// Frames are ordered lexicographically by file name.
pub fn load_animated_groups(dir: &Path, settings: &MarkupSettings) -> HashMap<String, FrameSet> {
    let groups = match sorted_entries(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(%err, "No animated image directory");
            return HashMap::new();
        }
    };

    let mut frame_sets = HashMap::new();
    for group_dir in groups.into_iter().filter(|p| p.is_dir()) {
        let Some(name) = group_dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let frames: Vec<Texture> = image_files(&group_dir, settings, false)
            .iter()
            .filter_map(|path| decode_logged(path))
            .collect();
        tracing::debug!(group = %name, frames = frames.len(), "Loaded animated group");
        frame_sets.insert(name, FrameSet::new(frames));
    }
    frame_sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::texture::fixtures::write_png;

    #[test]
    fn loads_recursively_and_filters_extensions() {
        let dir = tempfile::tempdir().expect("temp dir");
        write_png(&dir.path().join("icon.png"), 2, 2);
        write_png(&dir.path().join("nested/deeper/banner.PNG"), 4, 1);
        std::fs::write(dir.path().join("notes.txt"), "x").expect("write");
        std::fs::write(dir.path().join("anim.gif"), "x").expect("write");

        let textures = load_local(dir.path(), &MarkupSettings::default());

        let mut names: Vec<_> = textures.keys().cloned().collect();
        names.sort();
        assert_eq!(names, vec!["banner", "icon"]);
        assert_eq!(textures["banner"].width(), 4);
    }

    #[test]
    fn corrupt_file_is_skipped() {
        let dir = tempfile::tempdir().expect("temp dir");
        write_png(&dir.path().join("good.png"), 1, 1);
        std::fs::write(dir.path().join("bad.png"), b"garbage").expect("write");

        let textures = load_local(dir.path(), &MarkupSettings::default());

        assert!(textures.contains_key("good"));
        assert!(!textures.contains_key("bad"));
    }

    #[test]
    fn missing_directory_is_empty() {
        let settings = MarkupSettings::default();
        assert!(load_local(Path::new("/nonexistent/richlog"), &settings).is_empty());
        assert!(load_animated_groups(Path::new("/nonexistent/richlog"), &settings).is_empty());
    }

    #[test]
    fn animated_frames_are_sorted_by_file_name() {
        let dir = tempfile::tempdir().expect("temp dir");
        let spin = dir.path().join("spin");
        write_png(&spin.join("frame_10.png"), 3, 3);
        write_png(&spin.join("frame_02.png"), 2, 2);
        write_png(&spin.join("frame_01.png"), 1, 1);
        write_png(&dir.path().join("loose.png"), 1, 1);

        let groups = load_animated_groups(dir.path(), &MarkupSettings::default());

        assert_eq!(groups.len(), 1);
        let widths: Vec<_> = groups["spin"].frames().iter().map(|f| f.width()).collect();
        assert_eq!(widths, vec![1, 2, 3]);
    }
}
