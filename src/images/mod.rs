//! Texture cache for one changelog entry.
//!
//! An [`ImageCache`] is opened when an entry becomes active and disposed when
//! it is closed or replaced. It holds three kinds of resources:
//!
//! - local images, loaded eagerly and keyed by file stem
//! - animated groups, one [`FrameSet`] per subdirectory
//! - remote images, downloaded in the background by [`remote`]

pub mod fetch;
pub mod local;
pub mod remote;
pub mod texture;

pub use fetch::{HttpFetcher, ImageFetcher};
pub use local::{load_animated_groups, load_local, FrameSet};
pub use remote::{spawn_downloads, DownloadStatus, RemoteImages, WebTexture};
pub use texture::{Texture, TextureId};

use crate::config::MarkupSettings;
use crate::model::{EntryPaths, RemoteImageSpec};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Where a texture lookup found its image.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageLookup {
    /// Local or downloaded texture, ready to draw.
    Ready(Texture),
    /// Remote image that is not (yet) available.
    Remote {
        /// Current download status.
        status: DownloadStatus,
    },
    /// No image of that name.
    Missing,
}

/// Every texture owned by one entry.
#[derive(Debug, Default)]
pub struct ImageCache {
    local: HashMap<String, Texture>,
    animated: HashMap<String, FrameSet>,
    remote: Arc<RemoteImages>,
    worker: Option<JoinHandle<()>>,
}

impl ImageCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the entry's local and animated directories.
    pub fn open(paths: &EntryPaths, settings: &MarkupSettings) -> Self {
        let mut cache = Self::new();
        if let Some(dir) = &paths.images_dir {
            cache.local = load_local(dir, settings);
        }
        if let Some(dir) = &paths.animated_dir {
            cache.animated = load_animated_groups(dir, settings);
        }
        cache
    }

    /// Insert a local texture, replacing any texture of the same name.
    pub fn insert_local(&mut self, name: impl Into<String>, texture: Texture) {
        self.local.insert(name.into(), texture);
    }

    /// Insert an animated group.
    pub fn insert_frames(&mut self, name: impl Into<String>, frames: FrameSet) {
        self.animated.insert(name.into(), frames);
    }

    /// Register remote images as pending and start downloading them in order
    /// on a background thread.
    ///
    /// A batch that is still running is joined first, so an entry never has
    /// two fetches in flight.
    pub fn begin_remote_downloads(&mut self, images: &[RemoteImageSpec], fetcher: Arc<dyn ImageFetcher>) {
        if self.downloads_running() {
            tracing::debug!("Waiting for previous download batch");
        }
        self.wait_for_downloads();
        self.worker = spawn_downloads(&self.remote, images, fetcher);
    }

    /// Local texture by name.
    pub fn local(&self, name: &str) -> Option<&Texture> {
        self.local.get(name)
    }

    /// Animated group by name.
    pub fn frames(&self, name: &str) -> Option<&FrameSet> {
        self.animated.get(name)
    }

    /// Remote image set.
    pub fn remote(&self) -> &RemoteImages {
        &self.remote
    }

    /// Texture for an `<img>` name: local first, then remote.
    pub fn lookup(&self, name: &str) -> ImageLookup {
        if let Some(texture) = self.local.get(name) {
            return ImageLookup::Ready(texture.clone());
        }
        match self.remote.get(name) {
            Some(slot) => match slot.texture() {
                Some(texture) => ImageLookup::Ready(texture.clone()),
                None => ImageLookup::Remote {
                    status: slot.status(),
                },
            },
            None => ImageLookup::Missing,
        }
    }

    /// Natural pixel size of the image `name`, if one is known.
    ///
    /// Local images, successfully downloaded images and the first frame of
    /// an animated group all count.
    pub fn natural_size(&self, name: &str) -> Option<(u32, u32)> {
        let size = |t: &Texture| (t.width(), t.height());
        if let Some(texture) = self.local.get(name) {
            return Some(size(texture));
        }
        if let Some(texture) = self.remote.texture(name) {
            return Some(size(&texture));
        }
        self.animated.get(name)?.first().map(size)
    }

    /// Changes whenever a remote download finishes, so cached layout that
    /// depends on natural sizes can be invalidated.
    pub fn generation(&self) -> u64 {
        self.remote.generation()
    }

    /// Whether the background worker is still downloading.
    pub fn downloads_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// Wait for the current download batch to finish. After [`dispose`]
    /// this only reaps the worker; anything it wrote is already unreachable.
    ///
    /// [`dispose`]: ImageCache::dispose
    pub fn wait_for_downloads(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("Download worker panicked");
            }
        }
    }

    /// Number of local textures plus animated frames plus remote slots.
    pub fn len(&self) -> usize {
        self.local.len()
            + self.animated.values().map(FrameSet::len).sum::<usize>()
            + self.remote.len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release every texture. Safe to call repeatedly; returns the number of
    /// textures released by this call.
    ///
    /// An in-flight download is not waited for. It finishes into a slot that
    /// is no longer reachable from the cache, and the worker stops before
    /// the next one. The worker handle is kept for [`wait_for_downloads`].
    ///
    /// [`wait_for_downloads`]: ImageCache::wait_for_downloads
    pub fn dispose(&mut self) -> usize {
        let local = self.local.len();
        let frames: usize = self.animated.values().map(FrameSet::len).sum();
        let remote = self.remote.clear();
        self.remote = Arc::new(RemoteImages::new());
        self.local.clear();
        self.animated.clear();
        let released = local + frames + remote;
        if released > 0 {
            tracing::debug!(local, frames, remote, "Disposed image cache");
        }
        released
    }
}
