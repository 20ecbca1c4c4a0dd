//! Remote images downloaded on a background thread.
//!
//! Each image moves through `Pending -> InProgress -> {Success, Failed}`.
//! The render thread polls [`WebTexture::status`] every frame and never
//! blocks. The worker stores the decoded texture before flipping the status
//! to `Success`, so a reader that observes `Success` always finds the
//! texture.

use super::fetch::ImageFetcher;
use super::texture::Texture;
use crate::model::RemoteImageSpec;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::JoinHandle;
use std::time::Duration;

/// Download state of one remote image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum DownloadStatus {
    /// Registered, worker has not reached it yet.
    Pending,
    /// Request in flight.
    InProgress,
    /// Texture available.
    Success,
    /// Network or decode failure. Terminal.
    Failed,
}

impl DownloadStatus {
    fn to_u8(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::InProgress => 1,
            Self::Success => 2,
            Self::Failed => 3,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Pending,
            1 => Self::InProgress,
            2 => Self::Success,
            _ => Self::Failed,
        }
    }

    /// Whether no further transition can happen.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    /// Whether `self -> next` is a legal forward step.
    pub fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::InProgress, Self::Success)
                | (Self::InProgress, Self::Failed)
        )
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::InProgress => "in progress",
            Self::Success => "success",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// One remote image slot shared between the worker and the render thread.
pub struct WebTexture {
    url: String,
    status: AtomicU8,
    texture: OnceLock<Texture>,
}

impl WebTexture {
    /// New pending slot.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: AtomicU8::new(DownloadStatus::Pending.to_u8()),
            texture: OnceLock::new(),
        }
    }

    /// Source URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current status.
    pub fn status(&self) -> DownloadStatus {
        DownloadStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Texture, once the status is `Success`.
    pub fn texture(&self) -> Option<&Texture> {
        match self.status() {
            DownloadStatus::Success => self.texture.get(),
            _ => None,
        }
    }

    /// Move from `from` to `to`. Returns `false` (and changes nothing) if the
    /// slot is not in `from` or the step is not forward.
    pub fn advance(&self, from: DownloadStatus, to: DownloadStatus) -> bool {
        from.can_advance_to(to)
            && self
                .status
                .compare_exchange(from.to_u8(), to.to_u8(), Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
    }

    /// Store the decoded texture and mark the slot `Success`.
    pub fn complete(&self, texture: Texture) -> bool {
        if self.status() != DownloadStatus::InProgress {
            return false;
        }
        if self.texture.set(texture).is_err() {
            return false;
        }
        self.advance(DownloadStatus::InProgress, DownloadStatus::Success)
    }

    /// Mark the slot `Failed`.
    pub fn fail(&self) -> bool {
        self.advance(DownloadStatus::InProgress, DownloadStatus::Failed)
    }

    /// Human-readable status line shown in place of the image.
    ///
    /// The in-progress message carries an ellipsis that grows by one dot per
    /// second of `elapsed`, cycling through one to three dots.
    pub fn status_text(key: &str, status: DownloadStatus, elapsed: Duration) -> String {
        match status {
            DownloadStatus::Pending => format!("{key} waiting to download"),
            DownloadStatus::InProgress => {
                let dots = (elapsed.as_secs() % 3) as usize + 1;
                format!("{key} loading{}", ".".repeat(dots))
            }
            DownloadStatus::Success => format!("{key} successfully loaded."),
            DownloadStatus::Failed => format!("{key} failed to load."),
        }
    }
}

impl fmt::Debug for WebTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebTexture")
            .field("url", &self.url)
            .field("status", &self.status())
            .finish()
    }
}

/// Remote images of one entry, keyed by logical name.
#[derive(Default)]
pub struct RemoteImages {
    slots: RwLock<HashMap<String, Arc<WebTexture>>>,
    generation: AtomicU64,
    disposed: AtomicBool,
}

impl RemoteImages {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pending slot per spec, replacing earlier slots with the
    /// same name. Returns the slots in registration order.
    pub fn register(&self, specs: &[RemoteImageSpec]) -> Vec<(String, Arc<WebTexture>)> {
        let mut slots = self.slots.write();
        specs
            .iter()
            .map(|spec| {
                let slot = Arc::new(WebTexture::new(spec.url.clone()));
                slots.insert(spec.name.clone(), Arc::clone(&slot));
                (spec.name.clone(), slot)
            })
            .collect()
    }

    /// Slot for `name`.
    pub fn get(&self, name: &str) -> Option<Arc<WebTexture>> {
        self.slots.read().get(name).cloned()
    }

    /// Status for `name`.
    pub fn status(&self, name: &str) -> Option<DownloadStatus> {
        self.slots.read().get(name).map(|slot| slot.status())
    }

    /// Downloaded texture for `name`, if it finished successfully.
    pub fn texture(&self, name: &str) -> Option<Texture> {
        self.slots.read().get(name)?.texture().cloned()
    }

    /// Number of registered slots.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Whether no slots are registered.
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Bumped every time a download reaches a terminal state.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Whether [`RemoteImages::clear`] has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Drop every slot. Returns the number of downloaded textures released.
    pub fn clear(&self) -> usize {
        self.disposed.store(true, Ordering::Release);
        let mut slots = self.slots.write();
        let released = slots.values().filter(|slot| slot.texture().is_some()).count();
        slots.clear();
        released
    }

    /// Fetch and decode each slot in order, one at a time.
    ///
    /// A failure marks that slot `Failed` and moves on. Stops early if the
    /// set has been cleared.
    pub fn download_all(&self, queue: &[(String, Arc<WebTexture>)], fetcher: &dyn ImageFetcher) {
        for (name, slot) in queue {
            if self.is_disposed() {
                tracing::debug!(remaining = queue.len(), "Remote images disposed, stopping downloads");
                break;
            }
            if !slot.advance(DownloadStatus::Pending, DownloadStatus::InProgress) {
                continue;
            }

            let result = fetcher
                .fetch(slot.url())
                .and_then(|bytes| Texture::decode(name.clone(), &bytes));
            match result {
                Ok(texture) => {
                    tracing::info!(name = %name, url = %slot.url(), "Downloaded remote image");
                    slot.complete(texture);
                }
                Err(err) => {
                    tracing::error!(name = %name, url = %slot.url(), %err, "Remote image failed");
                    slot.fail();
                }
            }
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
    }
}

impl fmt::Debug for RemoteImages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteImages")
            .field("len", &self.len())
            .field("generation", &self.generation())
            .finish()
    }
}

/// Register `specs` as pending and start the sequential download worker.
///
/// Returns `None` when there is nothing to download.
pub fn spawn_downloads(
    remote: &Arc<RemoteImages>,
    specs: &[RemoteImageSpec],
    fetcher: Arc<dyn ImageFetcher>,
) -> Option<JoinHandle<()>> {
    let queue = remote.register(specs);
    if queue.is_empty() {
        return None;
    }

    let remote = Arc::clone(remote);
    let spawned = std::thread::Builder::new()
        .name("richlog-downloads".to_string())
        .spawn(move || remote.download_all(&queue, fetcher.as_ref()));

    match spawned {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::error!(%err, "Failed to start download worker");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::texture::fixtures::png_bytes;
    use crate::model::ResourceError;
    use parking_lot::Mutex;

    /// Serves canned bodies and records request order.
    struct CannedFetcher {
        bodies: HashMap<String, Vec<u8>>,
        requests: Mutex<Vec<String>>,
    }

    impl CannedFetcher {
        fn new(bodies: &[(&str, Vec<u8>)]) -> Self {
            Self {
                bodies: bodies
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.clone()))
                    .collect(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl ImageFetcher for CannedFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, ResourceError> {
            self.requests.lock().push(url.to_string());
            self.bodies.get(url).cloned().ok_or_else(|| ResourceError::Fetch {
                url: url.to_string(),
                reason: "404".to_string(),
            })
        }
    }

    fn spec(name: &str, url: &str) -> RemoteImageSpec {
        RemoteImageSpec {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn transitions_only_move_forward() {
        let slot = WebTexture::new("u");
        assert!(!slot.advance(DownloadStatus::Pending, DownloadStatus::Success));
        assert!(slot.advance(DownloadStatus::Pending, DownloadStatus::InProgress));
        assert!(!slot.advance(DownloadStatus::Pending, DownloadStatus::InProgress));
        assert!(slot.fail());
        assert!(!slot.advance(DownloadStatus::Failed, DownloadStatus::InProgress));
        assert!(!slot.complete(Texture::decode("x", &png_bytes(1, 1)).expect("png")));
        assert_eq!(slot.status(), DownloadStatus::Failed);
    }

    #[test]
    fn texture_is_hidden_until_success() {
        let slot = WebTexture::new("u");
        assert!(slot.texture().is_none());
        slot.advance(DownloadStatus::Pending, DownloadStatus::InProgress);
        assert!(slot.complete(Texture::decode("x", &png_bytes(2, 1)).expect("png")));
        assert_eq!(slot.texture().map(|t| t.width()), Some(2));
    }

    #[test]
    fn status_text_matches_each_state() {
        let key = "banner";
        let zero = Duration::ZERO;
        assert_eq!(
            WebTexture::status_text(key, DownloadStatus::Pending, zero),
            "banner waiting to download"
        );
        assert_eq!(
            WebTexture::status_text(key, DownloadStatus::InProgress, zero),
            "banner loading."
        );
        assert_eq!(
            WebTexture::status_text(key, DownloadStatus::InProgress, Duration::from_secs(2)),
            "banner loading..."
        );
        assert_eq!(
            WebTexture::status_text(key, DownloadStatus::Success, zero),
            "banner successfully loaded."
        );
        assert_eq!(
            WebTexture::status_text(key, DownloadStatus::Failed, zero),
            "banner failed to load."
        );
    }

    #[test]
    fn downloads_run_in_order_and_failures_do_not_stop_the_batch() {
        let remote = RemoteImages::new();
        let queue = remote.register(&[
            spec("a", "http://x.test/a.png"),
            spec("b", "http://x.test/missing.png"),
            spec("c", "http://x.test/c.png"),
        ]);
        assert!(queue.iter().all(|(_, s)| s.status() == DownloadStatus::Pending));

        let fetcher = CannedFetcher::new(&[
            ("http://x.test/a.png", png_bytes(4, 2)),
            ("http://x.test/c.png", b"not a png".to_vec()),
        ]);
        remote.download_all(&queue, &fetcher);

        assert_eq!(
            *fetcher.requests.lock(),
            vec![
                "http://x.test/a.png".to_string(),
                "http://x.test/missing.png".to_string(),
                "http://x.test/c.png".to_string(),
            ]
        );
        assert_eq!(remote.status("a"), Some(DownloadStatus::Success));
        assert_eq!(remote.status("b"), Some(DownloadStatus::Failed));
        assert_eq!(remote.status("c"), Some(DownloadStatus::Failed));
        assert_eq!(remote.texture("a").map(|t| t.height()), Some(2));
        assert_eq!(remote.generation(), 3);
    }

    #[test]
    fn clear_stops_remaining_downloads() {
        let remote = RemoteImages::new();
        let queue = remote.register(&[spec("a", "http://x.test/a.png")]);
        assert_eq!(remote.clear(), 0);
        remote.download_all(&queue, &CannedFetcher::new(&[]));
        assert_eq!(queue[0].1.status(), DownloadStatus::Pending);
        assert!(remote.is_empty());
    }

    #[test]
    fn spawned_worker_finishes_batch() {
        let remote = Arc::new(RemoteImages::new());
        let fetcher = Arc::new(CannedFetcher::new(&[("http://x.test/a.png", png_bytes(1, 1))]));
        let handle = spawn_downloads(&remote, &[spec("a", "http://x.test/a.png")], fetcher)
            .expect("worker starts");
        handle.join().expect("worker joins");
        assert_eq!(remote.status("a"), Some(DownloadStatus::Success));
    }

    #[test]
    fn nothing_to_download_spawns_nothing() {
        let remote = Arc::new(RemoteImages::new());
        assert!(spawn_downloads(&remote, &[], Arc::new(CannedFetcher::new(&[]))).is_none());
    }
}
