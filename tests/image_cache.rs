//! Integration tests for the entry image cache: disk loading, downloads and
//! disposal.

use image::{ImageFormat, Rgba, RgbaImage};
use richlog::config::MarkupSettings;
use richlog::images::{DownloadStatus, ImageCache, ImageFetcher, ImageLookup, WebTexture};
use richlog::model::{EntryPaths, RemoteImageSpec, ResourceError};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    RgbaImage::from_pixel(width, height, Rgba([0, 128, 255, 255]))
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}

fn write(path: &Path, bytes: &[u8]) {
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(path, bytes).expect("write fixture");
}

/// Serves PNGs for URLs containing "ok" and fails everything else.
struct FakeFetcher;

impl ImageFetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ResourceError> {
        if url.contains("ok") {
            Ok(png(30, 15))
        } else {
            Err(ResourceError::Fetch {
                url: url.to_string(),
                reason: "404".to_string(),
            })
        }
    }
}

fn spec(name: &str, url: &str) -> RemoteImageSpec {
    RemoteImageSpec {
        name: name.to_string(),
        url: url.to_string(),
    }
}

#[test]
fn loads_local_and_animated_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let images = dir.path().join("Textures");
    let animated = dir.path().join("Animated");
    write(&images.join("logo.png"), &png(64, 32));
    write(&images.join("nested/badge.PNG"), &png(8, 8));
    write(&images.join("notes.txt"), b"not an image");
    write(&images.join("broken.png"), b"not a png either");
    write(&animated.join("spinner/b.png"), &png(4, 4));
    write(&animated.join("spinner/a.png"), &png(4, 2));

    let paths = EntryPaths {
        images_dir: Some(images),
        animated_dir: Some(animated),
    };
    let cache = ImageCache::open(&paths, &MarkupSettings::default());

    assert_eq!(cache.natural_size("logo"), Some((64, 32)));
    assert_eq!(cache.natural_size("badge"), Some((8, 8)));
    assert!(cache.local("notes").is_none());
    assert!(cache.local("broken").is_none());

    let frames = cache.frames("spinner").expect("animated group");
    let names: Vec<_> = frames.frames().iter().map(|t| t.name().to_string()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn downloads_run_in_order_and_failures_do_not_stop_the_batch() {
    let mut cache = ImageCache::new();
    cache.begin_remote_downloads(
        &[
            spec("first", "http://x.test/missing.png"),
            spec("second", "http://x.test/ok.png"),
        ],
        Arc::new(FakeFetcher),
    );

    // Registered synchronously, before the worker gets anywhere.
    assert!(cache.remote().get("first").is_some());
    assert!(cache.remote().get("second").is_some());

    cache.wait_for_downloads();

    assert_eq!(cache.remote().status("first"), Some(DownloadStatus::Failed));
    assert_eq!(cache.remote().status("second"), Some(DownloadStatus::Success));
    assert_eq!(cache.generation(), 2);
    assert!(matches!(cache.lookup("second"), ImageLookup::Ready(_)));
    assert_eq!(
        cache.lookup("first"),
        ImageLookup::Remote {
            status: DownloadStatus::Failed
        }
    );
}

#[test]
fn status_never_moves_backwards() {
    let slot = WebTexture::new("http://x.test/ok.png");
    assert_eq!(slot.status(), DownloadStatus::Pending);
    assert!(!slot.advance(DownloadStatus::InProgress, DownloadStatus::Success));
    assert!(slot.advance(DownloadStatus::Pending, DownloadStatus::InProgress));
    assert!(slot.fail());
    assert!(!slot.advance(DownloadStatus::Failed, DownloadStatus::InProgress));
    assert!(!slot.advance(DownloadStatus::Pending, DownloadStatus::InProgress));
    assert_eq!(slot.status(), DownloadStatus::Failed);
}

#[test]
fn placeholder_text_follows_status() {
    assert_eq!(
        WebTexture::status_text("shot", DownloadStatus::Pending, Duration::ZERO),
        "shot waiting to download"
    );
    assert!(WebTexture::status_text("shot", DownloadStatus::InProgress, Duration::ZERO)
        .starts_with("shot loading"));
    assert_eq!(
        WebTexture::status_text("shot", DownloadStatus::Failed, Duration::ZERO),
        "shot failed to load."
    );
}

#[test]
fn dispose_twice_leaves_cache_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(&dir.path().join("logo.png"), &png(2, 2));
    let paths = EntryPaths {
        images_dir: Some(dir.path().to_path_buf()),
        animated_dir: None,
    };
    let mut cache = ImageCache::open(&paths, &MarkupSettings::default());
    assert!(!cache.is_empty());

    assert_eq!(cache.dispose(), 1);
    assert!(cache.is_empty());
    assert_eq!(cache.dispose(), 0);
    assert!(cache.is_empty());
}
