//! Tests for report-once logging.

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Counts every event that reaches it.
struct CountingLayer {
    events: Arc<AtomicUsize>,
}

impl<S: Subscriber> Layer<S> for CountingLayer {
    fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.fetch_add(1, Ordering::SeqCst);
    }
}

fn count_events(f: impl FnOnce()) -> usize {
    let events = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(CountingLayer {
        events: Arc::clone(&events),
    });
    tracing::subscriber::with_default(subscriber, f);
    events.load(Ordering::SeqCst)
}

#[test]
fn error_once_emits_a_single_event_per_key() {
    let emitted = count_events(|| {
        error_once("test:error-once", "first");
        error_once("test:error-once", "second");
        error_once("test:error-once", "third");
    });
    assert_eq!(emitted, 1);
}

#[test]
fn distinct_keys_are_reported_separately() {
    let emitted = count_events(|| {
        warn_once("test:distinct-a", "a");
        warn_once("test:distinct-b", "b");
    });
    assert_eq!(emitted, 2);
}

#[test]
fn warn_and_error_share_the_key_space() {
    let emitted = count_events(|| {
        warn_once("test:shared", "warned");
        error_once("test:shared", "errored");
    });
    assert_eq!(emitted, 1);
}

#[test]
fn has_reported_tracks_emitted_keys() {
    assert!(!has_reported("test:never-emitted"));
    error_once("test:tracked", "tracked");
    assert!(has_reported("test:tracked"));
}
