//! Report-once logging keyed by a stable string.
//!
//! Height computation and drawing run every frame, so a missing texture or a
//! malformed attribute would otherwise flood the log. Keys are namespaced by
//! the caller, e.g. `texture:icon` or `attribute:Gif:COLOR`.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::LazyLock;

static REPORTED: LazyLock<Mutex<HashSet<String>>> = LazyLock::new(|| Mutex::new(HashSet::new()));

/// Marks `key` as reported. Returns `true` the first time a key is seen.
fn first_report(key: &str) -> bool {
    let mut reported = REPORTED.lock();
    if reported.contains(key) {
        false
    } else {
        reported.insert(key.to_string())
    }
}

/// Emit an `error!` record for `key` unless one was already emitted.
pub fn error_once(key: &str, message: impl Display) {
    if first_report(key) {
        tracing::error!(key, "{message}");
    }
}

/// Emit a `warn!` record for `key` unless one was already emitted.
pub fn warn_once(key: &str, message: impl Display) {
    if first_report(key) {
        tracing::warn!(key, "{message}");
    }
}

/// Whether a record has been emitted for `key`.
pub fn has_reported(key: &str) -> bool {
    REPORTED.lock().contains(key)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
