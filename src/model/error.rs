//! Error types for richlog.
//!
//! This module defines the error taxonomy using `thiserror`. Almost every
//! variant here is **non-fatal**: the segment, attribute and resource layers
//! turn them into a deduplicated log record and carry on with a fallback
//! value, so one malformed tag never aborts parsing or rendering of the rest
//! of a description.
//!
//! # Error Hierarchy
//!
//! - [`AttributeError`] - a `KEY=value` token inside a container tag could not be used
//! - [`StyleParseError`] - a `<font>` / `<anchor>` body names no known variant
//! - [`StructuralError`] - a tag body does not have the shape its handler expects
//! - [`ResourceError`] - an image, frame set or download is unavailable
//! - [`AppError`] - failures of the preview binary (config, logging, I/O); the
//!   only errors that ever propagate out of `main`

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Value type declared for a recognised container attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    /// Signed integer, e.g. `WIDTH=320`.
    Int,
    /// Dimension pair, e.g. `SIZE=(4,2)` or `SIZE=4x2`.
    Dimensions,
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int => f.write_str("integer"),
            Self::Dimensions => f.write_str("dimension pair"),
        }
    }
}

/// A single bracket attribute token that could not be applied.
///
/// **Recovery**: log once, keep the attribute's default, continue with the
/// remaining tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// Token has no `=` between name and value.
    #[error("attribute token {token:?} is missing '='")]
    MissingSeparator {
        /// The raw whitespace-delimited token.
        token: String,
    },

    /// Value could not be converted to the declared type.
    #[error("attribute {name} has value {value:?} which is not a valid {expected}")]
    InvalidValue {
        /// Uppercased attribute name.
        name: String,
        /// Raw value after quote trimming.
        value: String,
        /// Declared type.
        expected: AttributeType,
    },

    /// Name is neither recognised nor absorbed by the tag's custom hook.
    #[error("attribute {name} is not valid for {tag} segments")]
    Unrecognized {
        /// Attribute name as written.
        name: String,
        /// Tag kind name, for the message.
        tag: &'static str,
    },
}

/// Body of a `<font>` or `<anchor>` tag that names no known variant.
///
/// **Recovery**: log once, leave the current font / anchor unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleParseError {
    /// Unknown font size name.
    #[error("unknown font {0:?}")]
    UnknownFont(String),

    /// Unknown anchor name.
    #[error("unknown text anchor {0:?}")]
    UnknownAnchor(String),
}

/// A tag body that does not split into the parts its handler expects.
///
/// **Recovery**: log once, return the sentinel preview height.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// Container body without the `>` separating attributes from the name.
    #[error("container body {text:?} has no '>' separator")]
    MissingSeparator {
        /// The full tag body.
        text: String,
    },
}

/// Image resources that could not be loaded or found.
///
/// **Recovery**: log once per key; rendering draws nothing (local) or a
/// status placeholder (remote).
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Reading a file or directory failed.
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Bytes were read but are not a decodable image.
    #[error("unable to decode {name} into a texture: {source}")]
    Decode {
        /// File path or URL the bytes came from.
        name: String,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },

    /// HTTP request or body read failed.
    #[error("failed to download {url}: {reason}")]
    Fetch {
        /// Requested URL.
        url: String,
        /// Transport or status error text.
        reason: String,
    },

    /// `<img>` references a name not present in the entry's cache.
    #[error("failed to retrieve cached texture for {name}")]
    MissingImage {
        /// Referenced cache key.
        name: String,
    },

    /// `<gif>` references a frame set not present in the entry's cache.
    #[error("failed to retrieve animated frames for {name}")]
    MissingFrameSet {
        /// Referenced group name.
        name: String,
    },
}

/// Top-level error of the preview binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Config file exists but could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Reading the description file or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output could not be produced.
    #[error("failed to serialise output: {0}")]
    Json(#[from] serde_json::Error),
}
