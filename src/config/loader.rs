//! Settings resolution: defaults, then the TOML file, then the
//! environment, then command-line flags. Later sources win.

use crate::model::Color;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "RICHLOG_CONFIG";

/// Environment variable overriding the layout column width.
pub const COLUMN_WIDTH_ENV_VAR: &str = "RICHLOG_COLUMN_WIDTH";

/// A config file that exists but cannot be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file is present but unreadable.
    #[error("cannot read config {}: {reason}", path.display())]
    Read {
        /// Offending file.
        path: PathBuf,
        /// I/O error text.
        reason: String,
    },

    /// The file is not valid TOML, or names an unknown key.
    #[error("bad config {}: {reason}", path.display())]
    Toml {
        /// Offending file.
        path: PathBuf,
        /// Deserializer message, including line and column.
        reason: String,
    },
}

/// Contents of `config.toml`. Absent keys keep their [`MarkupSettings`] default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Width of the layout column.
    #[serde(default)]
    pub column_width: Option<f32>,

    /// Height returned for container tags whose body cannot be split.
    #[serde(default)]
    pub preview_image_height: Option<u32>,

    /// Extra height below titles.
    #[serde(default)]
    pub title_padding: Option<u32>,

    /// Frames per second for `<gif>` tags without `FPS=`.
    #[serde(default)]
    pub default_gif_fps: Option<u32>,

    /// Hyperlink text colour, `#RRGGBB`.
    #[serde(default)]
    pub link_color: Option<String>,

    /// Hovered hyperlink text colour, `#RRGGBB`.
    #[serde(default)]
    pub link_hover_color: Option<String>,

    /// File extensions loaded into the local image cache.
    #[serde(default)]
    pub image_extensions: Option<Vec<String>>,

    /// Per-request timeout for remote images, in seconds.
    #[serde(default)]
    pub download_timeout_secs: Option<u64>,

    /// Largest accepted remote image body, in bytes.
    #[serde(default)]
    pub max_download_bytes: Option<u64>,

    /// `User-Agent` header for remote image requests.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Where tracing output goes.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Settings the markup engine runs with, after every override is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupSettings {
    /// Width of the layout column; also the default container width.
    pub column_width: f32,
    /// Sentinel height for structurally broken container tags.
    pub preview_image_height: u32,
    /// Extra height below titles.
    pub title_padding: u32,
    /// Default frames per second for animated tags.
    pub default_gif_fps: u32,
    /// Hyperlink text colour.
    pub link_color: Color,
    /// Hovered hyperlink text colour.
    pub link_hover_color: Color,
    /// Lowercase extensions (without dot) accepted by the local image loader.
    pub image_extensions: Vec<String>,
    /// Per-request timeout for remote images.
    pub download_timeout: Duration,
    /// Largest accepted remote image body.
    pub max_download_bytes: u64,
    /// `User-Agent` header for remote image requests.
    pub user_agent: String,
    /// Where tracing output goes.
    pub log_file_path: PathBuf,
}

/// Default hyperlink colour.
pub const DEFAULT_LINK_COLOR: Color = Color::rgb(0x99, 0xD9, 0xEA);

/// Default hovered hyperlink colour.
pub const DEFAULT_LINK_HOVER_COLOR: Color = Color::rgb(0x4D, 0xB3, 0xE6);

impl Default for MarkupSettings {
    fn default() -> Self {
        Self {
            column_width: 700.0,
            preview_image_height: 200,
            title_padding: 4,
            default_gif_fps: 30,
            link_color: DEFAULT_LINK_COLOR,
            link_hover_color: DEFAULT_LINK_HOVER_COLOR,
            image_extensions: vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
            download_timeout: Duration::from_secs(30),
            max_download_bytes: 16 * 1024 * 1024,
            user_agent: "richlog".to_string(),
            log_file_path: default_log_path(),
        }
    }
}

impl MarkupSettings {
    /// Whether `extension` (any case, no dot) is on the allow-list.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.image_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }
}

/// `richlog/richlog.log` under the platform state directory, or the working
/// directory where there is none (macOS, Windows).
pub fn default_log_path() -> PathBuf {
    dirs::state_dir()
        .map(|dir| dir.join("richlog"))
        .unwrap_or_default()
        .join("richlog.log")
}

/// Read and deserialize `path`. A missing file is `Ok(None)`.
///
/// # Errors
///
/// [`ConfigError::Read`] or [`ConfigError::Toml`] when the file exists but
/// cannot be used.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|err| ConfigError::Read {
        path: path.clone(),
        reason: err.to_string(),
    })?;
    toml::from_str(&contents)
        .map(Some)
        .map_err(|err| ConfigError::Toml {
            path,
            reason: err.to_string(),
        })
}

/// `richlog/config.toml` under the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("richlog").join("config.toml"))
}

/// Find and load the config file. Only the first candidate is consulted:
/// `explicit` (from `--config`), then `RICHLOG_CONFIG`, then
/// [`default_config_path`].
///
/// # Errors
///
/// Same as [`load_config_file`] for the chosen candidate.
pub fn load_config_with_precedence(
    explicit: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    let candidate = explicit
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
        .or_else(default_config_path);
    match candidate {
        Some(path) => load_config_file(path),
        None => Ok(None),
    }
}

/// Parse a configured colour, falling back to `default` with a warning.
fn resolve_color(field: &str, raw: Option<String>, default: Color) -> Color {
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|err| {
            tracing::warn!(field, %err, "Ignoring invalid colour, using default");
            default
        }),
    }
}

/// Overlay a loaded file onto [`MarkupSettings::default`]. Out-of-range
/// widths and frame rates keep the default.
pub fn merge_config(file: Option<ConfigFile>) -> MarkupSettings {
    let defaults = MarkupSettings::default();
    let Some(config) = file else {
        return defaults;
    };

    MarkupSettings {
        column_width: config
            .column_width
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(defaults.column_width),
        preview_image_height: config
            .preview_image_height
            .unwrap_or(defaults.preview_image_height),
        title_padding: config.title_padding.unwrap_or(defaults.title_padding),
        default_gif_fps: config
            .default_gif_fps
            .filter(|fps| *fps > 0)
            .unwrap_or(defaults.default_gif_fps),
        link_color: resolve_color("link_color", config.link_color, defaults.link_color),
        link_hover_color: resolve_color(
            "link_hover_color",
            config.link_hover_color,
            defaults.link_hover_color,
        ),
        image_extensions: config
            .image_extensions
            .map(|exts| {
                exts.into_iter()
                    .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                    .collect()
            })
            .unwrap_or(defaults.image_extensions),
        download_timeout: config
            .download_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.download_timeout),
        max_download_bytes: config
            .max_download_bytes
            .unwrap_or(defaults.max_download_bytes),
        user_agent: config.user_agent.unwrap_or(defaults.user_agent),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// `RICHLOG_COLUMN_WIDTH`, when it holds a positive number.
pub fn apply_env_overrides(mut config: MarkupSettings) -> MarkupSettings {
    if let Ok(raw) = std::env::var(COLUMN_WIDTH_ENV_VAR) {
        match raw.trim().parse::<f32>() {
            Ok(width) if width.is_finite() && width > 0.0 => config.column_width = width,
            _ => tracing::warn!(value = %raw, "Ignoring invalid {COLUMN_WIDTH_ENV_VAR}"),
        }
    }

    config
}

/// Command-line flags; `None` leaves the setting alone.
pub fn apply_cli_overrides(mut config: MarkupSettings, width_override: Option<f32>) -> MarkupSettings {
    if let Some(width) = width_override.filter(|w| w.is_finite() && *w > 0.0) {
        config.column_width = width;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
