//! richlog - preview a changelog description from the command line

use clap::{Parser, ValueEnum};
use richlog::config::MarkupSettings;
use richlog::images::ImageCache;
use richlog::model::{AppError, DescriptionData, EntryPaths, EntryRecord};
use richlog::parser::pattern_display::{colorize, to_ansi};
use richlog::parser::{ensure_trailing_newline, SegmentParser, TagRegistry};
use richlog::segments::LayoutEnv;
use richlog::view::MonospaceMeasurer;
use richlog::view_state::DocumentLayout;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Output format for the segment listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per segment, then the total.
    Text,
    /// A single JSON document.
    Json,
}

/// richlog - parse and lay out a changelog description
#[derive(Parser, Debug)]
#[command(name = "richlog")]
#[command(version)]
#[command(about = "Parse a changelog description and print its segments and layout heights")]
pub struct Args {
    /// Path to the description file
    pub file: PathBuf,

    /// Column width in pixels (overrides config and environment)
    #[arg(short, long)]
    pub width: Option<f32>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory of still images, searched recursively
    #[arg(long)]
    pub images: Option<PathBuf>,

    /// Directory whose subdirectories are animated frame groups
    #[arg(long)]
    pub gifs: Option<PathBuf>,

    /// Treat `[` and `]` as `<` and `>`
    #[arg(long)]
    pub brackets: bool,

    /// Print the compiled tag pattern before the listing
    #[arg(long)]
    pub show_pattern: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Serialize)]
struct SegmentRow<'a> {
    #[serde(flatten)]
    segment: &'a DescriptionData,
    height: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    column_width: f32,
    segments: Vec<SegmentRow<'a>>,
    bottom_padding: usize,
    total_height: usize,
}

fn resolve_settings(args: &Args) -> Result<MarkupSettings, AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config_file = richlog::config::load_config_with_precedence(args.config.clone())?;
    let merged = richlog::config::merge_config(config_file);
    let with_env = richlog::config::apply_env_overrides(merged);
    Ok(richlog::config::apply_cli_overrides(with_env, args.width))
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let settings = resolve_settings(&args)?;

    richlog::logging::init(&settings.log_file_path)?;
    info!(settings = ?settings, "Configuration loaded and resolved");

    let text = std::fs::read_to_string(&args.file)?;
    let raw = if args.brackets {
        EntryRecord {
            description: text,
            ..EntryRecord::default()
        }
        .enhanced_description()
    } else {
        text
    };

    let registry = TagRegistry::builtin();
    let pattern = registry.compile_pattern();
    let parser = SegmentParser::builtin();
    let mut segments = parser.parse(&raw);
    ensure_trailing_newline(&mut segments, raw.len());

    let paths = EntryPaths {
        images_dir: args.images.clone(),
        animated_dir: args.gifs.clone(),
    };
    let mut images = ImageCache::open(&paths, &settings);
    let measurer = MonospaceMeasurer::default();
    let env = LayoutEnv::new(&settings, &images, &measurer);
    let layout = DocumentLayout::compute(&segments, &env);

    let report = Report {
        pattern: args.show_pattern.then(|| pattern.clone()),
        column_width: settings.column_width,
        segments: segments
            .iter()
            .enumerate()
            .map(|(i, segment)| SegmentRow {
                segment,
                height: layout.segment_height(i),
            })
            .collect(),
        bottom_padding: layout.bottom_padding(),
        total_height: layout.total_height(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            if args.show_pattern {
                if args.no_color {
                    writeln!(out, "{pattern}")?;
                } else {
                    writeln!(out, "{}", to_ansi(&colorize(&pattern)))?;
                }
                writeln!(out)?;
            }
            for (i, row) in report.segments.iter().enumerate() {
                let kind = row.segment.tag().map_or("plain", |tag| tag.name());
                writeln!(out, "{i:>4}  {kind:<6} {:>6}  {:?}", row.height, row.segment.text())?;
            }
            writeln!(
                out,
                "total {} ({} + {} padding)",
                report.total_height,
                layout.content_height(),
                report.bottom_padding
            )?;
        }
    }

    images.dispose();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["richlog", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["richlog", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_file_is_required() {
        let result = Args::try_parse_from(["richlog"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["richlog", "notes.txt"]);
        assert_eq!(args.file, PathBuf::from("notes.txt"));
        assert_eq!(args.width, None);
        assert_eq!(args.config, None);
        assert_eq!(args.images, None);
        assert_eq!(args.gifs, None);
        assert!(!args.brackets);
        assert!(!args.show_pattern);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.no_color);
    }

    #[test]
    fn test_width_flag() {
        let args = Args::parse_from(["richlog", "notes.txt", "-w", "320"]);
        assert_eq!(args.width, Some(320.0));
    }

    #[test]
    fn test_directories() {
        let args = Args::parse_from(["richlog", "notes.txt", "--images", "img", "--gifs", "anim"]);
        assert_eq!(args.images, Some(PathBuf::from("img")));
        assert_eq!(args.gifs, Some(PathBuf::from("anim")));
    }

    #[test]
    fn test_json_format() {
        let args = Args::parse_from(["richlog", "notes.txt", "--format", "json"]);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Args::try_parse_from(["richlog", "notes.txt", "--format", "yaml"]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "richlog",
            "notes.txt",
            "--brackets",
            "--show-pattern",
            "--no-color",
        ]);
        assert!(args.brackets);
        assert!(args.show_pattern);
        assert!(args.no_color);
    }
}
