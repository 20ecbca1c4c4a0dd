//! Text style state set by `<font>` and `<anchor>` instructions.

use super::error::StyleParseError;
use serde::Serialize;
use std::str::FromStr;

/// Font size classes understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FontSize {
    /// Smallest text.
    Tiny,
    /// Body text. Titles are always measured and drawn at this size.
    #[default]
    Small,
    /// Large text.
    Medium,
}

impl FontSize {
    /// All variants, in declaration order.
    pub const ALL: [Self; 3] = [Self::Tiny, Self::Small, Self::Medium];

    /// Canonical name, as written inside `<font>` tags.
    pub fn name(self) -> &'static str {
        match self {
            Self::Tiny => "Tiny",
            Self::Small => "Small",
            Self::Medium => "Medium",
        }
    }
}

impl FromStr for FontSize {
    type Err = StyleParseError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|font| font.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| StyleParseError::UnknownFont(s.to_string()))
    }
}

/// Horizontal component of a [`TextAnchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    /// Flush left.
    Left,
    /// Centred in the column.
    Center,
    /// Flush right.
    Right,
}

/// Text alignment inside the layout column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum TextAnchor {
    /// Top left.
    #[default]
    UpperLeft,
    /// Top centre.
    UpperCenter,
    /// Top right.
    UpperRight,
    /// Middle left.
    MiddleLeft,
    /// Middle centre.
    MiddleCenter,
    /// Middle right.
    MiddleRight,
    /// Bottom left.
    LowerLeft,
    /// Bottom centre.
    LowerCenter,
    /// Bottom right.
    LowerRight,
}

impl TextAnchor {
    /// All variants, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::UpperLeft,
        Self::UpperCenter,
        Self::UpperRight,
        Self::MiddleLeft,
        Self::MiddleCenter,
        Self::MiddleRight,
        Self::LowerLeft,
        Self::LowerCenter,
        Self::LowerRight,
    ];

    /// Canonical name, as written inside `<anchor>` tags.
    pub fn name(self) -> &'static str {
        match self {
            Self::UpperLeft => "UpperLeft",
            Self::UpperCenter => "UpperCenter",
            Self::UpperRight => "UpperRight",
            Self::MiddleLeft => "MiddleLeft",
            Self::MiddleCenter => "MiddleCenter",
            Self::MiddleRight => "MiddleRight",
            Self::LowerLeft => "LowerLeft",
            Self::LowerCenter => "LowerCenter",
            Self::LowerRight => "LowerRight",
        }
    }

    /// Horizontal alignment. Text blocks are sized to their content, so only
    /// this component affects placement.
    pub fn horizontal(self) -> HorizontalAlign {
        match self {
            Self::UpperLeft | Self::MiddleLeft | Self::LowerLeft => HorizontalAlign::Left,
            Self::UpperCenter | Self::MiddleCenter | Self::LowerCenter => HorizontalAlign::Center,
            Self::UpperRight | Self::MiddleRight | Self::LowerRight => HorizontalAlign::Right,
        }
    }
}

impl FromStr for TextAnchor {
    type Err = StyleParseError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|anchor| anchor.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| StyleParseError::UnknownAnchor(s.to_string()))
    }
}

/// Render-scope text state threaded through height computation and drawing.
///
/// Font and anchor instructions mutate this and every following segment
/// honours it until the next instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextScope {
    /// Current font size.
    pub font: FontSize,
    /// Current alignment.
    pub anchor: TextAnchor,
}
