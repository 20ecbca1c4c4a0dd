//! Font, anchor and title tags, plus plain-text measurement.

use super::LayoutEnv;
use crate::logging::error_once;
use crate::model::{DescriptionData, FontSize, TagKind, TextAnchor, TextScope};
use crate::view::DecoratedText;

/// Apply a `<font>` or `<anchor>` body to `scope`. Unknown names are logged
/// once and leave the scope unchanged.
pub fn apply_instruction(kind: TagKind, body: &str, scope: &mut TextScope) {
    match kind {
        TagKind::Font => match body.parse::<FontSize>() {
            Ok(font) => scope.font = font,
            Err(err) => error_once(&format!("font:{}", body.trim()), err),
        },
        TagKind::Anchor => match body.parse::<TextAnchor>() {
            Ok(anchor) => scope.anchor = anchor,
            Err(err) => error_once(&format!("anchor:{}", body.trim()), err),
        },
        TagKind::Title | TagKind::Image | TagKind::Gif => {}
    }
}

/// Title text measured at the small font, plus the title padding.
pub fn title_height(body: &str, env: &LayoutEnv<'_>) -> u32 {
    let text = env
        .measurer
        .text_height(body, env.column_width, FontSize::Small);
    text.ceil() as u32 + env.settings.title_padding
}

/// Height of a plain segment as drawn: annotations resolved, wrapped at the
/// current font.
pub fn plain_height(segment: &DescriptionData, scope: &TextScope, env: &LayoutEnv<'_>) -> u32 {
    let drawn = DecoratedText::from_segment(segment);
    env.measurer
        .text_height(&drawn.text, env.column_width, scope.font)
        .ceil() as u32
}
