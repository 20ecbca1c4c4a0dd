//! Version/description record supplied by the config-loading collaborator.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// When a changelog entry should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UpdateOn {
    /// As soon as the host application has started.
    Startup,
    /// After the host has finished initialising.
    #[default]
    GameInit,
    /// When a new game is started.
    NewGame,
    /// When a saved game is loaded.
    LoadedGame,
}

/// Icon with a hover name and a link, shown beside the entry title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperlinkedIcon {
    /// Tooltip name.
    pub name: String,
    /// Local image cache key (file name without extension).
    pub icon: String,
    /// URL opened on click.
    pub url: String,
}

/// Image hosted remotely, downloaded when the entry is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteImageSpec {
    /// Logical cache key referenced by `<img>` tags.
    pub name: String,
    /// Source URL.
    pub url: String,
}

/// One changelog record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryRecord {
    /// Version string shown in the header.
    pub current_version: String,
    /// Trigger that shows this entry.
    pub update_on: UpdateOn,
    /// Raw markup description. May use `[`/`]` in place of `<`/`>`.
    pub description: String,
    /// Identifier of an action the host runs when the entry is shown.
    #[serde(rename = "actionOnUpdate")]
    pub action_on_update_identifier: Option<String>,
    /// Icons left of the title.
    pub left_icon_bar: Vec<HyperlinkedIcon>,
    /// Icons right of the title.
    pub right_icon_bar: Vec<HyperlinkedIcon>,
    /// Remote images to download.
    pub images: Vec<RemoteImageSpec>,
    /// Testing mode keeps `update` set after showing.
    pub testing: bool,
    /// Whether the entry is pending display.
    pub update: bool,
}

impl EntryRecord {
    /// Description with bracket escapes turned into angle brackets.
    ///
    /// Descriptions are stored in XML where raw `<` is awkward, so authors
    /// write `[img]icon[/img]` and this restores `<img>icon</img>`.
    pub fn enhanced_description(&self) -> String {
        self.description
            .chars()
            .map(|c| match c {
                '[' => '<',
                ']' => '>',
                other => other,
            })
            .collect()
    }

    /// Whether the entry should be shown for `trigger`.
    pub fn due_for(&self, trigger: UpdateOn) -> bool {
        self.update_on == trigger && self.update && !self.description.trim().is_empty()
    }

    /// Record that the entry was shown. Testing entries stay pending.
    pub fn notify_updated(&mut self) {
        if !self.testing {
            self.update = false;
        }
    }
}

/// On-disk locations resolved by the mod-discovery collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryPaths {
    /// Directory holding still images (searched recursively).
    pub images_dir: Option<PathBuf>,
    /// Directory whose immediate subdirectories are animated frame groups.
    pub animated_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(description: &str) -> EntryRecord {
        EntryRecord {
            current_version: "1.2.0".to_string(),
            update_on: UpdateOn::Startup,
            description: description.to_string(),
            update: true,
            ..EntryRecord::default()
        }
    }

    #[test]
    fn enhanced_description_converts_brackets() {
        let rec = record("[title]New[/title][img WIDTH=10]icon[/img]");
        assert_eq!(
            rec.enhanced_description(),
            "<title>New</title><img WIDTH=10>icon</img>"
        );
    }

    #[test]
    fn due_for_requires_matching_trigger_and_update_flag() {
        let rec = record("hello");
        assert!(rec.due_for(UpdateOn::Startup));
        assert!(!rec.due_for(UpdateOn::NewGame));

        let mut shown = rec.clone();
        shown.update = false;
        assert!(!shown.due_for(UpdateOn::Startup));
    }

    #[test]
    fn due_for_skips_empty_description() {
        assert!(!record("  \n").due_for(UpdateOn::Startup));
    }

    #[test]
    fn notify_updated_clears_flag_unless_testing() {
        let mut rec = record("hello");
        rec.notify_updated();
        assert!(!rec.update);

        let mut testing = record("hello");
        testing.testing = true;
        testing.notify_updated();
        assert!(testing.update);
    }

    #[test]
    fn record_deserializes_from_camel_case_toml() {
        let rec: EntryRecord = toml::from_str(
            r#"
currentVersion = "2.0"
updateOn = "LoadedGame"
description = "[font]Tiny[/font]hi"
actionOnUpdate = "Mod.Hooks.OnUpdate"
update = true

[[rightIconBar]]
name = "Source"
icon = "github"
url = "https://example.test/repo"

[[images]]
name = "banner"
url = "https://example.test/banner.png"
"#,
        )
        .expect("valid record");

        assert_eq!(rec.update_on, UpdateOn::LoadedGame);
        assert_eq!(
            rec.action_on_update_identifier.as_deref(),
            Some("Mod.Hooks.OnUpdate")
        );
        assert_eq!(rec.right_icon_bar.len(), 1);
        assert!(rec.left_icon_bar.is_empty());
        assert_eq!(rec.images[0].name, "banner");
        assert!(!rec.testing);
    }
}
