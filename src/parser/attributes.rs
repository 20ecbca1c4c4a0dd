//! `KEY=value` attributes inside a container tag's opening bracket.
//!
//! `<gif WIDTH=320 "FPS"=12 SIZE=(4,2)>name</gif>` yields
//! `{WIDTH: 320, FPS: 12, SIZE: (4, 2)}`. Tokens are handled one at a time;
//! a bad token is logged once and skipped, so the remaining attributes still
//! apply and the caller keeps its defaults for the rest.

use crate::logging::{error_once, warn_once};
use crate::model::{AttributeError, AttributeType, TagKind};
use std::collections::HashMap;

/// Container width in pixels.
pub const WIDTH: &str = "WIDTH";
/// Container height in pixels.
pub const HEIGHT: &str = "HEIGHT";
/// Sprite-sheet grid, `(columns,rows)`.
pub const SIZE: &str = "SIZE";
/// Animation frames per second.
pub const FPS: &str = "FPS";
/// Ticks holding frame 0 at the start of every cycle.
pub const DELAY: &str = "DELAY";

/// Attribute a tag recognises, with the type its value converts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    /// Uppercase attribute name.
    pub name: &'static str,
    /// Declared value type.
    pub kind: AttributeType,
}

impl AttributeSpec {
    /// Integer attribute.
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: AttributeType::Int,
        }
    }

    /// Dimension-pair attribute.
    pub const fn dimensions(name: &'static str) -> Self {
        Self {
            name,
            kind: AttributeType::Dimensions,
        }
    }
}

/// Converted attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeValue {
    /// Integer value.
    Int(i32),
    /// `(x, y)` pair.
    Dimensions(i32, i32),
}

impl AttributeValue {
    /// Convert raw text to `kind`.
    ///
    /// Dimension pairs accept `(4,2)`, `4,2` and `4x2`.
    pub fn convert(name: &str, value: &str, kind: AttributeType) -> Result<Self, AttributeError> {
        let invalid = || AttributeError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            expected: kind,
        };
        match kind {
            AttributeType::Int => value.trim().parse().map(Self::Int).map_err(|_| invalid()),
            AttributeType::Dimensions => {
                let inner = value.trim().trim_start_matches('(').trim_end_matches(')');
                let (x, y) = inner
                    .split_once(',')
                    .or_else(|| inner.split_once(['x', 'X']))
                    .ok_or_else(invalid)?;
                let x = x.trim().parse().map_err(|_| invalid())?;
                let y = y.trim().parse().map_err(|_| invalid())?;
                Ok(Self::Dimensions(x, y))
            }
        }
    }
}

/// Hook offered every name the recognised list does not cover.
///
/// Receives the uppercased name and the quote-trimmed value. `None` means the
/// name is not handled and is reported as unrecognised.
pub type CustomAttributeHook = fn(&str, &str) -> Option<Result<AttributeValue, AttributeError>>;

/// Typed attribute map keyed by uppercase name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeLookup {
    values: HashMap<String, AttributeValue>,
}

impl AttributeLookup {
    /// Parse the attributes of one container body.
    ///
    /// Only the text before the first `>` is considered. Failures are
    /// reported through the once-log under `attribute:{tag}:...` keys.
    pub fn parse(
        bracket_text: &str,
        recognized: &[AttributeSpec],
        custom: Option<CustomAttributeHook>,
        tag: TagKind,
    ) -> Self {
        let mut lookup = Self::default();
        let prefix = bracket_text.split('>').next().unwrap_or_default();

        for token in prefix.split_whitespace() {
            let Some((raw_name, raw_value)) = token.split_once('=') else {
                let err = AttributeError::MissingSeparator {
                    token: token.to_string(),
                };
                error_once(&format!("attribute:{tag}:{token}"), err);
                continue;
            };
            let name = raw_name.trim_matches(['"', '\'']).to_uppercase();
            let value = raw_value.trim_matches(['"', '\'']);

            let converted = match recognized.iter().find(|spec| spec.name == name) {
                Some(spec) => Some(AttributeValue::convert(&name, value, spec.kind)),
                None => custom.and_then(|hook| hook(&name, value)),
            };

            match converted {
                Some(Ok(parsed)) => {
                    lookup.values.insert(name, parsed);
                }
                Some(Err(err)) => error_once(&format!("attribute:{tag}:{token}"), err),
                None => {
                    let err = AttributeError::Unrecognized {
                        name: raw_name.to_string(),
                        tag: tag.name(),
                    };
                    warn_once(&format!("attribute:{tag}:{name}"), err);
                }
            }
        }

        lookup
    }

    /// Raw value for `name` (any case).
    pub fn get(&self, name: &str) -> Option<AttributeValue> {
        self.values.get(&name.to_uppercase()).copied()
    }

    /// Integer value for `name`, or `fallback` if absent or of another type.
    pub fn int_or(&self, name: &str, fallback: i32) -> i32 {
        match self.get(name) {
            Some(AttributeValue::Int(v)) => v,
            _ => fallback,
        }
    }

    /// Dimension pair for `name`, if present.
    pub fn dimensions(&self, name: &str) -> Option<(i32, i32)> {
        match self.get(name) {
            Some(AttributeValue::Dimensions(x, y)) => Some((x, y)),
            _ => None,
        }
    }

    /// Whether `name` (any case) was parsed.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&name.to_uppercase())
    }

    /// Number of parsed attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was parsed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
