//! Syntax colouring for the compiled pattern text, for debug output.
//!
//! Each character is classified as a quantifier (`*`, `?`, `+`), grouping
//! (unescaped `.`, `(`, `)`) or literal. Adjacent characters of the same
//! class form one run.

use crate::model::Color;

/// Character class of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternClass {
    /// `*`, `?` and `+`.
    Quantifier,
    /// Unescaped `.`, `(` and `)`.
    Grouping,
    /// Everything else.
    Literal,
}

impl PatternClass {
    /// Display colour: hot pink, teal and light orange respectively.
    pub fn color(self) -> Color {
        match self {
            Self::Quantifier => Color::from_unit(0.843, 0.275, 0.785),
            Self::Grouping => Color::from_unit(0.177, 0.71, 0.451),
            Self::Literal => Color::from_unit(0.9, 0.59, 0.275),
        }
    }
}

/// A maximal run of same-class characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRun {
    /// Class shared by every character in the run.
    pub class: PatternClass,
    /// The characters.
    pub text: String,
}

fn classify(current: char, previous: Option<char>) -> PatternClass {
    match current {
        '*' | '?' | '+' => PatternClass::Quantifier,
        '.' | '(' | ')' if previous != Some('\\') => PatternClass::Grouping,
        _ => PatternClass::Literal,
    }
}

/// Split `pattern` into coloured runs.
pub fn colorize(pattern: &str) -> Vec<PatternRun> {
    let mut runs: Vec<PatternRun> = Vec::new();
    let mut previous = None;
    for c in pattern.chars() {
        let class = classify(c, previous);
        match runs.last_mut() {
            Some(run) if run.class == class => run.text.push(c),
            _ => runs.push(PatternRun {
                class,
                text: c.to_string(),
            }),
        }
        previous = Some(c);
    }
    runs
}

/// Render runs with 24-bit ANSI foreground colours.
pub fn to_ansi(runs: &[PatternRun]) -> String {
    let mut out = String::new();
    for run in runs {
        let Color { r, g, b, .. } = run.class.color();
        out.push_str(&format!("\x1b[38;2;{r};{g};{b}m{}", run.text));
    }
    if !runs.is_empty() {
        out.push_str("\x1b[0m");
    }
    out
}
