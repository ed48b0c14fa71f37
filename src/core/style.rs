//! Style tokens
//!
//! A style is either a sequence of tokens (`["bold", "red"]`) or a table
//! keyed by the rendered value (used for level names) with a `"*"` fallback.
//! Tokens map onto `colored` colors and modifiers; `bg`-prefixed color
//! tokens set the background. Unknown tokens (including `overline`, which
//! `colored` has no attribute for) are ignored.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Fallback key inside a per-value style table
pub const ANY_VALUE: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Style {
    /// Applied in order and combined into one escape sequence
    Tokens(Vec<String>),
    /// Looked up by the trimmed value, then by `"*"`
    ByValue(BTreeMap<String, Vec<String>>),
}

impl Style {
    pub fn tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Style::Tokens(tokens.into_iter().map(Into::into).collect())
    }

    /// Apply the style to `value`
    pub fn apply(&self, value: &str) -> String {
        match self {
            Style::Tokens(tokens) => paint(value, tokens),
            Style::ByValue(table) => match table
                .get(value.trim())
                .or_else(|| table.get(ANY_VALUE))
            {
                Some(tokens) => paint(value, tokens),
                None => value.to_string(),
            },
        }
    }
}

/// Accepts `"red"`, `["bold", "red"]` and `{"WARN": "yellow", "*": ["dim"]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum StyleRepr {
    One(String),
    Many(Vec<String>),
    Table(BTreeMap<String, TokensRepr>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TokensRepr {
    One(String),
    Many(Vec<String>),
}

impl From<TokensRepr> for Vec<String> {
    fn from(repr: TokensRepr) -> Self {
        match repr {
            TokensRepr::One(token) => vec![token],
            TokensRepr::Many(tokens) => tokens,
        }
    }
}

impl<'de> Deserialize<'de> for Style {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match StyleRepr::deserialize(deserializer)? {
            StyleRepr::One(token) => Style::Tokens(vec![token]),
            StyleRepr::Many(tokens) => Style::Tokens(tokens),
            StyleRepr::Table(table) => {
                Style::ByValue(table.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        })
    }
}

impl From<&str> for Style {
    fn from(token: &str) -> Self {
        Style::Tokens(vec![token.to_string()])
    }
}

/// Reset pair appended after every styled placeholder
pub const RESET: &str = "\u{1b}[0m\u{1b}[0m";

/// Whether styles reach the output
///
/// Follows `colored`'s global control: `NO_COLOR`, `CLICOLOR`,
/// `CLICOLOR_FORCE`, terminal detection and `set_override`.
pub fn colors_enabled() -> bool {
    #[cfg(feature = "console")]
    {
        colored::control::SHOULD_COLORIZE.should_colorize()
    }
    #[cfg(not(feature = "console"))]
    {
        false
    }
}

#[cfg(feature = "console")]
fn paint(value: &str, tokens: &[String]) -> String {
    use colored::Colorize;

    tokens
        .iter()
        .fold(value.normal(), |painted, token| match token.as_str() {
            "reset" => painted.clear(),
            "bold" => painted.bold(),
            "dim" => painted.dimmed(),
            "italic" => painted.italic(),
            "underline" => painted.underline(),
            "inverse" => painted.reversed(),
            "hidden" => painted.hidden(),
            "strikethrough" => painted.strikethrough(),
            token => match token.strip_prefix("bg").and_then(color_named) {
                Some(color) => painted.on_color(color),
                None => match color_named(token) {
                    Some(color) => painted.color(color),
                    None => painted,
                },
            },
        })
        .to_string()
}

#[cfg(not(feature = "console"))]
fn paint(value: &str, _tokens: &[String]) -> String {
    value.to_string()
}

/// Color for a token; the first letter's case is ignored so `Red` (from
/// `bgRed`) and `red` both resolve
#[cfg(feature = "console")]
pub fn color_named(token: &str) -> Option<colored::Color> {
    use colored::Color;

    let mut chars = token.chars();
    let first = chars.next()?.to_ascii_lowercase();
    let color = match (first, chars.as_str()) {
        ('b', "lack") => Color::Black,
        ('r', "ed") => Color::Red,
        ('g', "reen") => Color::Green,
        ('y', "ellow") => Color::Yellow,
        ('b', "lue") => Color::Blue,
        ('m', "agenta") => Color::Magenta,
        ('c', "yan") => Color::Cyan,
        ('w', "hite") => Color::White,
        ('b', "lackBright") | ('g', "ray") | ('g', "rey") => Color::BrightBlack,
        ('r', "edBright") => Color::BrightRed,
        ('g', "reenBright") => Color::BrightGreen,
        ('y', "ellowBright") => Color::BrightYellow,
        ('b', "lueBright") => Color::BrightBlue,
        ('m', "agentaBright") => Color::BrightMagenta,
        ('c', "yanBright") => Color::BrightCyan,
        ('w', "hiteBright") => Color::BrightWhite,
        _ => return None,
    };
    Some(color)
}

/// Default style table for the pretty transport
pub fn default_styles() -> BTreeMap<String, Style> {
    let levels: BTreeMap<String, Vec<String>> = [
        (ANY_VALUE, vec!["bold", "black", "bgWhiteBright", "dim"]),
        ("SILLY", vec!["bold", "white"]),
        ("TRACE", vec!["bold", "whiteBright"]),
        ("DEBUG", vec!["bold", "green"]),
        ("INFO", vec!["bold", "blue"]),
        ("WARN", vec!["bold", "yellow"]),
        ("ERROR", vec!["bold", "red"]),
        ("FATAL", vec!["bold", "redBright"]),
    ]
    .into_iter()
    .map(|(level, tokens)| {
        (
            level.to_string(),
            tokens.into_iter().map(String::from).collect(),
        )
    })
    .collect();

    let mut styles = BTreeMap::new();
    styles.insert("logLevelName".to_string(), Style::ByValue(levels));
    styles.insert("dateIsoStr".to_string(), Style::from("white"));
    styles.insert("filePathWithLine".to_string(), Style::from("white"));
    styles.insert("name".to_string(), Style::tokens(["white", "bold"]));
    styles.insert("nameWithDelimiterPrefix".to_string(), Style::tokens(["white", "bold"]));
    styles.insert("nameWithDelimiterSuffix".to_string(), Style::tokens(["white", "bold"]));
    styles.insert("errorName".to_string(), Style::tokens(["bold", "bgRedBright", "whiteBright"]));
    styles.insert("fileName".to_string(), Style::tokens(["yellow"]));
    styles.insert("fileNameWithLine".to_string(), Style::from("white"));
    styles
}
