//! Stack frame parsing
//!
//! Turns one line of a captured stack trace into a [`StackFrame`]. Lines
//! that do not carry a recognizable `<path>[:line[:column]]` segment yield
//! a frame with every field absent.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Path segment with at least one separator, optional line and column
static PATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:file://)?((?:\b[A-Za-z]:)?(?:[^\s:()@]*[/\\])+[^\s:()@/\\]+)(?::(\d+))?(?::(\d+))?")
        .expect("path pattern is valid")
});

/// Symbol preceding the location, as in `symbol at path` or `at symbol (path)`
static METHOD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\d+:\s+)?(?:at\s+)?([^\s(]+)\s+(?:at\s+|\()")
        .expect("method pattern is valid")
});

static QUERY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?.*$").expect("query pattern is valid"));

/// Structured source location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name_with_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path_with_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl StackFrame {
    /// Parse a stack line, relativizing against the current working directory
    pub fn parse(line: &str) -> Self {
        let cwd = std::env::current_dir()
            .ok()
            .map(|dir| dir.to_string_lossy().into_owned());
        Self::parse_with_root(line, cwd.as_deref())
    }

    /// Parse a stack line, relativizing against `root` when given
    pub fn parse_with_root(line: &str, root: Option<&str>) -> Self {
        let Some(captures) = PATH_REGEX.captures(line) else {
            return Self::default();
        };
        let Some(path) = captures.get(1) else {
            return Self::default();
        };

        let full_file_path = QUERY_REGEX.replace(path.as_str(), "").into_owned();
        let file_name = full_file_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .to_string();
        let file_path = match root {
            Some(root) => relativize(root, &full_file_path),
            None => full_file_path.clone(),
        };
        let file_line = captures.get(2).map(|m| m.as_str().to_string());
        let file_column = captures.get(3).map(|m| m.as_str().to_string());
        let with_line = |prefix: &str| match &file_line {
            Some(line) => format!("{}:{}", prefix, line),
            None => prefix.to_string(),
        };
        let method = METHOD_REGEX
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        Self {
            file_path_with_line: Some(with_line(&file_path)),
            file_name_with_line: Some(with_line(&file_name)),
            full_file_path: Some(full_file_path),
            file_name: Some(file_name),
            file_path: Some(file_path),
            file_line,
            file_column,
            method,
        }
    }

    /// Frame for a known source location
    pub fn from_location(file: &str, line: u32, column: Option<u32>) -> Self {
        let file = if file.contains(['/', '\\']) {
            file.to_string()
        } else {
            format!("./{}", file)
        };
        let line_text = match column {
            Some(column) => format!("{}:{}:{}", file, line, column),
            None => format!("{}:{}", file, line),
        };
        Self::parse(&line_text)
    }

    /// True when the line did not match
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Prefix-strip only; paths outside `root` stay absolute
fn relativize(root: &str, path: &str) -> String {
    if !root.is_empty() && path.starts_with(root) {
        format!(".{}", &path[root.len()..])
    } else {
        path.to_string()
    }
}

/// Split a stack trace into frame lines
///
/// Backtrace output places the location on a continuation line
/// (`at path:line:col`); those are folded into the preceding symbol line.
/// The header line naming the error (or `stack backtrace:`) is dropped.
pub fn stack_lines(trace: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for (idx, raw) in trace.lines().enumerate() {
        let line = raw.trim_end();
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with("stack backtrace:") {
            continue;
        }
        if idx == 0 && is_header(trimmed) {
            continue;
        }
        match lines.last_mut() {
            Some(previous) if is_continuation(trimmed) && !PATH_REGEX.is_match(previous) => {
                previous.push(' ');
                previous.push_str(trimmed);
            }
            _ => lines.push(trimmed.to_string()),
        }
    }

    lines
}

fn is_continuation(line: &str) -> bool {
    line.starts_with("at ") && !line.contains('(')
}

fn is_header(line: &str) -> bool {
    let indexed = line
        .split_once(':')
        .map(|(head, _)| !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false);
    !indexed && !line.starts_with("at ") && !PATH_REGEX.is_match(line.split(": ").next().unwrap_or(line))
}
