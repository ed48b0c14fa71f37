//! Call-site capture
//!
//! Resolves the source location of a logging call, either from the
//! `#[track_caller]` location of the public logging method or by walking a
//! captured backtrace to a configurable depth.

use super::stack_frame::{stack_lines, StackFrame};
use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::panic::Location;

/// Filtered frames between the capture point and the caller of
/// `Logger::log` or one of the leveled methods
pub const DEFAULT_STACK_DEPTH_LEVEL: usize = 4;

/// Frames belonging to the backtrace machinery itself
const INTERNAL_FRAME_PREFIXES: [&str; 3] = ["std::backtrace", "backtrace_rs::", "std::sys::"];

/// How the `path` of a record's meta is obtained
///
/// ```
/// use pretty_logger::core::CallSite;
///
/// let mode: CallSite = serde_json::from_str(r#"{"mode":"backtrace","stackDepthLevel":4}"#).unwrap();
/// assert_eq!(mode, CallSite::Backtrace { stack_depth_level: 4 });
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum CallSite {
    /// Location of the caller of the logging method
    #[default]
    Caller,
    /// Frame `stack_depth_level` of a backtrace captured inside the logger
    Backtrace {
        #[serde(rename = "stackDepthLevel", default = "default_stack_depth_level")]
        stack_depth_level: usize,
    },
    /// No location is recorded
    Disabled,
}

fn default_stack_depth_level() -> usize {
    DEFAULT_STACK_DEPTH_LEVEL
}

impl CallSite {
    /// Resolve a frame for a call made at `caller`
    pub fn resolve(&self, caller: &Location<'_>) -> Option<StackFrame> {
        match self {
            CallSite::Caller => Some(StackFrame::from_location(
                caller.file(),
                caller.line(),
                Some(caller.column()),
            )),
            CallSite::Backtrace { stack_depth_level } => {
                Some(CallSiteCapturer::new(*stack_depth_level).capture())
            }
            CallSite::Disabled => None,
        }
    }
}

/// Walks a captured backtrace to the frame `stack_depth_level` entries
/// above the capture point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSiteCapturer {
    stack_depth_level: usize,
}

impl CallSiteCapturer {
    pub fn new(stack_depth_level: usize) -> Self {
        Self { stack_depth_level }
    }

    pub fn stack_depth_level(&self) -> usize {
        self.stack_depth_level
    }

    /// Capture the current stack; all fields are absent when the frame
    /// does not exist or carries no location
    #[inline(never)]
    pub fn capture(&self) -> StackFrame {
        let trace = Backtrace::force_capture().to_string();
        Self::capture_from_trace(&trace, self.stack_depth_level)
    }

    /// Select frame `depth` from trace text, newest call first
    pub fn capture_from_trace(trace: &str, depth: usize) -> StackFrame {
        stack_lines(trace)
            .into_iter()
            .filter(|line| !is_internal_frame(line))
            .nth(depth)
            .map(|line| StackFrame::parse(&line))
            .unwrap_or_default()
    }
}

impl Default for CallSiteCapturer {
    fn default() -> Self {
        Self::new(DEFAULT_STACK_DEPTH_LEVEL)
    }
}

fn is_internal_frame(line: &str) -> bool {
    let symbol = line
        .split_once(": ")
        .map(|(_, rest)| rest)
        .unwrap_or(line)
        .trim_start();
    INTERNAL_FRAME_PREFIXES
        .iter()
        .any(|prefix| symbol.starts_with(prefix))
}
