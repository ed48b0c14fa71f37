//! Core logger types and traits

pub mod call_site;
pub mod error;
pub mod error_render;
pub mod inspect;
pub mod log_level;
pub mod logger;
pub mod mask;
pub mod meta;
pub mod metrics;
pub mod options;
pub mod stack_frame;
pub mod style;
pub mod template;
pub mod timestamp;
pub mod transport;
pub mod value;

pub use call_site::{CallSite, CallSiteCapturer, DEFAULT_STACK_DEPTH_LEVEL};
pub use error::{LoggerError, Result};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use mask::MaskingEngine;
pub use meta::Meta;
pub use metrics::LoggerMetrics;
pub use options::{
    AddMetaHook, LoggerOptions, LoggerSettings, MaskHook, Overwrite, PrettySettings,
    DEFAULT_MASK_PLACEHOLDER,
};
pub use stack_frame::StackFrame;
pub use style::Style;
pub use timestamp::TimeZoneSetting;
pub use transport::{FnTransport, Transport};
pub use value::{ErrorValue, Record, Shared, Value};
