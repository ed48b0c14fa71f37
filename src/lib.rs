//! # Pretty Logger
//!
//! A structured logger for services and CLIs: every call carries arbitrary
//! values, is masked for sensitive content, enriched with metadata and
//! handed to pluggable transports.
//!
//! ## Features
//!
//! - **Pretty console output**: templated, optionally ANSI-styled lines with
//!   source location and logger names
//! - **Sub-loggers**: children inherit settings and forward records to
//!   their parent's transports
//! - **Masking**: values under sensitive keys or matching patterns are
//!   replaced before any transport sees them
//! - **Custom levels and hooks**: log at any numeric level, override the
//!   masking or metadata stages
//!
//! ```
//! use pretty_logger::prelude::*;
//!
//! let logger = Logger::builder().name("api").build();
//! let child = logger.get_sub_logger(LoggerSettings::named("db")).unwrap();
//! child.info(&["connected".into(), Value::object(Record::new().with_field("password", "x"))]).unwrap();
//! ```

pub mod bridge;
pub mod core;
pub mod macros;
pub mod transports;

pub mod prelude {
    pub use crate::core::{
        CallSite, ErrorValue, FnTransport, LogLevel, Logger, LoggerBuilder, LoggerError,
        LoggerMetrics, LoggerOptions, LoggerSettings, Meta, PrettySettings, Record, Result,
        StackFrame, Style, TimeZoneSetting, Transport, Value,
    };
    pub use crate::transports::{ConsoleOutput, JsonTransport, Output, PrettyTransport, WriterOutput};
}

pub use crate::bridge::{init_log_bridge, LogBridge};
pub use crate::core::{
    CallSite, ErrorValue, FnTransport, LogLevel, Logger, LoggerBuilder, LoggerError,
    LoggerMetrics, LoggerOptions, LoggerSettings, Meta, PrettySettings, Record, Result,
    StackFrame, Style, TimeZoneSetting, Transport, Value,
};
pub use crate::transports::{JsonTransport, PrettyTransport};
