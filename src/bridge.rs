//! Bridge from the `log` facade
//!
//! Routes `log::info!` and friends through a [`Logger`], so libraries that
//! only know the facade end up in the same transports.
//!
//! ```no_run
//! use pretty_logger::prelude::*;
//! use pretty_logger::bridge::init_log_bridge;
//!
//! let logger = Logger::with_pretty_console();
//! init_log_bridge(logger, log::LevelFilter::Info).unwrap();
//! log::info!("served {} requests", 12);
//! ```

use crate::core::{LogLevel, Logger, LoggerError, Result, StackFrame, Value};

/// `log::Log` implementation forwarding to a [`Logger`]
#[derive(Debug, Clone)]
pub struct LogBridge {
    logger: Logger,
}

impl LogBridge {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

/// Facade level to default level
pub fn level_of(level: log::Level) -> LogLevel {
    match level {
        log::Level::Trace => LogLevel::Trace,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Info => LogLevel::Info,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Error => LogLevel::Error,
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.logger.is_enabled(level_of(metadata.level()).id())
    }

    fn log(&self, record: &log::Record) {
        let level = level_of(record.level());
        let path = record.file().map(|file| match record.line() {
            Some(line) => StackFrame::from_location(file, line, None),
            None => StackFrame::parse(file),
        });
        let args = [Value::String(record.args().to_string())];
        if let Err(e) = self
            .logger
            .log_with_frame(level.id(), level.to_str(), &args, path)
        {
            eprintln!("[LOGGER ERROR] Failed to forward '{}' record: {}", record.target(), e);
        }
    }

    fn flush(&self) {
        if let Err(e) = self.logger.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush transports: {}", e);
        }
    }
}

/// Install `logger` as the global `log` backend
pub fn init_log_bridge(logger: Logger, max_level: log::LevelFilter) -> Result<()> {
    log::set_boxed_logger(Box::new(LogBridge::new(logger)))
        .map_err(|e| LoggerError::config("log bridge", e.to_string()))?;
    log::set_max_level(max_level);
    Ok(())
}
