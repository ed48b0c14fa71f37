//! Logging macros
//!
//! Each argument is converted with `Value::from`, so plain literals, numbers
//! and prepared [`Value`](crate::Value)s can be mixed freely. The source
//! location recorded is the macro call site.
//!
//! # Examples
//!
//! ```
//! use pretty_logger::prelude::*;
//! use pretty_logger::info;
//!
//! let logger = Logger::new();
//!
//! info!(logger, "Server started").unwrap();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port", port).unwrap();
//!
//! let user = Value::object(Record::new().with_field("id", 42));
//! info!(logger, "User logged in", user).unwrap();
//! ```

/// Log at a custom level.
///
/// # Examples
///
/// ```
/// # use pretty_logger::prelude::*;
/// # let logger = Logger::new();
/// use pretty_logger::log;
/// log!(logger, 8, "AUDIT", "config reloaded").unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $id:expr, $name:expr $(, $arg:expr)* $(,)?) => {
        $logger.log($id, $name, &[$($crate::Value::from($arg)),*])
    };
}

/// Log at SILLY (0).
#[macro_export]
macro_rules! silly {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.silly(&[$($crate::Value::from($arg)),*])
    };
}

/// Log at TRACE (1).
///
/// ```
/// # use pretty_logger::prelude::*;
/// # let logger = Logger::new();
/// use pretty_logger::trace;
/// trace!(logger, "Entering function", "calculate").unwrap();
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.trace(&[$($crate::Value::from($arg)),*])
    };
}

/// Log at DEBUG (2).
#[macro_export]
macro_rules! debug {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.debug(&[$($crate::Value::from($arg)),*])
    };
}

/// Log at INFO (3).
#[macro_export]
macro_rules! info {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.info(&[$($crate::Value::from($arg)),*])
    };
}

/// Log at WARN (4).
///
/// ```
/// # use pretty_logger::prelude::*;
/// # let logger = Logger::new();
/// use pretty_logger::warn;
/// warn!(logger, "Retry attempt", 3, "of", 5).unwrap();
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.warn(&[$($crate::Value::from($arg)),*])
    };
}

/// Log at ERROR (5).
#[macro_export]
macro_rules! error {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.error(&[$($crate::Value::from($arg)),*])
    };
}

/// Log at FATAL (6).
#[macro_export]
macro_rules! fatal {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.fatal(&[$($crate::Value::from($arg)),*])
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{FnTransport, LoggerError, Meta, Value};
    use crate::Logger;
    use std::sync::{Arc, Mutex};

    fn collecting_logger() -> (Logger, Arc<Mutex<Vec<(u32, Vec<Value>, Meta)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let logger = Logger::builder()
            .transport(FnTransport::new("collect", move |args: &[Value], meta: &Meta| {
                sink.lock()
                    .map_err(|_| LoggerError::other("poisoned"))?
                    .push((meta.log_level_id, args.to_vec(), meta.clone()));
                Ok(())
            }))
            .build();
        (logger, seen)
    }

    #[test]
    fn test_level_macros() {
        let (logger, seen) = collecting_logger();
        silly!(logger, "s").unwrap();
        trace!(logger, "t").unwrap();
        debug!(logger, "d").unwrap();
        info!(logger, "i", 1).unwrap();
        warn!(logger, "w", true).unwrap();
        error!(logger, "e").unwrap();
        fatal!(logger, "f").unwrap();
        log!(logger, 9, "CUSTOM", "c").unwrap();

        let seen = seen.lock().unwrap();
        let ids: Vec<u32> = seen.iter().map(|(id, _, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6, 9]);
        assert_eq!(seen[3].1, vec![Value::from("i"), Value::from(1)]);
        assert_eq!(seen[7].2.log_level_name, "CUSTOM");
    }

    #[test]
    fn test_macro_records_call_site() {
        let (logger, seen) = collecting_logger();
        let line = line!() + 1;
        info!(logger, "here").unwrap();
        let seen = seen.lock().unwrap();
        let path = seen[0].2.path.as_ref().unwrap();
        assert_eq!(path.file_name.as_deref(), Some("macros.rs"));
        assert_eq!(path.file_line, Some(line.to_string()));
    }

    #[test]
    fn test_no_arguments() {
        let (logger, seen) = collecting_logger();
        info!(logger).unwrap();
        assert!(seen.lock().unwrap()[0].1.is_empty());
    }
}
