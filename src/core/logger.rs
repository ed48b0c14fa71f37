//! Main logger implementation
//!
//! A [`Logger`] owns its options and an ordered list of transports, and
//! keeps a non-owning reference to the logger it was derived from. Every
//! call runs to completion on the caller's thread: call-site capture,
//! masking, this logger's transports, then the parent's transport stage.

use super::{
    call_site::CallSite,
    error::Result,
    log_level::LogLevel,
    mask::MaskingEngine,
    meta::Meta,
    metrics::LoggerMetrics,
    options::{AddMetaHook, LoggerOptions, LoggerSettings, MaskHook},
    stack_frame::StackFrame,
    transport::Transport,
    value::Value,
};
use parking_lot::{Mutex, RwLock};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;
use std::sync::{Arc, Weak};

/// Handle to a logger; clones refer to the same logger
#[derive(Clone)]
pub struct Logger {
    core: Arc<LoggerCore>,
}

struct LoggerCore {
    options: RwLock<LoggerOptions>,
    masking: RwLock<MaskingEngine>,
    transports: Mutex<Vec<Box<dyn Transport>>>,
    parent: Option<Weak<LoggerCore>>,
    metrics: LoggerMetrics,
}

/// Option values read once per record so no lock is held while hooks or
/// transports run
struct Route {
    min_level: u32,
    propagate: bool,
    mask: Option<MaskHook>,
    add_meta: Option<AddMetaHook>,
    default_metadata: BTreeMap<String, Value>,
}

impl LoggerCore {
    fn new(options: LoggerOptions, parent: Option<Weak<LoggerCore>>) -> Self {
        let masking = MaskingEngine::from_options(&options);
        Self {
            options: RwLock::new(options),
            masking: RwLock::new(masking),
            transports: Mutex::new(Vec::new()),
            parent,
            metrics: LoggerMetrics::new(),
        }
    }

    fn parent(&self) -> Option<Arc<LoggerCore>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    fn route(&self) -> Route {
        let options = self.options.read();
        Route {
            min_level: options.min_level,
            propagate: options.propagate_logs_to_parent,
            mask: options.overwrite.mask.clone(),
            add_meta: options.overwrite.add_meta.clone(),
            default_metadata: options.default_metadata.clone(),
        }
    }

    /// Lowest minimum level among the loggers a record can reach from here
    fn effective_min_level(&self) -> u32 {
        let (mut level, propagate) = {
            let options = self.options.read();
            (options.min_level, options.propagate_logs_to_parent)
        };
        let mut current = if propagate { self.parent() } else { None };
        while let Some(core) = current {
            let (min_level, propagate) = {
                let options = core.options.read();
                (options.min_level, options.propagate_logs_to_parent)
            };
            level = level.min(min_level);
            current = if propagate { core.parent() } else { None };
        }
        level
    }

    fn transport(&self, args: &[Value], mut meta: Meta) -> Result<()> {
        let route = self.route();

        let masked = match &route.mask {
            Some(mask) => mask(args),
            None => self.masking.read().mask(args),
        };

        meta.merge_defaults(&route.default_metadata);
        if let Some(add_meta) = &route.add_meta {
            meta = add_meta(args, meta);
        }

        if meta.log_level_id >= route.min_level {
            self.deliver(&masked, &meta)?;
        } else {
            self.metrics.record_filtered();
        }

        if route.propagate {
            if let Some(parent) = self.parent() {
                parent.transport(&masked, meta)?;
            }
        }
        Ok(())
    }

    /// Invoke every transport in attachment order, stopping at the first error
    fn deliver(&self, args: &[Value], meta: &Meta) -> Result<()> {
        let mut transports = self.transports.lock();
        for transport in transports.iter_mut() {
            if let Err(err) = transport.transport(args, meta) {
                self.metrics.record_failed();
                return Err(err);
            }
        }
        self.metrics.record_delivered();
        Ok(())
    }
}

impl Logger {
    /// Root logger with default options and no transports
    #[must_use]
    pub fn new() -> Self {
        Self::from_options(LoggerOptions::default())
    }

    #[must_use]
    pub fn from_options(options: LoggerOptions) -> Self {
        Self {
            core: Arc::new(LoggerCore::new(options, None)),
        }
    }

    /// Root logger from partial settings
    pub fn with_settings(settings: LoggerSettings) -> Result<Self> {
        Ok(Self::from_options(LoggerOptions::from_settings(settings)?))
    }

    /// Root logger writing pretty lines to the console
    #[must_use]
    pub fn with_pretty_console() -> Self {
        let logger = Self::new();
        logger.attach_transport(crate::transports::PrettyTransport::console());
        logger
    }

    pub fn name(&self) -> Option<String> {
        self.core.options.read().name.clone()
    }

    /// Snapshot of the current options
    pub fn options(&self) -> LoggerOptions {
        self.core.options.read().clone()
    }

    pub fn min_level(&self) -> u32 {
        self.core.options.read().min_level
    }

    /// Takes effect on the next call
    pub fn set_min_level(&self, level: impl Into<u32>) {
        self.core.options.write().min_level = level.into();
    }

    /// Mutate options in place; the masking engine is rebuilt afterwards
    pub fn update_options<F>(&self, f: F)
    where
        F: FnOnce(&mut LoggerOptions),
    {
        let mut options = self.core.options.write();
        f(&mut options);
        *self.core.masking.write() = MaskingEngine::from_options(&options);
    }

    /// Overlay partial settings onto the live options
    pub fn apply_settings(&self, settings: LoggerSettings) -> Result<()> {
        let mut options = self.core.options.write();
        options.apply(settings)?;
        *self.core.masking.write() = MaskingEngine::from_options(&options);
        Ok(())
    }

    /// The logger this one was derived from, while it is alive
    pub fn parent(&self) -> Option<Logger> {
        self.core.parent().map(|core| Logger { core })
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.core.metrics
    }

    pub fn attach_transport<T: Transport + 'static>(&self, transport: T) {
        self.attach_boxed_transport(Box::new(transport));
    }

    /// Appended after the existing transports; there is no removal
    pub fn attach_boxed_transport(&self, transport: Box<dyn Transport>) {
        self.core.transports.lock().push(transport);
    }

    pub fn transport_count(&self) -> usize {
        self.core.transports.lock().len()
    }

    /// Derive a child logger
    ///
    /// The child inherits every option except name and hooks, appends this
    /// logger's name to its parent names and starts without transports.
    /// Records reach this logger's transports through propagation.
    pub fn get_sub_logger(&self, settings: LoggerSettings) -> Result<Logger> {
        let options = self.core.options.read().derive_child(settings)?;
        let parent = Arc::downgrade(&self.core);
        Ok(Logger {
            core: Arc::new(LoggerCore::new(options, Some(parent))),
        })
    }

    /// Whether a record at `level_id` can reach any transport from here
    pub fn is_enabled(&self, level_id: u32) -> bool {
        level_id >= self.core.effective_min_level()
    }

    /// Log at a custom level
    #[track_caller]
    pub fn log(&self, level_id: u32, level_name: &str, args: &[Value]) -> Result<()> {
        self.dispatch(level_id, level_name, args, Location::caller())
    }

    /// Log at one of the default levels
    #[track_caller]
    pub fn log_level(&self, level: LogLevel, args: &[Value]) -> Result<()> {
        self.dispatch(level.id(), level.to_str(), args, Location::caller())
    }

    /// Log with an already known source location, bypassing call-site capture
    pub fn log_with_frame(
        &self,
        level_id: u32,
        level_name: &str,
        args: &[Value],
        path: Option<StackFrame>,
    ) -> Result<()> {
        if !self.is_enabled(level_id) {
            self.core.metrics.record_filtered();
            return Ok(());
        }
        self.emit(level_id, level_name, args, path)
    }

    #[track_caller]
    #[inline]
    pub fn silly(&self, args: &[Value]) -> Result<()> {
        self.dispatch(0, "SILLY", args, Location::caller())
    }

    #[track_caller]
    #[inline]
    pub fn trace(&self, args: &[Value]) -> Result<()> {
        self.dispatch(1, "TRACE", args, Location::caller())
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self, args: &[Value]) -> Result<()> {
        self.dispatch(2, "DEBUG", args, Location::caller())
    }

    #[track_caller]
    #[inline]
    pub fn info(&self, args: &[Value]) -> Result<()> {
        self.dispatch(3, "INFO", args, Location::caller())
    }

    #[track_caller]
    #[inline]
    pub fn warn(&self, args: &[Value]) -> Result<()> {
        self.dispatch(4, "WARN", args, Location::caller())
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, args: &[Value]) -> Result<()> {
        self.dispatch(5, "ERROR", args, Location::caller())
    }

    #[track_caller]
    #[inline]
    pub fn fatal(&self, args: &[Value]) -> Result<()> {
        self.dispatch(6, "FATAL", args, Location::caller())
    }

    pub fn flush(&self) -> Result<()> {
        for transport in self.core.transports.lock().iter_mut() {
            transport.flush()?;
        }
        Ok(())
    }

    #[inline(never)]
    fn dispatch(
        &self,
        level_id: u32,
        level_name: &str,
        args: &[Value],
        caller: &'static Location<'static>,
    ) -> Result<()> {
        if !self.is_enabled(level_id) {
            self.core.metrics.record_filtered();
            return Ok(());
        }
        let call_site = self.core.options.read().call_site;
        let path = call_site.resolve(caller);
        self.emit(level_id, level_name, args, path)
    }

    fn emit(
        &self,
        level_id: u32,
        level_name: &str,
        args: &[Value],
        path: Option<StackFrame>,
    ) -> Result<()> {
        let meta = {
            let options = self.core.options.read();
            Meta::new(level_id, level_name)
                .with_name(options.name.clone(), options.parent_names.clone())
                .with_path(path)
        };
        self.core.transport(args, meta)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = self.core.options.read();
        f.debug_struct("Logger")
            .field("name", &options.name)
            .field("parent_names", &options.parent_names)
            .field("min_level", &options.min_level)
            .field("transports", &self.core.transports.lock().len())
            .finish()
    }
}

/// Builder for constructing a root [`Logger`] with a fluent API
///
/// # Example
///
/// ```
/// use pretty_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .name("api")
///     .min_level(LogLevel::Info)
///     .mask_values_of_keys(["password", "token"])
///     .build();
///
/// assert_eq!(logger.min_level(), 3);
/// ```
pub struct LoggerBuilder {
    options: LoggerOptions,
    transports: Vec<Box<dyn Transport>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            options: LoggerOptions::default(),
            transports: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: impl Into<u32>) -> Self {
        self.options.min_level = level.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn arguments_array_name(mut self, name: impl Into<String>) -> Self {
        self.options.arguments_array_name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn mask_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.options.mask_placeholder = placeholder.into();
        self
    }

    /// Replace the masked key set
    #[must_use = "builder methods return a new value"]
    pub fn mask_values_of_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.mask_values_of_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn mask_values_of_keys_case_insensitive(mut self, enabled: bool) -> Self {
        self.options.mask_values_of_keys_case_insensitive = enabled;
        self
    }

    /// Add a pattern whose matches are masked in scalar values
    #[must_use = "builder methods return a new value"]
    pub fn mask_values_regex(mut self, pattern: Regex) -> Self {
        self.options.mask_values_regex.push(pattern);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn propagate_logs_to_parent(mut self, enabled: bool) -> Self {
        self.options.propagate_logs_to_parent = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn parent_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.parent_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Add an entry merged into every record's meta
    #[must_use = "builder methods return a new value"]
    pub fn default_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.default_metadata.insert(key.into(), value.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn call_site(mut self, call_site: CallSite) -> Self {
        self.options.call_site = call_site;
        self
    }

    /// Replace masking with `f`
    #[must_use = "builder methods return a new value"]
    pub fn overwrite_mask<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    {
        self.options.overwrite.mask = Some(Arc::new(f));
        self
    }

    /// Compute the final meta from the raw arguments and the merged meta
    #[must_use = "builder methods return a new value"]
    pub fn overwrite_add_meta<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Value], Meta) -> Meta + Send + Sync + 'static,
    {
        self.options.overwrite.add_meta = Some(Arc::new(f));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transports.push(Box::new(transport));
        self
    }

    pub fn build(self) -> Logger {
        let logger = Logger::from_options(self.options);
        for transport in self.transports {
            logger.attach_boxed_transport(transport);
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a new LoggerBuilder for fluent configuration
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
