//! Transport trait for log record destinations

use super::{error::Result, meta::Meta, value::Value};

/// Consumer of `(masked args, meta)` records
///
/// Implementations must not alter the record; a returned error aborts the
/// current logging call and reaches its caller.
pub trait Transport: Send + Sync {
    fn transport(&mut self, args: &[Value], meta: &Meta) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// Transport backed by a closure
///
/// ```
/// use pretty_logger::prelude::*;
///
/// let logger = Logger::new();
/// logger.attach_transport(FnTransport::new("stdout", |args: &[Value], meta: &Meta| {
///     println!("{} {:?}", meta.log_level_name, args);
///     Ok(())
/// }));
/// ```
pub struct FnTransport<F> {
    name: String,
    f: F,
}

impl<F> FnTransport<F>
where
    F: FnMut(&[Value], &Meta) -> Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Transport for FnTransport<F>
where
    F: FnMut(&[Value], &Meta) -> Result<()> + Send + Sync,
{
    fn transport(&mut self, args: &[Value], meta: &Meta) -> Result<()> {
        (self.f)(args, meta)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
