//! Transport implementations

pub mod json;
pub mod output;
pub mod pretty;

pub use json::JsonTransport;
pub use output::{ConsoleOutput, Output, WriterOutput};
pub use pretty::PrettyTransport;

pub use crate::core::{FnTransport, Transport};
