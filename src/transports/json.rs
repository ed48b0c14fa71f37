//! JSON transport for structured logging
//!
//! Writes each record as one JSON object (JSONL). Arguments are stored under
//! their positional index, or as an array under `arguments_array_name` when
//! configured; meta goes under `_meta`.

use super::output::{ConsoleOutput, Output};
use crate::core::{LoggerOptions, Meta, Result, Transport, Value};
use serde_json::{Map, Value as Json};

/// Key holding the serialized meta
pub const META_KEY: &str = "_meta";

pub struct JsonTransport<O = ConsoleOutput> {
    output: O,
    arguments_array_name: Option<String>,
    pretty: bool,
}

impl JsonTransport<ConsoleOutput> {
    pub fn console() -> Self {
        Self::new(ConsoleOutput::new())
    }
}

impl<O: Output> JsonTransport<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            arguments_array_name: None,
            pretty: false,
        }
    }

    /// Use the logger's `arguments_array_name`
    pub fn from_options(options: &LoggerOptions, output: O) -> Self {
        Self {
            arguments_array_name: options.arguments_array_name.clone(),
            ..Self::new(output)
        }
    }

    #[must_use]
    pub fn with_arguments_array_name(mut self, name: impl Into<String>) -> Self {
        self.arguments_array_name = Some(name.into());
        self
    }

    /// Multi-line output
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// JSON document for one record
    pub fn to_json(&self, args: &[Value], meta: &Meta) -> Result<Json> {
        let mut object = Map::new();
        match &self.arguments_array_name {
            Some(name) => {
                let items = args.iter().map(Value::to_json).collect();
                object.insert(name.clone(), Json::Array(items));
            }
            None => {
                for (index, arg) in args.iter().enumerate() {
                    object.insert(index.to_string(), arg.to_json());
                }
            }
        }
        object.insert(META_KEY.to_string(), serde_json::to_value(meta)?);
        Ok(Json::Object(object))
    }
}

impl<O: Output> Transport for JsonTransport<O> {
    fn transport(&mut self, args: &[Value], meta: &Meta) -> Result<()> {
        let json = self.to_json(args, meta)?;
        let text = if self.pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        };
        self.output.write(&text, meta.log_level_id)
    }

    fn flush(&mut self) -> Result<()> {
        self.output.flush()
    }

    fn name(&self) -> &str {
        "json"
    }
}
