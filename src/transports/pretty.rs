//! Pretty transport
//!
//! Renders `meta prefix + formatted arguments + rendered errors` and hands
//! the text to an [`Output`] in a single write.

use super::output::{ConsoleOutput, Output};
use crate::core::error_render::render_error;
use crate::core::inspect::format_args;
use crate::core::template::render_meta;
use crate::core::{Meta, PrettySettings, Result, Transport, Value};

pub struct PrettyTransport<O = ConsoleOutput> {
    settings: PrettySettings,
    output: O,
}

impl PrettyTransport<ConsoleOutput> {
    /// Console transport with default settings; styles follow the
    /// terminal's color support
    pub fn console() -> Self {
        Self::console_with(PrettySettings::default().with_styles(ConsoleOutput::supports_styles()))
    }

    pub fn console_with(settings: PrettySettings) -> Self {
        Self::new(ConsoleOutput::new(), settings)
    }
}

impl<O: Output> PrettyTransport<O> {
    pub fn new(output: O, settings: PrettySettings) -> Self {
        Self { settings, output }
    }

    pub fn settings(&self) -> &PrettySettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PrettySettings {
        &mut self.settings
    }

    /// Text written for one record
    pub fn format(&self, args: &[Value], meta: &Meta) -> String {
        let (errors, values): (Vec<&Value>, Vec<&Value>) = args.iter().partition(|arg| arg.is_error());
        let values: Vec<Value> = values.into_iter().cloned().collect();

        let mut text = render_meta(&self.settings, meta);
        text.push_str(&format_args(&values));

        if !errors.is_empty() {
            if !values.is_empty() {
                text.push('\n');
            }
            let rendered: Vec<String> = errors
                .iter()
                .filter_map(|arg| match arg {
                    Value::Error(error) => Some(render_error(&self.settings, &error.read())),
                    _ => None,
                })
                .collect();
            text.push_str(&rendered.join("\n"));
        }
        text
    }
}

impl<O: Output> Transport for PrettyTransport<O> {
    fn transport(&mut self, args: &[Value], meta: &Meta) -> Result<()> {
        let text = self.format(args, meta);
        self.output.write(&text, meta.log_level_id)
    }

    fn flush(&mut self) -> Result<()> {
        self.output.flush()
    }

    fn name(&self) -> &str {
        "pretty"
    }
}
