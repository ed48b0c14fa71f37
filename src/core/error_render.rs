//! Error rendering for the pretty transport

use super::options::PrettySettings;
use super::template::{frame_values, render, PlaceholderValues};
use super::value::ErrorValue;

/// Render an error through the error and stack-frame templates
pub fn render_error(settings: &PrettySettings, error: &ErrorValue) -> String {
    let stack = error
        .frames()
        .iter()
        .map(|frame| {
            render(
                settings,
                &settings.pretty_error_stack_template,
                &frame_values(frame),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut values = PlaceholderValues::new();
    values.insert("errorName".to_string(), format!(" {} ", error.name));
    values.insert("errorMessage".to_string(), error.message.clone());
    values.insert("errorStack".to_string(), stack);
    render(settings, &settings.pretty_error_template, &values)
}
