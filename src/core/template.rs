//! Placeholder templates
//!
//! Templates contain `{{name}}` placeholders. Each one is replaced by its
//! value, or by an empty string when no value exists. With styling enabled
//! every substituted value is wrapped in the style configured for its
//! placeholder name and followed by a reset sequence. Styling also needs
//! `colored` to allow colors (see [`colors_enabled`]).

use super::meta::Meta;
use super::options::PrettySettings;
use super::stack_frame::StackFrame;
use super::style::{colors_enabled, RESET};
use super::timestamp::{compact_date_time, date_iso_str, raw_iso_str, DateFields};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("placeholder pattern is valid"));

/// Date/time fragment rendered from one precomputed value
pub const DATE_TIME_FRAGMENT: &str = "{{yyyy}}.{{mm}}.{{dd}} {{hh}}:{{MM}}:{{ss}}:{{ms}}";

const DATE_TIME_KEY: &str = "__dateTime";
const DATE_TIME_PLACEHOLDER: &str = "{{__dateTime}}";
const DATE_FIELD_KEYS: [&str; 7] = ["yyyy", "mm", "dd", "hh", "MM", "ss", "ms"];

pub type PlaceholderValues = BTreeMap<String, String>;

/// Substitute all placeholders of `template`
pub fn render(settings: &PrettySettings, template: &str, values: &PlaceholderValues) -> String {
    render_styled(settings, styling(settings), template, values)
}

/// Whether placeholders are styled and followed by a reset
pub fn styling(settings: &PrettySettings) -> bool {
    settings.style_pretty_logs && colors_enabled()
}

fn render_styled(
    settings: &PrettySettings,
    styled: bool,
    template: &str,
    values: &PlaceholderValues,
) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            let value = values.get(key).map(String::as_str).unwrap_or_default();
            if styled {
                style_value(settings, key, value)
            } else {
                value.to_string()
            }
        })
        .into_owned()
}

fn style_value(settings: &PrettySettings, key: &str, value: &str) -> String {
    let style_key = if key == DATE_TIME_KEY { "dateIsoStr" } else { key };
    let styled = match settings.style(style_key) {
        Some(style) => style.apply(value),
        None => value.to_string(),
    };
    format!("{}{}", styled, RESET)
}

/// Render the log line prefix for `meta`
pub fn render_meta(settings: &PrettySettings, meta: &Meta) -> String {
    render_meta_with(settings, meta, true)
}

/// Render the prefix, optionally without collapsing the date/time fragment
///
/// The first date/time fragment is one styled unit in both variants, so the
/// output is the same byte for byte.
pub fn render_meta_with(settings: &PrettySettings, meta: &Meta, collapse_date_time: bool) -> String {
    let template = &settings.pretty_log_template;
    if collapse_date_time {
        let template = template.replacen(DATE_TIME_FRAGMENT, DATE_TIME_PLACEHOLDER, 1);
        let values = meta_values(settings, meta, &template);
        return render(settings, &template, &values);
    }

    let values = meta_values(settings, meta, template);
    match template.split_once(DATE_TIME_FRAGMENT) {
        Some((head, tail)) => {
            let styled = styling(settings);
            let date_time = render_styled(settings, false, DATE_TIME_FRAGMENT, &values);
            let date_time = if styled {
                style_value(settings, DATE_TIME_KEY, &date_time)
            } else {
                date_time
            };
            format!(
                "{}{}{}",
                render_styled(settings, styled, head, &values),
                date_time,
                render_styled(settings, styled, tail, &values)
            )
        }
        None => render(settings, template, &values),
    }
}

/// Placeholder values for the meta template
pub fn meta_values(settings: &PrettySettings, meta: &Meta, template: &str) -> PlaceholderValues {
    let zone = settings.pretty_log_time_zone;
    let mut values = PlaceholderValues::new();

    if template.contains(DATE_TIME_PLACEHOLDER) {
        values.insert(DATE_TIME_KEY.to_string(), compact_date_time(&meta.date, zone));
    }
    if DATE_FIELD_KEYS
        .iter()
        .any(|key| template.contains(&format!("{{{{{}}}}}", key)))
    {
        let fields = DateFields::new(&meta.date, zone);
        for (key, value) in DATE_FIELD_KEYS.iter().zip([
            fields.yyyy,
            fields.mm,
            fields.dd,
            fields.hh,
            fields.minutes,
            fields.ss,
            fields.ms,
        ]) {
            values.insert(key.to_string(), value);
        }
    }
    values.insert("rawIsoStr".to_string(), raw_iso_str(&meta.date, zone));
    values.insert("dateIsoStr".to_string(), date_iso_str(&meta.date, zone));
    values.insert("logLevelName".to_string(), meta.log_level_name.clone());

    let path = if settings.hide_log_position_for_production {
        None
    } else {
        meta.path.as_ref()
    };
    let field = |value: Option<&String>| value.cloned().unwrap_or_default();
    values.insert("fileName".to_string(), field(path.and_then(|p| p.file_name.as_ref())));
    values.insert(
        "fileNameWithLine".to_string(),
        field(path.and_then(|p| p.file_name_with_line.as_ref())),
    );
    values.insert("filePath".to_string(), field(path.and_then(|p| p.file_path.as_ref())));
    values.insert("fileLine".to_string(), field(path.and_then(|p| p.file_line.as_ref())));
    values.insert(
        "filePathWithLine".to_string(),
        field(path.and_then(|p| p.file_path_with_line.as_ref())),
    );
    values.insert(
        "fullFilePath".to_string(),
        field(path.and_then(|p| p.full_file_path.as_ref())),
    );

    let name = compose_name(
        &meta.parent_names,
        meta.name.as_deref(),
        &settings.pretty_error_parent_names_separator,
    );
    let delimiter = &settings.pretty_error_logger_name_delimiter;
    let (prefixed, suffixed) = if name.is_empty() {
        (String::new(), String::new())
    } else {
        (format!("{}{}", delimiter, name), format!("{}{}", name, delimiter))
    };
    values.insert("name".to_string(), name);
    values.insert("nameWithDelimiterPrefix".to_string(), prefixed);
    values.insert("nameWithDelimiterSuffix".to_string(), suffixed);

    values
}

/// Parent names joined by `separator`, then the logger's own name
pub fn compose_name(parent_names: &[String], name: Option<&str>, separator: &str) -> String {
    let mut composed = parent_names.join(separator);
    if let Some(name) = name {
        if !composed.is_empty() {
            composed.push_str(separator);
        }
        composed.push_str(name);
    }
    composed
}

/// Placeholder values of a stack frame; absent fields are left out
pub fn frame_values(frame: &StackFrame) -> PlaceholderValues {
    [
        ("fullFilePath", &frame.full_file_path),
        ("fileName", &frame.file_name),
        ("fileNameWithLine", &frame.file_name_with_line),
        ("filePath", &frame.file_path),
        ("fileLine", &frame.file_line),
        ("fileColumn", &frame.file_column),
        ("filePathWithLine", &frame.file_path_with_line),
        ("method", &frame.method),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.clone().map(|value| (key.to_string(), value)))
    .collect()
}
