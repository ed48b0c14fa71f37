//! Logger and pretty transport configuration
//!
//! [`LoggerSettings`] is the partial, deserializable form; it is resolved
//! against defaults (or a parent's options) into [`LoggerOptions`].
//! [`PrettySettings`] configures the pretty transport.

use super::call_site::CallSite;
use super::error::Result;
use super::meta::Meta;
use super::style::{default_styles, Style};
use super::timestamp::TimeZoneSetting;
use super::value::Value;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_MASK_PLACEHOLDER: &str = "[***]";

/// Replaces the masking engine entirely
pub type MaskHook = Arc<dyn Fn(&[Value]) -> Vec<Value> + Send + Sync>;

/// Receives the raw arguments and the merged meta, returns the meta to use
pub type AddMetaHook = Arc<dyn Fn(&[Value], Meta) -> Meta + Send + Sync>;

/// Pipeline stage overrides; never inherited by sub-loggers
#[derive(Clone, Default)]
pub struct Overwrite {
    pub mask: Option<MaskHook>,
    pub add_meta: Option<AddMetaHook>,
}

impl Overwrite {
    pub fn is_empty(&self) -> bool {
        self.mask.is_none() && self.add_meta.is_none()
    }
}

impl fmt::Debug for Overwrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overwrite")
            .field("mask", &self.mask.is_some())
            .field("add_meta", &self.add_meta.is_some())
            .finish()
    }
}

/// Resolved options of one logger
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub name: Option<String>,
    pub min_level: u32,
    /// Key under which the JSON transport nests the argument list
    pub arguments_array_name: Option<String>,
    pub mask_placeholder: String,
    pub mask_values_of_keys: Vec<String>,
    pub mask_values_of_keys_case_insensitive: bool,
    pub mask_values_regex: Vec<Regex>,
    pub propagate_logs_to_parent: bool,
    pub parent_names: Vec<String>,
    pub overwrite: Overwrite,
    pub default_metadata: BTreeMap<String, Value>,
    pub call_site: CallSite,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            name: None,
            min_level: 0,
            arguments_array_name: None,
            mask_placeholder: DEFAULT_MASK_PLACEHOLDER.to_string(),
            mask_values_of_keys: vec!["password".to_string()],
            mask_values_of_keys_case_insensitive: false,
            mask_values_regex: Vec::new(),
            propagate_logs_to_parent: true,
            parent_names: Vec::new(),
            overwrite: Overwrite::default(),
            default_metadata: BTreeMap::new(),
            call_site: CallSite::default(),
        }
    }
}

impl LoggerOptions {
    pub fn from_settings(settings: LoggerSettings) -> Result<Self> {
        let mut options = Self::default();
        options.apply(settings)?;
        Ok(options)
    }

    /// Overlay every field present in `settings`
    ///
    /// Patterns are compiled before anything is changed, so an invalid
    /// pattern leaves the options untouched.
    pub fn apply(&mut self, settings: LoggerSettings) -> Result<()> {
        let patterns = settings
            .mask_values_regex
            .map(|patterns| {
                patterns
                    .iter()
                    .map(|pattern| Regex::new(pattern))
                    .collect::<std::result::Result<Vec<_>, _>>()
            })
            .transpose()?;

        if let Some(patterns) = patterns {
            self.mask_values_regex = patterns;
        }
        if let Some(name) = settings.name {
            self.name = Some(name);
        }
        if let Some(min_level) = settings.min_level {
            self.min_level = min_level;
        }
        if let Some(name) = settings.arguments_array_name {
            self.arguments_array_name = Some(name);
        }
        if let Some(placeholder) = settings.mask_placeholder {
            self.mask_placeholder = placeholder;
        }
        if let Some(keys) = settings.mask_values_of_keys {
            self.mask_values_of_keys = keys;
        }
        if let Some(case_insensitive) = settings.mask_values_of_keys_case_insensitive {
            self.mask_values_of_keys_case_insensitive = case_insensitive;
        }
        if let Some(propagate) = settings.propagate_logs_to_parent {
            self.propagate_logs_to_parent = propagate;
        }
        if let Some(parent_names) = settings.parent_names {
            self.parent_names = parent_names;
        }
        if let Some(metadata) = settings.default_metadata {
            self.default_metadata = metadata;
        }
        if let Some(call_site) = settings.call_site {
            self.call_site = call_site;
        }
        Ok(())
    }

    /// Options for a sub-logger: name and hooks cleared, `settings` applied,
    /// parent names extended by this logger's name
    pub fn derive_child(&self, settings: LoggerSettings) -> Result<Self> {
        let mut child = Self {
            name: None,
            overwrite: Overwrite::default(),
            ..self.clone()
        };
        child.apply(settings)?;
        child.parent_names = self
            .parent_names
            .iter()
            .cloned()
            .chain(self.name.iter().cloned())
            .collect();
        Ok(child)
    }
}

/// Partial logger settings with the camelCase keys of the configuration
/// surface
///
/// ```
/// use pretty_logger::core::LoggerSettings;
///
/// let settings = LoggerSettings::from_json_str(
///     r#"{"name":"api","minLevel":3,"maskValuesOfKeys":["token"]}"#,
/// ).unwrap();
/// assert_eq!(settings.min_level, Some(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerSettings {
    pub name: Option<String>,
    pub min_level: Option<u32>,
    pub arguments_array_name: Option<String>,
    pub mask_placeholder: Option<String>,
    pub mask_values_of_keys: Option<Vec<String>>,
    pub mask_values_of_keys_case_insensitive: Option<bool>,
    /// Pattern sources, compiled when applied
    #[serde(rename = "maskValuesRegEx")]
    pub mask_values_regex: Option<Vec<String>>,
    pub propagate_logs_to_parent: Option<bool>,
    pub parent_names: Option<Vec<String>>,
    pub default_metadata: Option<BTreeMap<String, Value>>,
    pub call_site: Option<CallSite>,
}

impl LoggerSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_min_level(mut self, min_level: impl Into<u32>) -> Self {
        self.min_level = Some(min_level.into());
        self
    }
}

pub const DEFAULT_LOG_TEMPLATE: &str =
    "{{yyyy}}.{{mm}}.{{dd}} {{hh}}:{{MM}}:{{ss}}:{{ms}}\t{{logLevelName}}\t{{filePathWithLine}}{{nameWithDelimiterPrefix}}\t";
pub const DEFAULT_ERROR_TEMPLATE: &str =
    "\n{{errorName}} {{errorMessage}}\nerror stack:\n{{errorStack}}";
pub const DEFAULT_ERROR_STACK_TEMPLATE: &str =
    "  • {{fileName}}\t{{method}}\n\t{{filePathWithLine}}";

/// Settings of the pretty transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrettySettings {
    /// Blank every source-location placeholder
    pub hide_log_position_for_production: bool,
    pub pretty_log_template: String,
    pub pretty_error_template: String,
    pub pretty_error_stack_template: String,
    pub pretty_error_parent_names_separator: String,
    pub pretty_error_logger_name_delimiter: String,
    pub style_pretty_logs: bool,
    pub pretty_log_time_zone: TimeZoneSetting,
    pub pretty_log_styles: BTreeMap<String, Style>,
}

impl Default for PrettySettings {
    fn default() -> Self {
        Self {
            hide_log_position_for_production: false,
            pretty_log_template: DEFAULT_LOG_TEMPLATE.to_string(),
            pretty_error_template: DEFAULT_ERROR_TEMPLATE.to_string(),
            pretty_error_stack_template: DEFAULT_ERROR_STACK_TEMPLATE.to_string(),
            pretty_error_parent_names_separator: ":".to_string(),
            pretty_error_logger_name_delimiter: "\t".to_string(),
            style_pretty_logs: true,
            pretty_log_time_zone: TimeZoneSetting::Utc,
            pretty_log_styles: default_styles(),
        }
    }
}

impl PrettySettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default settings without ANSI styling
    pub fn plain() -> Self {
        Self {
            style_pretty_logs: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.pretty_log_template = template.into();
        self
    }

    #[must_use]
    pub fn with_styles(mut self, enabled: bool) -> Self {
        self.style_pretty_logs = enabled;
        self
    }

    #[must_use]
    pub fn with_time_zone(mut self, zone: TimeZoneSetting) -> Self {
        self.pretty_log_time_zone = zone;
        self
    }

    pub fn style(&self, field: &str) -> Option<&Style> {
        self.pretty_log_styles.get(field)
    }
}
