//! Sensitive value masking
//!
//! [`MaskingEngine`] deep-clones log arguments, replacing values stored under
//! configured keys with a placeholder and rewriting scalar text that matches
//! any configured pattern. Each top-level argument is traversed
//! independently; a composite reached a second time within one traversal is
//! copied one level deep instead of being recursed into, which keeps cyclic
//! graphs finite.

use super::options::LoggerOptions;
use super::value::{ErrorValue, Record, Value};
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct MaskingEngine {
    keys: HashSet<String>,
    case_insensitive: bool,
    placeholder: String,
    patterns: Vec<Regex>,
}

impl MaskingEngine {
    pub fn new<I, S>(
        keys: I,
        case_insensitive: bool,
        placeholder: impl Into<String>,
        patterns: Vec<Regex>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = keys
            .into_iter()
            .map(Into::into)
            .map(|key: String| if case_insensitive { key.to_lowercase() } else { key })
            .collect();
        Self {
            keys,
            case_insensitive,
            placeholder: placeholder.into(),
            patterns,
        }
    }

    pub fn from_options(options: &LoggerOptions) -> Self {
        Self::new(
            options.mask_values_of_keys.iter().cloned(),
            options.mask_values_of_keys_case_insensitive,
            options.mask_placeholder.clone(),
            options.mask_values_regex.clone(),
        )
    }

    /// Nothing to mask when neither keys nor patterns are configured
    pub fn is_active(&self) -> bool {
        !self.keys.is_empty() || !self.patterns.is_empty()
    }

    pub fn mask(&self, args: &[Value]) -> Vec<Value> {
        if !self.is_active() {
            return args.to_vec();
        }
        args.iter().map(|arg| self.mask_value(arg)).collect()
    }

    /// Mask a single value with a fresh cycle-tracking set
    pub fn mask_value(&self, value: &Value) -> Value {
        let mut seen = HashSet::new();
        self.mask_recursive(value, &mut seen)
    }

    fn mask_recursive(&self, value: &Value, seen: &mut HashSet<usize>) -> Value {
        if let Some(id) = value.identity() {
            if !seen.insert(id) {
                return self.shallow_copy(value);
            }
        }

        match value {
            Value::Buffer(bytes) => Value::Buffer(Arc::clone(bytes)),
            Value::Map(entries) => Value::map(entries.read().clone()),
            Value::Set(items) => Value::set(items.read().clone()),
            Value::Array(items) => {
                let items = items.read().clone();
                Value::array(
                    items
                        .iter()
                        .map(|item| self.mask_recursive(item, seen))
                        .collect(),
                )
            }
            Value::Date(date) => Value::Date(*date),
            Value::Error(error) => {
                let error = error.read().clone();
                let properties = self.mask_fields(&error.properties, |item| {
                    self.mask_recursive(item, seen)
                });
                Value::error(ErrorValue { properties, ..error })
            }
            Value::Object(record) => {
                let record = record.read().clone();
                let fields =
                    self.mask_fields(&record.fields, |item| self.mask_recursive(item, seen));
                Value::object(Record {
                    class_name: record.class_name,
                    fields,
                })
            }
            Value::Null => Value::Null,
            scalar => self.mask_scalar(scalar),
        }
    }

    /// One-level copy of a repeated composite; direct keys are still masked
    fn shallow_copy(&self, value: &Value) -> Value {
        match value {
            Value::Array(items) => Value::array(items.read().clone()),
            Value::Map(entries) => Value::map(entries.read().clone()),
            Value::Set(items) => Value::set(items.read().clone()),
            Value::Error(error) => {
                let error = error.read().clone();
                let properties = self.mask_fields(&error.properties, Value::clone);
                Value::error(ErrorValue { properties, ..error })
            }
            Value::Object(record) => {
                let record = record.read().clone();
                let fields = self.mask_fields(&record.fields, Value::clone);
                Value::object(Record {
                    class_name: record.class_name,
                    fields,
                })
            }
            other => other.clone(),
        }
    }

    fn mask_fields<F>(&self, fields: &[(String, Value)], mut recurse: F) -> Vec<(String, Value)>
    where
        F: FnMut(&Value) -> Value,
    {
        fields
            .iter()
            .map(|(key, item)| {
                let masked = if self.is_masked_key(key) {
                    Value::String(self.placeholder.clone())
                } else {
                    recurse(item)
                };
                (key.clone(), masked)
            })
            .collect()
    }

    fn is_masked_key(&self, key: &str) -> bool {
        if self.case_insensitive {
            self.keys.contains(&key.to_lowercase())
        } else {
            self.keys.contains(key)
        }
    }

    fn mask_scalar(&self, value: &Value) -> Value {
        if self.patterns.is_empty() {
            return value.clone();
        }
        let mut text = value.to_string();
        for pattern in &self.patterns {
            text = pattern
                .replace_all(&text, regex::NoExpand(&self.placeholder))
                .into_owned();
        }
        Value::String(text)
    }
}
