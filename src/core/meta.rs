//! Per-record metadata

use super::log_level::LogLevel;
use super::stack_frame::StackFrame;
use super::value::Value;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Metadata attached to every record handed to a transport
///
/// `extra` holds default and caller-injected entries; it is flattened into
/// the serialized form next to the fixed fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub date: DateTime<Utc>,
    pub log_level_id: u32,
    pub log_level_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub parent_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<StackFrame>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Meta {
    pub fn new(log_level_id: u32, log_level_name: impl Into<String>) -> Self {
        Self {
            date: Utc::now(),
            log_level_id,
            log_level_name: log_level_name.into(),
            name: None,
            parent_names: Vec::new(),
            path: None,
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: Option<String>, parent_names: Vec<String>) -> Self {
        self.name = name;
        self.parent_names = parent_names;
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: Option<StackFrame>) -> Self {
        self.path = path;
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Add default entries; keys already present are kept
    pub fn merge_defaults(&mut self, defaults: &BTreeMap<String, Value>) {
        for (key, value) in defaults {
            self.extra
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Default level for this record's id, if it is one
    pub fn level(&self) -> Option<LogLevel> {
        LogLevel::from_id(self.log_level_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_defaults_keeps_existing() {
        let mut meta = Meta::new(3, "INFO").with_extra("requestId", "abc");
        let defaults: BTreeMap<String, Value> = [
            ("requestId".to_string(), Value::from("default")),
            ("service".to_string(), Value::from("api")),
        ]
        .into_iter()
        .collect();

        meta.merge_defaults(&defaults);
        assert_eq!(meta.extra["requestId"], Value::from("abc"));
        assert_eq!(meta.extra["service"], Value::from("api"));
    }

    #[test]
    fn test_serialize_flattens_extra() {
        let meta = Meta::new(7, "NOTICE")
            .with_name(Some("worker".into()), vec!["app".into()])
            .with_extra("service", "api");
        let json = serde_json::to_value(&meta).expect("meta serializes");
        assert_eq!(json["logLevelId"], 7);
        assert_eq!(json["logLevelName"], "NOTICE");
        assert_eq!(json["name"], "worker");
        assert_eq!(json["parentNames"], serde_json::json!(["app"]));
        assert_eq!(json["service"], "api");
        assert!(json.get("path").is_none());
    }

    #[test]
    fn test_custom_level_has_no_default() {
        assert_eq!(Meta::new(4, "WARN").level(), Some(LogLevel::Warn));
        assert_eq!(Meta::new(42, "CUSTOM").level(), None);
    }
}
