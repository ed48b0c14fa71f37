//! Log argument values
//!
//! A closed set of value kinds that log arguments are converted into.
//! Composite kinds are shared handles, so a value graph may contain
//! repeated or cyclic references. Reference identity is the handle's
//! pointer, see [`Value::identity`].

use super::stack_frame::{stack_lines, StackFrame};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Shared, interior-mutable handle used by composite values
pub type Shared<T> = Arc<RwLock<T>>;

fn shared<T>(inner: T) -> Shared<T> {
    Arc::new(RwLock::new(inner))
}

#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(DateTime<Utc>),
    /// Opaque binary data, never traversed
    Buffer(Arc<[u8]>),
    Array(Shared<Vec<Value>>),
    Map(Shared<Vec<(Value, Value)>>),
    Set(Shared<Vec<Value>>),
    Error(Shared<ErrorValue>),
    Object(Shared<Record>),
}

/// Plain record with ordered fields
#[derive(Clone, Default)]
pub struct Record {
    /// Constructor-like type name, preserved through masking
    pub class_name: Option<String>,
    pub fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record tagged with a type name
    pub fn with_class(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            fields: Vec::new(),
        }
    }

    /// Add a field (builder style)
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field, keeping the original position on replace
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// Error-like value: name, message, raw stack text and own properties
#[derive(Clone, Default)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
    /// Raw trace text; the first line is the `Name: message` header
    pub stack: Option<String>,
    pub properties: Vec<(String, Value)>,
}

impl ErrorValue {
    /// Create an error value, capturing a backtrace when enabled via
    /// `RUST_BACKTRACE`/`RUST_LIB_BACKTRACE`
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        let message = message.into();
        let backtrace = std::backtrace::Backtrace::capture();
        let stack = match backtrace.status() {
            std::backtrace::BacktraceStatus::Captured => {
                format!("{}: {}\n{}", name, message, backtrace)
            }
            _ => format!("{}: {}", name, message),
        };
        Self {
            name,
            message,
            stack: Some(stack),
            properties: Vec::new(),
        }
    }

    /// Replace the stack with the given trace lines (header is added)
    #[must_use]
    pub fn with_stack(mut self, frames: &str) -> Self {
        self.stack = Some(format!("{}: {}\n{}", self.name, self.message, frames));
        self
    }

    #[must_use]
    pub fn with_property<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.properties.push((key.into(), value.into()));
        self
    }

    /// Build from a Rust error; the `source()` chain becomes nested `cause` values
    pub fn from_error<E: std::error::Error + ?Sized>(error: &E, name: &str) -> Self {
        let mut value = Self::new(name, error.to_string());
        if let Some(source) = error.source() {
            value
                .properties
                .push(("cause".to_string(), Value::error(Self::from_error(source, "Error"))));
        }
        value
    }

    /// Parsed stack frames, header excluded
    pub fn frames(&self) -> Vec<StackFrame> {
        self.stack
            .as_deref()
            .map(|stack| stack_lines(stack).iter().map(|l| StackFrame::parse(l)).collect())
            .unwrap_or_default()
    }
}

impl Value {
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(shared(items))
    }

    pub fn map(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(shared(entries))
    }

    pub fn set(items: Vec<Value>) -> Self {
        Value::Set(shared(items))
    }

    pub fn object(record: Record) -> Self {
        Value::Object(shared(record))
    }

    pub fn error(error: ErrorValue) -> Self {
        Value::Error(shared(error))
    }

    pub fn buffer(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Buffer(Arc::from(bytes.into()))
    }

    /// Convert a Rust error, naming it after its type
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        let full = std::any::type_name::<E>();
        let name = full
            .split('<')
            .next()
            .and_then(|path| path.rsplit("::").next())
            .unwrap_or(full);
        Value::error(ErrorValue::from_error(error, name))
    }

    /// Reference identity of composite values
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(a) | Value::Set(a) => Some(Arc::as_ptr(a) as *const () as usize),
            Value::Map(m) => Some(Arc::as_ptr(m) as *const () as usize),
            Value::Error(e) => Some(Arc::as_ptr(e) as *const () as usize),
            Value::Object(o) => Some(Arc::as_ptr(o) as *const () as usize),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Field of an object or property of an error
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(record) => record.read().get(key).cloned(),
            Value::Error(error) => error
                .read()
                .properties
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    /// Insert a field into an object value; returns false for other kinds
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        match self {
            Value::Object(record) => {
                record.write().insert(key, value);
                true
            }
            _ => false,
        }
    }

    /// Cycle-safe JSON conversion; repeated ancestors become `"[Circular]"`
    pub fn to_json(&self) -> serde_json::Value {
        let mut ancestors = HashSet::new();
        self.to_json_inner(&mut ancestors)
    }

    fn to_json_inner(&self, ancestors: &mut HashSet<usize>) -> serde_json::Value {
        use serde_json::Value as Json;

        if let Some(id) = self.identity() {
            if !ancestors.insert(id) {
                return Json::String("[Circular]".to_string());
            }
        }

        let json = match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::Date(d) => Json::String(d.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()),
            Value::Buffer(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
            Value::Array(items) | Value::Set(items) => {
                let items = items.read().clone();
                Json::Array(items.iter().map(|v| v.to_json_inner(ancestors)).collect())
            }
            Value::Map(entries) => {
                let entries = entries.read().clone();
                let mut object = serde_json::Map::new();
                for (key, value) in &entries {
                    object.insert(map_key(key), value.to_json_inner(ancestors));
                }
                Json::Object(object)
            }
            Value::Error(error) => {
                let error = error.read().clone();
                let mut object = serde_json::Map::new();
                object.insert("name".to_string(), Json::String(error.name.clone()));
                object.insert("message".to_string(), Json::String(error.message.clone()));
                let frames = error
                    .frames()
                    .into_iter()
                    .map(|frame| serde_json::to_value(frame).unwrap_or(Json::Null))
                    .collect();
                object.insert("stack".to_string(), Json::Array(frames));
                for (key, value) in &error.properties {
                    object.insert(key.clone(), value.to_json_inner(ancestors));
                }
                Json::Object(object)
            }
            Value::Object(record) => {
                let fields = record.read().fields.clone();
                let mut object = serde_json::Map::new();
                for (key, value) in &fields {
                    object.insert(key.clone(), value.to_json_inner(ancestors));
                }
                Json::Object(object)
            }
        };

        if let Some(id) = self.identity() {
            ancestors.remove(&id);
        }
        json
    }
}

fn map_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => super::inspect::inspect(other),
    }
}

/// Scalars compare by value, composites by identity
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Buffer(a), Value::Buffer(b)) => a == b,
            _ => match (self.identity(), other.identity()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", super::inspect::inspect(self))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", super::inspect::inspect(other)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                let mut record = Record::new();
                for (key, value) in map {
                    record.fields.push((key, Value::from(value)));
                }
                Value::object(record)
            }
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        i64::try_from(i)
            .map(Value::Int)
            .unwrap_or(Value::Float(i as f64))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::from(i as u64)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::object(record)
    }
}

impl From<ErrorValue> for Value {
    fn from(error: ErrorValue) -> Self {
        Value::error(error)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map(Into::into).unwrap_or(Value::Null)
    }
}
