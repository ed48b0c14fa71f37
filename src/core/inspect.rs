//! Human-readable formatting of log arguments
//!
//! Produces the console representation of [`Value`]s: printf-style
//! interpolation of a leading string argument, raw strings at the top
//! level, quoted strings inside containers and cycle markers for
//! self-referencing graphs.

use super::value::Value;
use std::collections::HashSet;

/// Containers nested deeper than this are summarized as `[Object]`/`[Array]`
pub const DEFAULT_DEPTH: usize = 2;

const MAX_BUFFER_BYTES: usize = 50;

/// Format all arguments of a log call into one line
pub fn format_args(args: &[Value]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(args.len());
    let mut rest = args;

    if let Some((Value::String(first), tail)) = args.split_first() {
        if first.contains('%') {
            let (text, consumed) = interpolate(first, tail);
            parts.push(text);
            rest = &tail[consumed..];
        } else {
            parts.push(first.clone());
            rest = tail;
        }
    }

    for arg in rest {
        parts.push(match arg {
            Value::String(s) => s.clone(),
            other => inspect(other),
        });
    }

    parts.join(" ")
}

/// Expand `%s %d %i %f %j %o %O %c %%`; returns the text and number of args consumed
fn interpolate(format: &str, args: &[Value]) -> (String, usize) {
    let mut out = String::with_capacity(format.len());
    let mut next = 0;
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(&spec) = chars.peek() else {
            out.push('%');
            break;
        };
        if spec == '%' {
            chars.next();
            out.push('%');
            continue;
        }
        if !matches!(spec, 's' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O' | 'c') {
            out.push('%');
            continue;
        }
        chars.next();
        let Some(arg) = args.get(next) else {
            out.push('%');
            out.push(spec);
            continue;
        };
        next += 1;
        match spec {
            's' => out.push_str(&match arg {
                Value::String(s) => s.clone(),
                other => inspect_depth(other, 1),
            }),
            'd' => out.push_str(&match arg {
                Value::Int(i) => i.to_string(),
                other => number(other).map(format_number).unwrap_or_else(|| "NaN".into()),
            }),
            'i' => out.push_str(&match arg {
                Value::Int(i) => i.to_string(),
                other => number(other)
                    .map(|n| format_number(n.trunc()))
                    .unwrap_or_else(|| "NaN".into()),
            }),
            'f' => out.push_str(&number(arg).map(format_number).unwrap_or_else(|| "NaN".into())),
            'j' => out.push_str(&serde_json::to_string(&arg.to_json()).unwrap_or_default()),
            'o' | 'O' => out.push_str(&inspect(arg)),
            // CSS directives have no console meaning
            _ => {}
        }
    }

    (out, next)
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// Inspect a single value with the default depth
pub fn inspect(value: &Value) -> String {
    inspect_depth(value, DEFAULT_DEPTH)
}

pub fn inspect_depth(value: &Value, depth: usize) -> String {
    let mut ancestors = HashSet::new();
    let mut out = String::new();
    write_value(&mut out, value, 0, depth, &mut ancestors);
    out
}

fn write_value(
    out: &mut String,
    value: &Value,
    level: usize,
    depth: usize,
    ancestors: &mut HashSet<usize>,
) {
    if let Some(id) = value.identity() {
        if ancestors.contains(&id) {
            out.push_str("[Circular]");
            return;
        }
    }

    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&format_number(*f)),
        Value::String(s) => out.push_str(&quote(s)),
        Value::Date(d) => out.push_str(&d.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()),
        Value::Buffer(bytes) => {
            out.push_str("<Buffer");
            for byte in bytes.iter().take(MAX_BUFFER_BYTES) {
                out.push_str(&format!(" {:02x}", byte));
            }
            if bytes.len() > MAX_BUFFER_BYTES {
                out.push_str(&format!(" ... {} more bytes", bytes.len() - MAX_BUFFER_BYTES));
            }
            out.push('>');
        }
        Value::Error(error) => {
            let error = error.read().clone();
            out.push('[');
            out.push_str(&error.name);
            if !error.message.is_empty() {
                out.push_str(": ");
                out.push_str(&error.message);
            }
            out.push(']');
            if !error.properties.is_empty() {
                with_ancestor(value, ancestors, |ancestors| {
                    out.push_str(" {");
                    write_entries(out, &error.properties, level, depth, ancestors);
                    out.push_str(" }");
                });
            }
        }
        Value::Array(items) => {
            let items = items.read().clone();
            if items.is_empty() {
                out.push_str("[]");
            } else if level > depth {
                out.push_str("[Array]");
            } else {
                with_ancestor(value, ancestors, |ancestors| {
                    out.push_str("[ ");
                    for (idx, item) in items.iter().enumerate() {
                        if idx > 0 {
                            out.push_str(", ");
                        }
                        write_value(out, item, level + 1, depth, ancestors);
                    }
                    out.push_str(" ]");
                });
            }
        }
        Value::Set(items) => {
            let items = items.read().clone();
            out.push_str(&format!("Set({})", items.len()));
            if items.is_empty() {
                out.push_str(" {}");
            } else if level > depth {
                out.push_str(" [Set]");
            } else {
                with_ancestor(value, ancestors, |ancestors| {
                    out.push_str(" { ");
                    for (idx, item) in items.iter().enumerate() {
                        if idx > 0 {
                            out.push_str(", ");
                        }
                        write_value(out, item, level + 1, depth, ancestors);
                    }
                    out.push_str(" }");
                });
            }
        }
        Value::Map(entries) => {
            let entries = entries.read().clone();
            out.push_str(&format!("Map({})", entries.len()));
            if entries.is_empty() {
                out.push_str(" {}");
            } else if level > depth {
                out.push_str(" [Map]");
            } else {
                with_ancestor(value, ancestors, |ancestors| {
                    out.push_str(" { ");
                    for (idx, (key, item)) in entries.iter().enumerate() {
                        if idx > 0 {
                            out.push_str(", ");
                        }
                        write_value(out, key, level + 1, depth, ancestors);
                        out.push_str(" => ");
                        write_value(out, item, level + 1, depth, ancestors);
                    }
                    out.push_str(" }");
                });
            }
        }
        Value::Object(record) => {
            let record = record.read().clone();
            if let Some(class_name) = &record.class_name {
                out.push_str(class_name);
                out.push(' ');
            }
            if record.fields.is_empty() {
                out.push_str("{}");
            } else if level > depth {
                out.push_str("[Object]");
            } else {
                with_ancestor(value, ancestors, |ancestors| {
                    out.push('{');
                    write_entries(out, &record.fields, level, depth, ancestors);
                    out.push_str(" }");
                });
            }
        }
    }
}

fn write_entries(
    out: &mut String,
    fields: &[(String, Value)],
    level: usize,
    depth: usize,
    ancestors: &mut HashSet<usize>,
) {
    for (idx, (key, item)) in fields.iter().enumerate() {
        out.push_str(if idx > 0 { ", " } else { " " });
        out.push_str(&property_key(key));
        out.push_str(": ");
        write_value(out, item, level + 1, depth, ancestors);
    }
}

fn with_ancestor<F>(value: &Value, ancestors: &mut HashSet<usize>, f: F)
where
    F: FnOnce(&mut HashSet<usize>),
{
    let id = value.identity();
    if let Some(id) = id {
        ancestors.insert(id);
    }
    f(ancestors);
    if let Some(id) = id {
        ancestors.remove(&id);
    }
}

fn property_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = match chars.next() {
        Some(first) => {
            (first.is_alphabetic() || first == '_' || first == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        None => false,
    };
    if is_identifier {
        key.to_string()
    } else {
        quote(key)
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'").replace('\n', "\\n"))
}
