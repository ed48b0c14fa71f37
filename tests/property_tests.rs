//! Property-based tests for pretty_logger using proptest

use pretty_logger::core::inspect::inspect_depth;
use pretty_logger::core::template::compose_name;
use pretty_logger::core::MaskingEngine;
use pretty_logger::prelude::*;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Level names parse back to the same level, in any case
    #[test]
    fn test_log_level_str_roundtrip(level in any_level(), lower in any::<bool>()) {
        let text = if lower { level.to_str().to_lowercase() } else { level.to_str().to_string() };
        let parsed: LogLevel = text.parse().unwrap();
        prop_assert_eq!(parsed, level);
        prop_assert_eq!(LogLevel::from_id(level.id()), Some(level));
    }

    /// Ordering of levels follows their ids
    #[test]
    fn test_log_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, a.id() <= b.id());
    }
}

// ============================================================================
// Level Filter Tests
// ============================================================================

proptest! {
    /// A record reaches the sink exactly when its id is at least the minimum
    #[test]
    fn test_level_filter(min_level in 0u32..10, level_id in 0u32..10) {
        let counter = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&counter);
        let logger = Logger::builder()
            .min_level(min_level)
            .call_site(CallSite::Disabled)
            .transport(FnTransport::new("count", move |_: &[Value], _: &Meta| {
                sink.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }))
            .build();

        logger.log(level_id, "ANY", &["x".into()]).unwrap();
        let expected = usize::from(level_id >= min_level);
        prop_assert_eq!(counter.load(Ordering::Relaxed), expected);
    }
}

// ============================================================================
// Stack Frame Parsing Tests
// ============================================================================

proptest! {
    /// `<path>:<line>:<col>` yields the captured digits
    #[test]
    fn test_stack_frame_digits(
        dirs in prop::collection::vec("[a-z][a-z0-9_]{0,7}", 1..4),
        file in "[a-z][a-z0-9_]{0,7}\\.(rs|ts|js)",
        line in 1u32..100_000,
        column in 1u32..500,
    ) {
        let path = format!("/{}/{}", dirs.join("/"), file);
        let frame = StackFrame::parse_with_root(&format!("{}:{}:{}", path, line, column), None);
        let line_text = line.to_string();
        prop_assert_eq!(frame.file_line.as_deref(), Some(line_text.as_str()));
        let column_text = column.to_string();
        prop_assert_eq!(frame.file_column.as_deref(), Some(column_text.as_str()));
        let expected = format!("{}:{}", file, line);
        prop_assert_eq!(frame.file_name_with_line.as_deref(), Some(expected.as_str()));
        prop_assert_eq!(frame.full_file_path.as_deref(), Some(path.as_str()));
    }

    /// Lines without a path never panic and yield an empty frame
    #[test]
    fn test_stack_frame_without_path(text in "[a-zA-Z ]{0,40}") {
        prop_assert!(StackFrame::parse_with_root(&text, None).is_empty());
    }
}

// ============================================================================
// Masking Tests
// ============================================================================

proptest! {
    /// A sensitive key is masked at any nesting depth
    #[test]
    fn test_masking_any_depth(depth in 0usize..12, secret in "[a-z0-9]{1,16}") {
        let engine = MaskingEngine::new(vec!["password".to_string()], false, "[***]", Vec::new());
        let mut value = Value::object(Record::new().with_field("password", secret.as_str()));
        for level in 0..depth {
            value = if level % 2 == 0 {
                Value::array(vec![value])
            } else {
                Value::object(Record::new().with_field("child", value))
            };
        }

        let masked = engine.mask(&[value]);
        let rendered = inspect_depth(&masked[0], depth + 2);
        prop_assert!(rendered.contains("password: '[***]'"));
        let leaked = format!("'{}'", secret);
        prop_assert!(!rendered.contains(&leaked));
    }

    /// Case-sensitive matching leaves differently cased keys alone
    #[test]
    fn test_masking_case_sensitivity(insensitive in any::<bool>()) {
        let engine = MaskingEngine::new(vec!["token".to_string()], insensitive, "[***]", Vec::new());
        let value = Value::object(Record::new().with_field("Token", "abc"));
        let masked = engine.mask(&[value]);
        let expected = if insensitive { "[***]" } else { "abc" };
        prop_assert_eq!(masked[0].get("Token"), Some(Value::from(expected)));
    }
}

// ============================================================================
// Name Composition Tests
// ============================================================================

proptest! {
    /// Parents and own name joined by the separator, never with stray separators
    #[test]
    fn test_compose_name(
        parents in prop::collection::vec("[a-z]{1,6}", 0..5),
        name in prop::option::of("[a-z]{1,6}"),
    ) {
        let composed = compose_name(&parents, name.as_deref(), ":");
        let mut expected = parents.clone();
        expected.extend(name.clone());
        prop_assert_eq!(composed.clone(), expected.join(":"));
        prop_assert!(!composed.starts_with(':'));
        prop_assert!(!composed.ends_with(':'));
    }

    /// Sub-logger chains accumulate parent names in order
    #[test]
    fn test_sub_logger_parent_names(names in prop::collection::vec("[a-z]{1,6}", 1..5)) {
        let root = Logger::builder().name(names[0].clone()).build();
        let mut current = root.clone();
        let mut chain = vec![root];
        for name in &names[1..] {
            current = current.get_sub_logger(LoggerSettings::named(name.clone())).unwrap();
            chain.push(current.clone());
        }
        let last = chain.last().unwrap();
        prop_assert_eq!(last.options().parent_names, names[..names.len() - 1].to_vec());
        prop_assert_eq!(last.name(), Some(names[names.len() - 1].clone()));
    }
}
