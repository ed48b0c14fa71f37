//! Integration tests for pretty_logger
//!
//! These tests verify:
//! - Level filtering and runtime level changes
//! - Delivery order and identical records across transports
//! - Masking through the full pipeline, including cycles
//! - Sub-logger name chains and propagation
//! - Pretty and JSON output

use chrono::{TimeZone, Utc};
use pretty_logger::core::template::render_meta;
use pretty_logger::prelude::*;
use std::sync::{Arc, Mutex};

type Lines = Arc<Mutex<Vec<String>>>;
type Records = Arc<Mutex<Vec<(String, Vec<Value>, Meta)>>>;

fn line_output(lines: &Lines) -> impl Output + 'static {
    let lines = Arc::clone(lines);
    move |text: &str, _level: u32| {
        lines.lock().unwrap().push(text.to_string());
        Ok::<(), LoggerError>(())
    }
}

fn collector(tag: &str, records: &Records) -> impl Transport + 'static {
    let tag = tag.to_string();
    let records = Arc::clone(records);
    FnTransport::new(tag.clone(), move |args: &[Value], meta: &Meta| {
        records
            .lock()
            .unwrap()
            .push((tag.clone(), args.to_vec(), meta.clone()));
        Ok(())
    })
}

#[test]
fn test_records_below_min_level_reach_nothing() {
    let records = Records::default();
    let root = Logger::builder()
        .min_level(LogLevel::Info)
        .transport(collector("root", &records))
        .build();
    let child = root
        .get_sub_logger(LoggerSettings::named("child"))
        .unwrap();
    child.attach_transport(collector("child", &records));

    child.debug(&["hidden".into()]).unwrap();
    root.trace(&["hidden".into()]).unwrap();

    assert!(records.lock().unwrap().is_empty());
    assert_eq!(child.metrics().filtered_count(), 1);
    assert_eq!(root.metrics().filtered_count(), 1);
}

#[test]
fn test_min_level_change_applies_to_next_call() {
    let records = Records::default();
    let logger = Logger::builder()
        .min_level(1u32)
        .transport(collector("sink", &records))
        .build();

    logger.trace(&["before".into()]).unwrap();
    logger.set_min_level(2u32);
    logger.trace(&["after".into()]).unwrap();

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].1[0], Value::from("before"));
}

#[test]
fn test_every_sink_sees_same_record_in_order() {
    let records = Records::default();
    let logger = Logger::new();
    for tag in ["a", "b", "c"] {
        logger.attach_transport(collector(tag, &records));
    }

    let user = Value::object(Record::new().with_field("password", "hunter2").with_field("id", 7));
    logger.info(&["login".into(), user]).unwrap();

    let records = records.lock().unwrap();
    let tags: Vec<&str> = records.iter().map(|(tag, _, _)| tag.as_str()).collect();
    assert_eq!(tags, ["a", "b", "c"]);
    for (_, args, meta) in records.iter() {
        assert_eq!(meta, &records[0].2);
        assert_eq!(args[1].get("password"), Some(Value::from("[***]")));
        assert_eq!(args[1].get("id"), Some(Value::from(7)));
    }
    // The masked copy is shared by every sink of one call
    assert_eq!(records[0].1, records[2].1);
}

#[test]
fn test_masking_deep_and_case_sensitive() {
    let records = Records::default();
    let logger = Logger::builder()
        .mask_values_of_keys(["apiKey"])
        .transport(collector("sink", &records))
        .build();

    let inner = Value::object(Record::new().with_field("apiKey", "k1").with_field("APIKEY", "k2"));
    let middle = Value::array(vec![Value::object(Record::new().with_field("inner", inner))]);
    let original = Value::object(Record::new().with_field("list", middle));
    logger.info(&[original.clone()]).unwrap();

    let records = records.lock().unwrap();
    let masked = &records[0].1[0];
    let rendered = pretty_logger::core::inspect::inspect_depth(masked, 8);
    assert!(rendered.contains("apiKey: '[***]'"));
    assert!(rendered.contains("APIKEY: 'k2'"));

    // The caller's value is untouched
    let untouched = pretty_logger::core::inspect::inspect_depth(&original, 8);
    assert!(untouched.contains("apiKey: 'k1'"));
}

#[test]
fn test_masking_cyclic_value_keeps_siblings() {
    let records = Records::default();
    let logger = Logger::builder().transport(collector("sink", &records)).build();

    let node = Value::object(Record::new().with_field("password", "secret").with_field("label", "root"));
    node.insert("self", node.clone());
    logger.info(&[node.clone()]).unwrap();

    let records = records.lock().unwrap();
    let masked = &records[0].1[0];
    assert_eq!(masked.get("password"), Some(Value::from("[***]")));
    assert_eq!(masked.get("label"), Some(Value::from("root")));
    assert!(masked.get("self").is_some());

    // break the cycle so the test does not leak
    node.insert("self", Value::Null);
}

#[test]
fn test_sub_logger_name_chain() {
    let lines = Lines::default();
    let a = Logger::builder()
        .name("a")
        .call_site(CallSite::Disabled)
        .transport(PrettyTransport::new(line_output(&lines), PrettySettings::plain()))
        .build();
    let b = a.get_sub_logger(LoggerSettings::named("b")).unwrap();
    let c = b.get_sub_logger(LoggerSettings::named("c")).unwrap();

    assert_eq!(c.options().parent_names, vec!["a".to_string(), "b".to_string()]);

    c.info(&["hello".into()]).unwrap();
    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("\tINFO\t\ta:b:c\thello"), "{:?}", lines[0]);
}

#[test]
fn test_parent_receives_records_filtered_by_child() {
    let records = Records::default();
    let root = Logger::builder()
        .min_level(0u32)
        .transport(collector("root", &records))
        .build();
    let child = root
        .get_sub_logger(LoggerSettings::named("strict").with_min_level(5u32))
        .unwrap();
    child.attach_transport(collector("child", &records));

    child.info(&["only root".into()]).unwrap();

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, "root");
    assert_eq!(records[0].2.name.as_deref(), Some("strict"));
    assert_eq!(child.metrics().delivered_count(), 0);
}

#[test]
fn test_sink_failure_reaches_caller_and_logger_keeps_working() {
    let records = Records::default();
    let logger = Logger::new();
    logger.attach_transport(FnTransport::new("flaky", {
        let mut calls = 0;
        move |_: &[Value], _: &Meta| {
            calls += 1;
            if calls == 1 {
                Err(LoggerError::transport("flaky", "disk full"))
            } else {
                Ok(())
            }
        }
    }));
    logger.attach_transport(collector("after", &records));

    let err = logger.error(&["first".into()]).unwrap_err();
    assert!(matches!(err, LoggerError::Transport { .. }));
    assert!(records.lock().unwrap().is_empty());

    logger.error(&["second".into()]).unwrap();
    assert_eq!(records.lock().unwrap().len(), 1);
    assert_eq!(logger.metrics().failed_count(), 1);
}

#[test]
fn test_pretty_output_with_error_argument() {
    let lines = Lines::default();
    let logger = Logger::builder()
        .transport(PrettyTransport::new(line_output(&lines), PrettySettings::plain()))
        .build();

    let error = ErrorValue::new("IoError", "connection reset")
        .with_stack("   0: app::net::read\n             at /opt/app/src/net.rs:88:13");
    logger
        .error(&["request failed".into(), Value::error(error)])
        .unwrap();

    let lines = lines.lock().unwrap();
    let line = &lines[0];
    assert!(line.contains("\tERROR\t"));
    assert!(line.contains("integration_tests.rs:"));
    assert!(line.contains("\trequest failed\n\n IoError  connection reset\nerror stack:\n  • net.rs\tapp::net::read\n\t"));
}

#[cfg(feature = "console")]
#[test]
fn test_pretty_output_is_styled_when_enabled() {
    colored::control::set_override(true);
    let lines = Lines::default();
    let logger = Logger::builder()
        .call_site(CallSite::Disabled)
        .transport(PrettyTransport::new(line_output(&lines), PrettySettings::default()))
        .build();
    logger.warn(&["careful".into()]).unwrap();

    let lines = lines.lock().unwrap();
    assert!(lines[0].contains("\u{1b}[1;33mWARN\u{1b}[0m\u{1b}[0m\u{1b}[0m"));
    assert!(lines[0].ends_with("careful"));
}

#[test]
fn test_json_output() {
    let lines = Lines::default();
    let logger = Logger::builder()
        .name("jobs")
        .default_metadata("region", "eu")
        .build();
    logger.attach_transport(
        JsonTransport::new(line_output(&lines)).with_arguments_array_name("args"),
    );

    logger
        .info(&["done".into(), Value::object(Record::new().with_field("password", "p"))])
        .unwrap();

    let lines = lines.lock().unwrap();
    let json: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(json["args"][0], "done");
    assert_eq!(json["args"][1]["password"], "[***]");
    assert_eq!(json["_meta"]["name"], "jobs");
    assert_eq!(json["_meta"]["region"], "eu");
    assert_eq!(json["_meta"]["logLevelId"], 3);
    assert_eq!(json["_meta"]["path"]["fileName"], "integration_tests.rs");
}

#[test]
fn test_custom_level() {
    let records = Records::default();
    let logger = Logger::builder()
        .min_level(LogLevel::Fatal)
        .transport(collector("sink", &records))
        .build();

    logger.log(7, "AUDIT", &["access granted".into()]).unwrap();
    logger.log(2, "VERBOSE", &["dropped".into()]).unwrap();

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].2.log_level_id, 7);
    assert_eq!(records[0].2.log_level_name, "AUDIT");
}

#[test]
fn test_settings_from_json() {
    let settings = LoggerSettings::from_json_str(
        r#"{
            "name": "cfg",
            "minLevel": 4,
            "maskPlaceholder": "***",
            "maskValuesOfKeys": ["secret"],
            "maskValuesOfKeysCaseInsensitive": true,
            "maskValuesRegEx": ["\\d{4}-\\d{4}"],
            "defaultMetadata": { "app": "demo" }
        }"#,
    )
    .unwrap();
    let records = Records::default();
    let logger = Logger::with_settings(settings).unwrap();
    logger.attach_transport(collector("sink", &records));

    logger
        .warn(&[
            "card 1234-5678".into(),
            Value::object(Record::new().with_field("SECRET", "x")),
        ])
        .unwrap();
    logger.info(&["filtered".into()]).unwrap();

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    let (_, args, meta) = &records[0];
    assert_eq!(args[0], Value::from("card ***"));
    assert_eq!(args[1].get("SECRET"), Some(Value::from("***")));
    assert_eq!(meta.extra["app"], Value::from("demo"));
}

#[test]
fn test_invalid_mask_pattern_is_rejected() {
    let settings = LoggerSettings::from_json_str(r#"{ "maskValuesRegEx": ["("] }"#).unwrap();
    let err = Logger::with_settings(settings).unwrap_err();
    assert!(matches!(err, LoggerError::InvalidPattern(_)));
}

#[test]
fn test_template_rendering_is_deterministic() {
    let template = "{{yyyy}}-{{mm}}-{{dd}} {{hh}}:{{MM}}:{{ss}}.{{ms}} {{dateIsoStr}} {{rawIsoStr}} \
                    {{logLevelName}} {{fileName}} {{fileNameWithLine}} {{filePath}} {{fileLine}} \
                    {{filePathWithLine}} {{fullFilePath}} {{name}}{{nameWithDelimiterPrefix}}{{nameWithDelimiterSuffix}}";
    let settings = PrettySettings::plain().with_template(template);
    let date = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).single().unwrap();
    let meta = Meta::new(4, "WARN")
        .with_date(date)
        .with_name(Some("svc".into()), vec!["app".into()])
        .with_path(Some(StackFrame::parse_with_root("/srv/app/src/lib.rs:9:1", Some("/srv/app"))));

    let first = render_meta(&settings, &meta);
    let _ = render_meta(&PrettySettings::default(), &meta);
    let second = render_meta(&settings, &meta);
    assert_eq!(first, second);
    assert!(first.starts_with("2021-03-04 05:06:07.000 "));
    assert!(first.contains(" WARN lib.rs lib.rs:9 ./src/lib.rs 9 ./src/lib.rs:9 /srv/app/src/lib.rs "));
    assert!(first.ends_with(" app:svc\tapp:svcapp:svc\t"));
}

#[test]
fn test_stack_frame_digits() {
    let frame = StackFrame::parse_with_root("    at handler (/app/routes/user.ts:120:33)", None);
    assert_eq!(frame.file_line.as_deref(), Some("120"));
    assert_eq!(frame.file_column.as_deref(), Some("33"));
    assert_eq!(frame.file_name_with_line.as_deref(), Some("user.ts:120"));
}

#[test]
fn test_writer_output() {
    let logger = Logger::builder().call_site(CallSite::Disabled).build();
    logger.attach_transport(PrettyTransport::new(
        WriterOutput::new(Vec::<u8>::new()),
        PrettySettings::plain(),
    ));
    logger.info(&["written".into()]).unwrap();
    logger.flush().unwrap();
    assert_eq!(logger.metrics().delivered_count(), 1);
}
