//! Integration tests for the logging pipeline
//!
//! These tests verify:
//! - Level gating
//! - Tag composition through nested sub-loggers
//! - Call-site reporting through wrapping layers
//! - Pretty and JSON rendering agreement
//! - Live reconfiguration
//! - Exit action ordering
//! - Panic recovery
//! - Appender failure isolation
//! - File output through `WriterAppender`

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tagged_logger::core::whitespace;
use tagged_logger::prelude::*;
use tempfile::TempDir;

fn memory_logger(level: LogLevel) -> (Logger, MemoryAppender) {
    let memory = MemoryAppender::new();
    let logger = Logger::builder()
        .min_level(level)
        .appender(memory.clone())
        .exit_action(|| {})
        .build();
    (logger, memory)
}

#[test]
fn test_minimum_level_warn() {
    let (logger, memory) = memory_logger(LogLevel::Warn);

    logger.info("not shown");
    assert!(memory.is_empty());

    logger.error("shown");
    let lines = memory.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("ERROR"));
}

#[test]
fn test_tags_a_b_c() {
    let memory = MemoryAppender::new();
    let root = Logger::builder()
        .format(OutputFormat::Json)
        .tags(["A"])
        .appender(memory.clone())
        .build();

    let b = root.sublogger(["B"]);
    let c = b.sublogger(["C"]);
    c.info("composed");

    let parsed: serde_json::Value = serde_json::from_str(&memory.lines()[0]).unwrap();
    assert_eq!(parsed["tags"], serde_json::json!(["A", "B", "C"]));
}

#[test]
fn test_caller_through_two_subloggers() {
    let (logger, memory) = memory_logger(LogLevel::Info);
    let nested = logger.sublogger(["one"]).sublogger(["two"]);

    let line = line!() + 1;
    nested.warn_with("deep call", "data");

    let expected = format!("[integration_tests.rs:{}] (one,two) deep call data", line);
    assert!(memory.lines()[0].contains(&expected), "{}", memory.lines()[0]);
}

#[test]
fn test_caller_through_trait_object_and_macro() {
    let (logger, memory) = memory_logger(LogLevel::Info);
    let shared: Arc<dyn Log> = Arc::new(logger.sublogger(["dyn"]));

    let line = line!() + 1;
    tagged_logger::info!(shared, "macro {}", 1);

    assert!(memory.lines()[0].contains(&format!("[integration_tests.rs:{}]", line)));
}

#[test]
fn test_pretty_and_json_agree() {
    let (logger, memory) = memory_logger(LogLevel::Info);
    logger.set_tags(["svc"]);

    logger.error_with("  disk full  ", Metadata::value(&vec!["sda", "sdb"]));
    logger.set_format(OutputFormat::Json);
    logger.error_with("  disk full  ", Metadata::value(&vec!["sda", "sdb"]));

    let lines = memory.lines();
    let pretty = &lines[0];
    let json: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();

    assert!(pretty.contains("[ERROR]"));
    assert_eq!(json["level"], "ERROR");
    assert!(pretty.contains("(svc)   disk full [\"sda\", \"sdb\"]  "));
    assert_eq!(json["message"], "disk full");
    assert_eq!(json["metadata"], serde_json::json!(["sda", "sdb"]));
}

#[test]
fn test_pretty_whitespace_restored() {
    let (logger, memory) = memory_logger(LogLevel::Info);
    logger.info("\t indented and trailing \n");

    let line = &memory.lines()[0];
    assert!(line.ends_with("\t indented and trailing \n"));

    let rendered = line.split("] ").last().unwrap();
    assert_eq!(whitespace::leading(rendered), "\t ");
    assert_eq!(whitespace::trailing(rendered), " \n");
}

#[test]
fn test_error_metadata_is_described() {
    let (logger, memory) = memory_logger(LogLevel::Info);
    logger.set_format(OutputFormat::Json);

    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
    logger.error_with("startup failed", Metadata::error(&err));

    let parsed: serde_json::Value = serde_json::from_str(&memory.lines()[0]).unwrap();
    assert_eq!(parsed["metadata"], "config.toml missing");
}

#[test]
fn test_live_reconfiguration_reaches_existing_subloggers() {
    let (logger, memory) = memory_logger(LogLevel::Info);
    let child = logger.sublogger(["child"]);

    logger.configure(LoggerConfig {
        min_level: LogLevel::Debug,
        format: OutputFormat::Json,
        tags: vec!["root".into()],
        ..LoggerConfig::default()
    });

    child.debug("after reconfigure");

    let parsed: serde_json::Value = serde_json::from_str(&memory.lines()[0]).unwrap();
    assert_eq!(parsed["level"], "DEBUG");
    assert_eq!(parsed["tags"], serde_json::json!(["root", "child"]));
}

#[test]
fn test_colorized_multiline() {
    let (logger, memory) = memory_logger(LogLevel::Info);
    logger.set_colorize(true);
    logger.warn("first\nsecond");

    let line = &memory.lines()[0];
    let parts: Vec<&str> = line.split('\n').collect();
    assert_eq!(parts.len(), 2);
    for part in parts {
        assert!(part.starts_with("\x1b[33m"), "{:?}", part);
        assert!(part.ends_with("\x1b[0m"), "{:?}", part);
    }
}

#[test]
fn test_exit_runs_after_write() {
    let memory = MemoryAppender::new();
    let observer = memory.clone();
    let written_before_exit = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&written_before_exit);

    let logger = Logger::builder()
        .appender(memory.clone())
        .exit_action(move || seen.store(observer.len(), Ordering::SeqCst))
        .build();

    logger.sublogger(["shutdown"]).fatal("unrecoverable");
    assert_eq!(written_before_exit.load(Ordering::SeqCst), 1);
}

#[test]
fn test_recover_string_panic() {
    let (logger, memory) = memory_logger(LogLevel::Info);

    let result: Result<()> = recover(&logger, "handler", || panic!("index out of range"));

    let err = result.unwrap_err();
    assert!(matches!(err, LoggerError::Panicked { .. }));
    assert_eq!(err.to_string(), "handler panic: index out of range");

    let errors: Vec<String> = memory
        .lines()
        .into_iter()
        .filter(|l| l.contains("[ERROR]"))
        .collect();
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_failing_appender_counted() {
    struct Broken;

    impl Appender for Broken {
        fn append(&mut self, _line: &str) -> Result<()> {
            Err(LoggerError::writer("broken", "pipe closed"))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    let memory = MemoryAppender::new();
    let logger = Logger::builder()
        .appender(Broken)
        .appender(memory.clone())
        .build();

    logger.info("one");
    logger.info("two");

    assert_eq!(memory.len(), 2);
    assert_eq!(logger.dropped_count(), 2);
    assert_eq!(logger.metrics().drop_rate(), 100.0);
}

#[test]
fn test_writer_appender_file_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");

    let file = fs::File::create(&log_file).expect("Failed to create log file");
    let logger = Logger::builder()
        .format(OutputFormat::Json)
        .appender(WriterAppender::new(file).with_name("file"))
        .build();

    logger.info("to disk");
    logger.warn("also to disk");
    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(parsed["timestamp"].is_string());
    }
}

#[test]
fn test_config_from_json() {
    let config: LoggerConfig =
        serde_json::from_str(r#"{"min_level":"Error","tags":["worker"]}"#).unwrap();
    let (logger, memory) = memory_logger(LogLevel::Info);
    logger.configure(config);

    logger.warn("gated");
    logger.error("kept");

    let lines = memory.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("(worker) kept"));
}
