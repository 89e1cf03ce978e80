// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end checks of the facade against the reference engine: what a caller
//! logs is what a sink receives.

use logshim::engine::{Engine, InMemorySink, LogEngine};
use logshim::{Cause, FormatStyle, LevelFilter, LoggerFactory, MarkerFactory, Param};
use std::sync::Arc;

struct Fixture;

fn setup() -> (LoggerFactory, Arc<LogEngine>, Arc<InMemorySink>) {
    let sink = Arc::new(InMemorySink::new());
    let engine = Arc::new(LogEngine::new());
    engine.set_sinks(vec![sink.clone()]);
    (LoggerFactory::new(engine.clone()), engine, sink)
}

fn test_exception() -> Cause {
    Cause::new(std::io::Error::other("Test exception"))
}

#[test]
fn test_logger() {
    let (factory, _engine, sink) = setup();
    let logger = factory.get_logger_for::<Fixture>();

    let test_msg = "This is a test message";
    logger.info(test_msg);
    let record = sink.poll().expect("a record");
    assert_eq!(record.message(), test_msg);
    assert!(record.parameters().is_none());
    assert_eq!(record.logger_name(), std::any::type_name::<Fixture>());

    logger.info_with("This is a test formatted {}", &[Param::from("{message}")]);
    let record = sink.poll().expect("a record");
    assert_eq!(record.message(), "This is a test formatted {message}");
    assert_eq!(record.parameters(), Some(&[Param::from("{message}")][..]));
    assert_eq!(record.format_style(), FormatStyle::Formatted);
}

#[test]
fn test_logger_with_causes() {
    let (factory, _engine, sink) = setup();
    let logger = factory.get_logger_for::<Fixture>();
    let e = test_exception();

    let test_msg = "This is a test message";
    logger.info_cause(test_msg, e.clone());
    let record = sink.poll().expect("a record");
    assert_eq!(record.message(), test_msg);
    assert_eq!(record.cause(), Some(&e), "cause is different from the expected cause");

    logger.info_with(
        "This is a test formatted {}",
        &[Param::from("{message}"), Param::from(e.clone())],
    );
    let record = sink.poll().expect("a record");
    assert_eq!(record.message(), "This is a test formatted {message}");
    assert_eq!(record.cause(), Some(&e), "cause is different from the expected cause");
    assert_eq!(record.parameters(), Some(&[Param::from("{message}")][..]));
}

#[test]
fn test_logger_with_markers() {
    let (factory, _engine, sink) = setup();
    let logger = factory.get_logger_for::<Fixture>();
    let markers = MarkerFactory::new();
    let marker = markers.marker("test");

    logger.info_marked(&marker, "log message", &[]);
    let record = sink.poll().expect("a record");
    let attached = record.marker().expect("marker attached");
    assert!(attached.ptr_eq(&marker), "record must carry the caller's marker instance");
    assert!(attached.ptr_eq(&markers.marker("test")));
}

#[test]
fn test_logger_no_format() {
    let (factory, _engine, sink) = setup();
    let logger = factory.get_logger_for::<Fixture>();
    let marker = MarkerFactory::new().marker("test");

    logger.info_marked(&marker, "log message {foo}", &[]);
    let record = sink.poll().expect("a record");
    assert_eq!(record.format_style(), FormatStyle::NoFormat);
    assert_eq!(record.message(), "log message {foo}");
}

#[test]
fn test_mdc() {
    let (factory, engine, sink) = setup();
    let mdc = factory.mdc();
    let key = format!("{:x}", std::process::id());

    mdc.put(&key, "value").unwrap();
    assert_eq!(mdc.get(&key).as_deref(), Some("value"));
    assert_eq!(engine.context().get(&key).as_deref(), Some("value"));

    factory.get_logger("ctx").info("stamped");
    let record = sink.poll().expect("a record");
    assert_eq!(record.context().get(&key).map(String::as_str), Some("value"));

    mdc.remove(&key);
    assert_eq!(engine.context().get(&key), None);
}

#[test]
fn test_level_filtering() {
    let (factory, engine, sink) = setup();
    engine.set_level("noisy", LevelFilter::Error);
    let logger = factory.get_logger("noisy::part");
    logger.warn("dropped");
    logger.error("kept");
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.poll().unwrap().message(), "kept");

    assert!(!factory.get_logger("other").is_debug_enabled());
    engine.set_level("", LevelFilter::Trace);
    assert!(factory.get_logger("other").is_trace_enabled());
}

#[test]
fn test_rendered_output() {
    let (factory, engine, sink) = setup();
    let marker = MarkerFactory::new().marker("AUDIT");
    engine.context().put("user", "ann".to_string());
    factory
        .get_logger("app")
        .warn_marked(&marker, "login from {}", &[Param::from("10.0.0.1")]);
    engine.context().clear();

    let logs = sink.drain_logs();
    assert!(logs.contains("WARN "), "{logs}");
    assert!(logs.ends_with("app AUDIT - login from 10.0.0.1 {user=ann}"), "{logs}");
}
