//! Appender tests - built-in sinks and common log formatting

use super::event_for;
use crate::appender::{Appender, JsonAppender, ListAppender, TracingAppender, common_log_line};
use crate::error::AppendError;
use crate::event::{AccessEvent, AccessEventData};

fn epoch_event() -> AccessEvent {
    AccessEvent::new(
        AccessEventData::builder()
            .with_timestamp(0)
            .with_remote_host("10.0.0.1")
            .with_remote_user(Some("alice".into()))
            .with_request_url("GET /index.html HTTP/1.1")
            .with_status_code(200)
            .with_content_length(512)
            .build(),
    )
}

// =============================================================================
// Common Log Format Tests
// =============================================================================

#[test]
fn test_common_log_line() {
    assert_eq!(
        common_log_line(&epoch_event()),
        "10.0.0.1 - alice [01/Jan/1970:00:00:00 +0000] \"GET /index.html HTTP/1.1\" 200 512"
    );
}

#[test]
fn test_common_log_line_uses_sentinel_for_missing_user() {
    let line = common_log_line(&event_for("/api"));
    assert!(line.starts_with("127.0.0.1 - - ["), "unexpected line: {line}");
    assert!(line.ends_with("\"GET /api HTTP/1.1\" 200 0"), "unexpected line: {line}");
}

// =============================================================================
// Built-in Appender Tests
// =============================================================================

#[test]
fn test_default_names() {
    assert_eq!(TracingAppender::default().name(), "console");
    assert_eq!(JsonAppender::default().name(), "json");
    assert_eq!(ListAppender::default().name(), "list");
    assert_eq!(TracingAppender::new("access").name(), "access");
}

#[test]
fn test_tracing_and_json_appenders_succeed() {
    let event = epoch_event();
    assert!(TracingAppender::default().append(&event).is_ok());
    assert!(JsonAppender::default().append(&event).is_ok());
}

#[test]
fn test_list_appender_collects_events() {
    let list = ListAppender::new("events");
    assert!(list.is_empty());

    list.append(&event_for("/a")).unwrap();
    list.append(&event_for("/b")).unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(list.events()[1].request_uri(), "/b");

    list.clear();
    assert!(list.is_empty());
}

#[test]
fn test_list_appender_rejects_after_stop() {
    let list = ListAppender::new("events");
    list.stop();

    match list.append(&event_for("/a")) {
        Err(AppendError::NotStarted(name)) => assert_eq!(name, "events"),
        other => panic!("expected NotStarted, got {other:?}"),
    }
    assert!(list.is_empty());

    list.start();
    assert!(list.append(&event_for("/a")).is_ok());
}

#[test]
fn test_append_error_messages() {
    assert_eq!(
        AppendError::failed("file", "disk full").to_string(),
        "appender 'file' failed: disk full"
    );
    assert_eq!(
        AppendError::NotStarted("list".into()).to_string(),
        "appender 'list' is not started"
    );
}
