//! Context tests - lifecycle, emit pipeline and configuration application
//!
//! Events are observed through a [`ListAppender`] attached after
//! initialization.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::event_for;
use crate::appender::{Appender, ListAppender};
use crate::config::AccessLogConfig;
use crate::configurator::{Configurator, JsonConfigurator};
use crate::context::{AccessContext, AccessLogContext, DropReason, EmitDecision, LifecycleState};
use crate::error::{AppendError, ConfigError, FilterError};
use crate::event::{AccessEvent, AccessEventData};
use crate::filter::{Filter, FilterReply};
use crate::resource::DefaultResourceLoader;

const LOCATION: &str = "classpath:access-log-test.json";

fn test_config() -> AccessLogConfig {
    AccessLogConfig::new().with_default_locations([LOCATION])
}

fn try_context(config: AccessLogConfig, document: &str) -> Result<AccessLogContext, ConfigError> {
    let loader = DefaultResourceLoader::new().with_resource("access-log-test.json", document);
    AccessLogContext::with_loader(config, &loader, &JsonConfigurator)
}

/// Builds a running context from `document` with a list appender attached.
fn context_with(config: AccessLogConfig, document: &str) -> (AccessLogContext, Arc<ListAppender>) {
    let context = try_context(config, document).unwrap();
    let list = Arc::new(ListAppender::new("list"));
    context.access_context().add_appender(list.clone());
    (context, list)
}

fn event(method: &str, uri: &str, status: u16) -> AccessEvent {
    AccessEvent::new(
        AccessEventData::builder()
            .with_method(method)
            .with_request_uri(Some(uri.to_string()))
            .with_status_code(status)
            .build(),
    )
}

struct FailingAppender {
    calls: AtomicUsize,
}

impl Appender for FailingAppender {
    fn name(&self) -> &str {
        "failing"
    }

    fn append(&self, _event: &AccessEvent) -> Result<(), AppendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppendError::failed("failing", "disk full"))
    }
}

struct PanickingAppender;

impl Appender for PanickingAppender {
    fn name(&self) -> &str {
        "panicking"
    }

    fn append(&self, _event: &AccessEvent) -> Result<(), AppendError> {
        panic!("appender exploded");
    }
}

struct FailingFilter;

impl Filter for FailingFilter {
    fn name(&self) -> &str {
        "failing"
    }

    fn decide(&self, _event: &AccessEvent) -> Result<FilterReply, FilterError> {
        Err(FilterError::new("failing", "lookup failed"))
    }
}

struct FixedFilter(FilterReply);

impl Filter for FixedFilter {
    fn name(&self) -> &str {
        "fixed"
    }

    fn decide(&self, _event: &AccessEvent) -> Result<FilterReply, FilterError> {
        Ok(self.0)
    }
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_initialized_context_is_running() {
    let (context, _) = context_with(test_config(), "{}");
    assert_eq!(context.state(), LifecycleState::Running);
    assert_eq!(context.name(), LOCATION);
    assert!(context.access_context().is_started());
    assert_eq!(context.to_string(), format!("AccessLogContext({LOCATION})"));
}

#[test]
fn test_fallback_attaches_tracing_appender() {
    let context =
        AccessLogContext::new(AccessLogConfig::new().with_default_locations(Vec::<String>::new()))
            .unwrap();
    assert_eq!(context.name(), "classpath:access_log/access-log-default.json");
    assert_eq!(context.access_context().appender_names(), vec!["console".to_string()]);
    context.emit(&event_for("/api/users"));
}

#[test]
fn test_close_detaches_everything() {
    let (context, list) = context_with(test_config(), r#"{"sequence_numbers": true}"#);
    context.access_context().add_filter(Arc::new(FixedFilter(FilterReply::Neutral)));

    context.close();

    assert_eq!(context.state(), LifecycleState::Closed);
    assert_eq!(context.access_context().appender_count(), 0);
    assert_eq!(context.access_context().filter_count(), 0);
    assert!(!context.access_context().is_started());
    assert!(!context.access_context().has_sequence_number_generator());
    assert!(!list.is_started());
}

#[test]
fn test_close_twice_is_safe() {
    let (context, _) = context_with(test_config(), "{}");
    assert!(context.close());
    assert!(!context.close());
    assert_eq!(context.state(), LifecycleState::Closed);
    assert_eq!(context.access_context().appender_count(), 0);
}

/// Only a running context reports (and logs) its shutdown.
#[test]
fn test_close_before_running_reports_nothing() {
    let context = AccessLogContext::unconfigured(test_config()).unwrap();
    assert_eq!(context.state(), LifecycleState::Unconfigured);
    assert!(!context.close());
    assert_eq!(context.state(), LifecycleState::Closed);
}

/// Attaches an appender, then rejects the document.
struct HalfwayConfigurator(Arc<ListAppender>);

impl Configurator for HalfwayConfigurator {
    fn configure(
        &self,
        context: &AccessContext,
        location: &str,
        _content: &str,
    ) -> Result<(), ConfigError> {
        context.add_appender(self.0.clone());
        Err(ConfigError::Invalid {
            location: location.to_string(),
            message: "rejected after attaching".into(),
        })
    }
}

#[test]
fn test_failed_configure_stops_partial_setup() {
    let list = Arc::new(ListAppender::new("partial"));
    let loader = DefaultResourceLoader::new().with_resource("access-log-test.json", "{}");

    let result =
        AccessLogContext::with_loader(test_config(), &loader, &HalfwayConfigurator(list.clone()));

    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    assert!(!list.is_started());
}

#[test]
fn test_emit_after_close_is_dropped() {
    let (context, list) = context_with(test_config(), "{}");
    context.close();
    assert_eq!(
        context.decide(&event_for("/api")).unwrap(),
        EmitDecision::Drop(DropReason::NotRunning)
    );
    context.emit(&event_for("/api"));
    assert!(list.is_empty());
}

#[test]
fn test_disabled_context_drops_everything() {
    let (context, list) = context_with(test_config().with_enabled(false), "not even json");
    assert_eq!(context.name(), "disabled");
    assert_eq!(context.state(), LifecycleState::Running);
    assert_eq!(
        context.decide(&event_for("/api")).unwrap(),
        EmitDecision::Drop(DropReason::Disabled)
    );
    context.emit(&event_for("/api"));
    assert!(list.is_empty());
}

// =============================================================================
// Emit Pipeline Tests
// =============================================================================

#[test]
fn test_emit_delivers_to_appenders() {
    let (context, list) = context_with(test_config(), "{}");
    context.emit(&event_for("/api/users"));

    let events = list.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].request_uri(), "/api/users");
}

#[test]
fn test_emit_respects_include_and_exclude() {
    let config = test_config()
        .include_url("^/api/")
        .exclude_url("^/api/internal/");
    let (context, list) = context_with(config, "{}");

    context.emit(&event_for("/api/users"));
    context.emit(&event_for("/api/internal/metrics"));
    context.emit(&event_for("/static/app.js"));

    assert_eq!(list.len(), 1);
    assert_eq!(list.events()[0].request_uri(), "/api/users");
    assert_eq!(
        context.decide(&event_for("/static/app.js")).unwrap(),
        EmitDecision::Drop(DropReason::UrlFiltered)
    );
}

#[test]
fn test_emit_exclude_only() {
    let (context, list) = context_with(test_config().exclude_url("^/health"), "{}");
    context.emit(&event_for("/health"));
    context.emit(&event_for("/orders"));
    assert_eq!(list.len(), 1);
}

#[test]
fn test_invalid_url_pattern_fails_construction() {
    let result = try_context(test_config().include_url("("), "{}");
    assert!(matches!(result, Err(ConfigError::InvalidUrlPattern { .. })));
}

#[test]
fn test_filter_chain_deny_drops_event() {
    let (context, list) = context_with(test_config(), "{}");
    context.access_context().add_filter(Arc::new(FixedFilter(FilterReply::Deny)));

    context.emit(&event_for("/api"));
    assert!(list.is_empty());
    assert_eq!(
        context.decide(&event_for("/api")).unwrap(),
        EmitDecision::Drop(DropReason::FilterChainDenied)
    );
}

#[test]
fn test_filter_chain_first_decisive_reply_wins() {
    let (context, list) = context_with(test_config(), "{}");
    let access = context.access_context();
    access.add_filter(Arc::new(FixedFilter(FilterReply::Neutral)));
    access.add_filter(Arc::new(FixedFilter(FilterReply::Accept)));
    access.add_filter(Arc::new(FixedFilter(FilterReply::Deny)));

    context.emit(&event_for("/api"));
    assert_eq!(list.len(), 1);
}

#[test]
fn test_failing_filter_is_swallowed() {
    let (context, list) = context_with(test_config(), "{}");
    context.access_context().add_filter(Arc::new(FailingFilter));

    context.emit(&event_for("/api"));
    assert!(list.is_empty());
    assert!(context.decide(&event_for("/api")).is_err());
}

#[test]
fn test_failing_appender_does_not_stop_others() {
    let context = try_context(test_config(), "{}").unwrap();
    let failing = Arc::new(FailingAppender {
        calls: AtomicUsize::new(0),
    });
    let list = Arc::new(ListAppender::new("list"));
    context.access_context().add_appender(failing.clone());
    context.access_context().add_appender(list.clone());

    context.emit(&event_for("/api"));
    context.emit(&event_for("/api"));

    assert_eq!(failing.calls.load(Ordering::SeqCst), 2);
    assert_eq!(list.len(), 2);
}

#[test]
#[should_panic(expected = "appender exploded")]
fn test_appender_panic_propagates() {
    let context = try_context(test_config(), "{}").unwrap();
    context.access_context().add_appender(Arc::new(PanickingAppender));
    context.emit(&event_for("/api"));
}

#[test]
fn test_detach_appender_by_name() {
    let (context, list) = context_with(test_config(), "{}");
    assert!(context.access_context().detach_appender("list"));
    assert!(!context.access_context().detach_appender("list"));
    assert!(!list.is_started());

    context.emit(&event_for("/api"));
    assert!(list.is_empty());
}

#[test]
fn test_concurrent_emits() {
    let (context, list) = context_with(test_config(), "{}");

    std::thread::scope(|scope| {
        for worker in 0..8 {
            let context = &context;
            scope.spawn(move || {
                for i in 0..100 {
                    context.emit(&event_for(&format!("/api/{worker}/{i}")));
                }
            });
        }
    });

    assert_eq!(list.len(), 800);
}

// =============================================================================
// Configuration Document Tests
// =============================================================================

#[test]
fn test_document_attaches_appenders() {
    let context = try_context(
        test_config(),
        r#"{"appenders": [{"type": "tracing"}, {"type": "json", "name": "structured"}]}"#,
    )
    .unwrap();
    assert_eq!(
        context.access_context().appender_names(),
        vec!["console".to_string(), "structured".to_string()]
    );
    context.emit(&event_for("/api"));
}

#[test]
fn test_document_sequence_numbers() {
    let context = try_context(test_config(), r#"{"sequence_numbers": true}"#).unwrap();
    assert_eq!(context.next_sequence_number(), Some(1));
    assert_eq!(context.next_sequence_number(), Some(2));

    let plain = try_context(test_config(), "{}").unwrap();
    assert_eq!(plain.next_sequence_number(), None);
}

#[test]
fn test_document_status_filter() {
    let (context, list) = context_with(
        test_config(),
        r#"{"filters": [{"type": "status", "min": 400, "max": 599, "on_match": "accept", "on_mismatch": "deny"}]}"#,
    );

    context.emit(&event("GET", "/ok", 200));
    context.emit(&event("GET", "/missing", 404));
    context.emit(&event("GET", "/boom", 500));

    let uris: Vec<String> = list
        .events()
        .iter()
        .map(|e| e.request_uri().to_string())
        .collect();
    assert_eq!(uris, vec!["/missing".to_string(), "/boom".to_string()]);
}

#[test]
fn test_document_method_filter() {
    let (context, list) = context_with(
        test_config(),
        r#"{"filters": [{"type": "method", "methods": ["options", "HEAD"]}]}"#,
    );

    context.emit(&event("OPTIONS", "/api", 204));
    context.emit(&event("HEAD", "/api", 200));
    context.emit(&event("GET", "/api", 200));

    assert_eq!(list.len(), 1);
    assert_eq!(list.events()[0].method(), "GET");
}

#[test]
fn test_document_parse_error() {
    let result = try_context(test_config(), "{ not json");
    match result {
        Err(ConfigError::Parse { location, .. }) => assert_eq!(location, LOCATION),
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn test_document_unknown_field_rejected() {
    let result = try_context(test_config(), r#"{"appendrs": []}"#);
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn test_document_duplicate_appender_names() {
    let result = try_context(
        test_config(),
        r#"{"appenders": [{"type": "tracing", "name": "a"}, {"type": "json", "name": "a"}]}"#,
    );
    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}

#[test]
fn test_document_empty_status_range() {
    let result = try_context(
        test_config(),
        r#"{"filters": [{"type": "status", "min": 500, "max": 400}]}"#,
    );
    match result {
        Err(ConfigError::Invalid { message, .. }) => assert!(message.contains("500..=400")),
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn test_document_empty_method_list() {
    let result = try_context(
        test_config(),
        r#"{"filters": [{"type": "method", "methods": []}]}"#,
    );
    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}
