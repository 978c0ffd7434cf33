//! Appenders: downstream sinks that receive accepted access events.
//!
//! Appenders are invoked synchronously on the emitting thread, so their cost
//! is attributed to the request being logged. An appender that fails returns
//! an [`AppendError`]; the context logs it and moves on.

use crate::error::AppendError;
use crate::event::AccessEvent;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

// =============================================================================
// Appender Trait
// =============================================================================

/// A sink for access events.
pub trait Appender: Send + Sync {
    /// Name used for lookup and diagnostics.
    fn name(&self) -> &str;

    /// Delivers one event.
    fn append(&self, event: &AccessEvent) -> Result<(), AppendError>;

    /// Called when the appender is attached to a started context.
    fn start(&self) {}

    /// Called when the appender is detached.
    fn stop(&self) {}
}

// =============================================================================
// TracingAppender
// =============================================================================

/// Writes each event as a common-log-format line through `tracing`.
///
/// Events are emitted at info level under the `access_log` target with the
/// main fields also recorded as structured fields.
#[derive(Debug, Clone)]
pub struct TracingAppender {
    name: String,
}

impl TracingAppender {
    /// Creates a tracing appender.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for TracingAppender {
    fn default() -> Self {
        Self::new("console")
    }
}

impl Appender for TracingAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn append(&self, event: &AccessEvent) -> Result<(), AppendError> {
        tracing::info!(
            target: "access_log",
            remote_host = %event.remote_host(),
            remote_user = %event.remote_user(),
            method = %event.method(),
            uri = %event.request_uri(),
            status = event.status_code(),
            content_length = event.content_length(),
            elapsed_ms = event.elapsed_time(),
            "{}",
            common_log_line(event)
        );
        Ok(())
    }
}

/// Formats `host - user [time] "request line" status bytes`.
pub fn common_log_line(event: &AccessEvent) -> String {
    let time = chrono::DateTime::from_timestamp_millis(event.timestamp())
        .map(|t| t.format("%d/%b/%Y:%H:%M:%S %z").to_string())
        .unwrap_or_else(|| event.timestamp().to_string());
    format!(
        "{} - {} [{}] \"{}\" {} {}",
        event.remote_host(),
        event.remote_user(),
        time,
        event.request_url(),
        event.status_code(),
        event.content_length()
    )
}

// =============================================================================
// JsonAppender
// =============================================================================

/// Serializes the full snapshot to JSON and emits it through `tracing`
/// under the `access_log_json` target.
#[derive(Debug, Clone)]
pub struct JsonAppender {
    name: String,
}

impl JsonAppender {
    /// Creates a JSON appender.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for JsonAppender {
    fn default() -> Self {
        Self::new("json")
    }
}

impl Appender for JsonAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn append(&self, event: &AccessEvent) -> Result<(), AppendError> {
        let json = serde_json::to_string(event)?;
        tracing::info!(target: "access_log_json", "{}", json);
        Ok(())
    }
}

// =============================================================================
// ListAppender
// =============================================================================

/// Keeps delivered events in memory.
///
/// Useful for tests and for embedding applications that inspect events
/// directly. Rejects events once stopped.
#[derive(Debug)]
pub struct ListAppender {
    name: String,
    started: AtomicBool,
    events: Mutex<Vec<AccessEvent>>,
}

impl ListAppender {
    /// Creates a started list appender.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: AtomicBool::new(true),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of all captured events.
    pub fn events(&self) -> Vec<AccessEvent> {
        self.lock().clone()
    }

    /// Returns the number of captured events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no events have been captured.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clears all captured events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Returns true until the appender is stopped.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AccessEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ListAppender {
    fn default() -> Self {
        Self::new("list")
    }
}

impl Appender for ListAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn append(&self, event: &AccessEvent) -> Result<(), AppendError> {
        if !self.is_started() {
            return Err(AppendError::NotStarted(self.name.clone()));
        }
        self.lock().push(event.clone());
        Ok(())
    }

    fn start(&self) {
        self.started.store(true, Ordering::Release);
    }

    fn stop(&self) {
        self.started.store(false, Ordering::Release);
    }
}
