//! Lifecycle and failure diagnostics for the access log context.
//!
//! These go through `tracing` under the crate's own target, separate from the
//! `access_log` target appenders write events to.

use crate::context::ConfigOrigin;

// =============================================================================
// Initialization
// =============================================================================

/// Log which configuration resource was selected. Logged at Debug level.
pub fn log_config_resolved(location: &str, origin: ConfigOrigin) {
    tracing::debug!(
        location = %location,
        origin = ?origin,
        "Access log configuration resolved"
    );
}

/// Log an explicit configuration location that does not exist.
/// Logged at Warn level; resolution continues with the defaults.
pub fn log_config_location_missing(location: &str) {
    tracing::warn!(
        location = %location,
        "Configured access log location not found, trying defaults"
    );
}

/// Log a started context with a summary of what was attached.
/// Logged at Info level.
pub fn log_context_initialized(name: &str, appender_count: usize, filter_count: usize) {
    tracing::info!(
        name = %name,
        appender_count = %appender_count,
        filter_count = %filter_count,
        "Access log context initialized"
    );
}

/// Log a context created with access logging disabled. Logged at Info level.
pub fn log_context_disabled() {
    tracing::info!("Access logging disabled, events will be dropped");
}

// =============================================================================
// Emission
// =============================================================================

/// Log a failure while filtering or appending an event.
///
/// Logged at Error level with the request URI so the dropped delivery can be
/// traced back to its request.
pub fn log_emit_failure(uri: &str, appender: Option<&str>, error: &dyn std::error::Error) {
    match appender {
        Some(appender) => tracing::error!(
            uri = %uri,
            appender = %appender,
            error = %error,
            "Failed to emit access event"
        ),
        None => tracing::error!(
            uri = %uri,
            error = %error,
            "Failed to emit access event"
        ),
    }
}

// =============================================================================
// Shutdown
// =============================================================================

/// Log context shutdown. Logged at Info level on the first close only.
pub fn log_context_closed(name: &str, detached_appenders: usize) {
    tracing::info!(
        name = %name,
        detached_appenders = %detached_appenders,
        "Access log context closed"
    );
}
