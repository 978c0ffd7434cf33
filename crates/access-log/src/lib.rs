//! # Access Log
//!
//! Server-independent capture, filtering and body redaction of HTTP access
//! events.
//!
//! ## Overview
//!
//! A server adapter builds an immutable [`AccessEventData`] snapshot once the
//! response is written, wraps it in an [`AccessEvent`] and hands it to
//! [`AccessLogContext::emit`]. The context then:
//!
//! 1. drops the event if its URI fails the include/exclude patterns,
//! 2. drops it if the configured filter chain denies it,
//! 3. delivers it to every attached [`Appender`].
//!
//! Filter and appender errors are logged and swallowed; logging never fails
//! the request being logged.
//!
//! ## Architecture
//!
//! ```text
//!  server adapter                      access_log
//! ┌──────────────┐  AccessEventData  ┌──────────────────────────────────────┐
//! │ extract      │──────────────────▶│ AccessEvent (sentinel accessors)     │
//! │ capture body │◀── BodyCapture ── │                                      │
//! └──────────────┘     Policy        │ AccessLogContext::emit               │
//!                                    │   ├─ UrlFilter (include / exclude)   │
//!                                    │   ├─ filter chain (Filter)           │
//!                                    │   └─ appenders (Appender)            │
//!                                    └──────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use access_log::prelude::*;
//!
//! let context = AccessLogContext::new(
//!     AccessLogConfig::new()
//!         .include_url("^/api/")
//!         .exclude_url("^/api/internal/"),
//! )?;
//!
//! let data = AccessEventData::builder()
//!     .with_method("GET")
//!     .with_request_uri(Some("/api/users".into()))
//!     .with_query_string(format_query_string(Some("page=2")))
//!     .with_request_url(format_request_line("GET", Some("/api/users"), Some("page=2"), "HTTP/1.1"))
//!     .with_protocol("HTTP/1.1")
//!     .with_status_code(200)
//!     .with_sequence_number(context.next_sequence_number())
//!     .build();
//!
//! context.emit(&AccessEvent::new(data));
//! context.close();
//! ```
//!
//! ## Configuration resolution
//!
//! The configuration resource is taken from
//! [`AccessLogConfig::config_location`] if it exists, else the first existing
//! entry of [`AccessLogConfig::default_locations`], else the built-in
//! [`FALLBACK_CONFIG`], which attaches a single [`TracingAppender`].

pub mod appender;
pub mod capture;
pub mod config;
pub mod configurator;
pub mod constants;
pub mod context;
pub mod error;
pub mod event;
pub mod filter;
pub mod lifecycle;
pub mod resource;

#[cfg(test)]
mod tests;

pub use appender::{Appender, JsonAppender, ListAppender, TracingAppender};
pub use capture::{BodyCapturePolicy, SuppressionMarker, resolve_charset};
pub use config::{AccessLogConfig, BodyCaptureConfig, LocalPortStrategy, UrlFilterConfig};
pub use configurator::{Configurator, JsonConfigurator};
pub use constants::{DEFAULT_CONFIGS, FALLBACK_CONFIG};
pub use context::{AccessContext, AccessLogContext, DropReason, EmitDecision, LifecycleState};
pub use error::{AccessLogError, AppendError, ConfigError, EventError, FilterError, Result};
pub use event::{
    AccessEvent, AccessEventData, AccessEventDataBuilder, HeaderMap, NA, ParameterMap, SENTINEL,
};
pub use filter::{Filter, FilterReply, UrlFilter};
pub use resource::{DefaultResourceLoader, ResourceLoader};

/// Commonly used types for adapters and embedding applications.
pub mod prelude {
    pub use crate::appender::{Appender, JsonAppender, ListAppender, TracingAppender};
    pub use crate::capture::{
        BodyCapturePolicy, RequestBody, ResponseBody, capture_request_body,
        capture_response_body, flatten_attributes, format_query_string, format_request_line,
        now_millis, resolve_remote_user,
    };
    pub use crate::config::{AccessLogConfig, BodyCaptureConfig, LocalPortStrategy};
    pub use crate::context::AccessLogContext;
    pub use crate::error::{AppendError, ConfigError};
    pub use crate::event::{AccessEvent, AccessEventData, HeaderMap, ParameterMap};
    pub use crate::filter::{Filter, FilterReply};
}
