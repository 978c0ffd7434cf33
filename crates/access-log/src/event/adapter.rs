//! Read-only accessor protocol over an [`AccessEventData`] snapshot.
//!
//! Appenders consume events exclusively through [`AccessEvent`]. Its accessor
//! names and sentinel rules are a stable contract:
//!
//! | Missing value        | Returned as            |
//! |----------------------|------------------------|
//! | string field         | [`NA`]                 |
//! | numeric field        | [`SENTINEL`]           |
//! | request/response body| empty string           |
//! | request parameter    | `[NA]` (one element)   |

use super::constants::{NA, SENTINEL};
use super::data::{AccessEventData, ParameterArrayMap};
use super::headers::HeaderMap;
use crate::error::EventError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, LazyLock};

static MISSING_PARAMETER: LazyLock<[String; 1]> = LazyLock::new(|| [NA.to_string()]);

/// Access event handed to appenders and filters.
///
/// Cheap to clone: clones share the same immutable snapshot.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessEvent {
    data: Arc<AccessEventData>,
}

impl AccessEvent {
    /// Wraps a snapshot.
    pub fn new(data: AccessEventData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    /// Returns the underlying snapshot.
    pub fn data(&self) -> &AccessEventData {
        &self.data
    }

    /// Capture time in epoch milliseconds.
    pub fn timestamp(&self) -> i64 {
        self.data.timestamp()
    }

    /// Processing time in milliseconds, or [`SENTINEL`] when unknown.
    pub fn elapsed_time(&self) -> i64 {
        self.data
            .elapsed_time()
            .map_or(SENTINEL, saturating_i64)
    }

    /// Processing time in whole seconds, or [`SENTINEL`] when unknown.
    pub fn elapsed_seconds(&self) -> i64 {
        self.data
            .elapsed_time()
            .map_or(SENTINEL, |ms| saturating_i64(ms / 1000))
    }

    /// Sequence number, or [`SENTINEL`] when no generator is configured.
    pub fn sequence_number(&self) -> i64 {
        self.data
            .sequence_number()
            .map_or(SENTINEL, saturating_i64)
    }

    /// Name of the thread that processed the request.
    pub fn thread_name(&self) -> &str {
        self.data.thread_name()
    }

    /// Always fails: events are immutable once captured.
    pub fn set_thread_name(&self, _name: &str) -> Result<(), EventError> {
        Err(EventError::UnsupportedOperation("AccessEvent is immutable"))
    }

    /// Server name, or [`NA`].
    pub fn server_name(&self) -> &str {
        self.data.server_name().unwrap_or(NA)
    }

    /// Reported local port.
    pub fn local_port(&self) -> u16 {
        self.data.local_port()
    }

    /// Remote client address.
    pub fn remote_addr(&self) -> &str {
        self.data.remote_addr()
    }

    /// Remote client host name.
    pub fn remote_host(&self) -> &str {
        self.data.remote_host()
    }

    /// Authenticated user, or [`NA`].
    pub fn remote_user(&self) -> &str {
        self.data.remote_user().unwrap_or(NA)
    }

    /// Protocol and version, e.g. `HTTP/1.1`.
    pub fn protocol(&self) -> &str {
        self.data.protocol()
    }

    /// Request method.
    pub fn method(&self) -> &str {
        self.data.method()
    }

    /// Request path, or [`NA`] for malformed requests.
    pub fn request_uri(&self) -> &str {
        self.data.request_uri().unwrap_or(NA)
    }

    /// Query string with its leading `?`, or empty.
    pub fn query_string(&self) -> &str {
        self.data.query_string()
    }

    /// Full request line.
    pub fn request_url(&self) -> &str {
        self.data.request_url()
    }

    /// All request headers.
    pub fn request_header_map(&self) -> &HeaderMap {
        self.data.request_headers()
    }

    /// Request header names as first seen.
    pub fn request_header_names(&self) -> impl Iterator<Item = &str> {
        self.data.request_headers().names()
    }

    /// Request header value by case-insensitive name, or [`NA`].
    pub fn request_header(&self, name: &str) -> &str {
        self.data.request_headers().get(name).unwrap_or(NA)
    }

    /// Cookie value, or [`NA`].
    pub fn cookie(&self, name: &str) -> &str {
        self.data
            .cookies()
            .get(name)
            .map_or(NA, String::as_str)
    }

    /// Request parameters as arrays.
    pub fn request_parameter_map(&self) -> &ParameterArrayMap {
        self.data.request_parameter_arrays()
    }

    /// Values of a request parameter, or `[NA]` when absent.
    pub fn request_parameter(&self, name: &str) -> &[String] {
        self.data
            .request_parameter_arrays()
            .get(name)
            .map_or(&MISSING_PARAMETER[..], |values| &values[..])
    }

    /// Request attribute value, or [`NA`].
    pub fn attribute(&self, name: &str) -> &str {
        self.data
            .attributes()
            .get(name)
            .map_or(NA, String::as_str)
    }

    /// Session identifier, or [`NA`].
    pub fn session_id(&self) -> &str {
        self.data.session_id().unwrap_or(NA)
    }

    /// Captured request body, or an empty string.
    pub fn request_content(&self) -> &str {
        self.data.request_content().unwrap_or_default()
    }

    /// Response status code.
    pub fn status_code(&self) -> u16 {
        self.data.status_code()
    }

    /// All response headers.
    pub fn response_header_map(&self) -> &HeaderMap {
        self.data.response_headers()
    }

    /// Response header names as first seen.
    pub fn response_header_names(&self) -> Vec<&str> {
        self.data.response_headers().names().collect()
    }

    /// Response header value by case-insensitive name, or [`NA`].
    pub fn response_header(&self, name: &str) -> &str {
        self.data.response_headers().get(name).unwrap_or(NA)
    }

    /// Number of response body bytes written.
    pub fn content_length(&self) -> u64 {
        self.data.content_length()
    }

    /// Captured response body, or an empty string.
    pub fn response_content(&self) -> &str {
        self.data.response_content().unwrap_or_default()
    }

    /// No-op: the snapshot is already fully captured.
    ///
    /// Kept so appenders written against the deferred-processing protocol
    /// can call it unconditionally.
    pub fn prepare_for_deferred_processing(&self) {}
}

impl From<AccessEventData> for AccessEvent {
    fn from(data: AccessEventData) -> Self {
        Self::new(data)
    }
}

impl fmt::Debug for AccessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessEvent")
            .field("request_url", &self.request_url())
            .field("status_code", &self.status_code())
            .finish()
    }
}

impl fmt::Display for AccessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessEvent({} {})", self.request_url(), self.status_code())
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
