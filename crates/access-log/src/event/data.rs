//! Immutable snapshot of one request/response exchange.
//!
//! An [`AccessEventData`] owns every value it reports. It never references the
//! connection, socket or server request object it was built from, so it can
//! outlive the request, cross threads and round-trip through serde.

use super::headers::HeaderMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Multi-valued request parameters keyed by parameter name.
pub type ParameterMap = BTreeMap<String, Vec<String>>;

/// Array-shaped view of [`ParameterMap`].
pub type ParameterArrayMap = BTreeMap<String, Box<[String]>>;

/// Lazily derived array view of the parameter map.
///
/// Excluded from serialization and equality; clones start empty and derive
/// again on first access.
#[derive(Default)]
struct ParameterArrayView(OnceLock<ParameterArrayMap>);

impl ParameterArrayView {
    fn get_or_derive(&self, source: &ParameterMap) -> &ParameterArrayMap {
        self.0.get_or_init(|| {
            source
                .iter()
                .map(|(name, values)| (name.clone(), values.clone().into_boxed_slice()))
                .collect()
        })
    }
}

impl Clone for ParameterArrayView {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl PartialEq for ParameterArrayView {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ParameterArrayView {}

impl fmt::Debug for ParameterArrayView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0.get().is_some() {
            "ParameterArrayView(derived)"
        } else {
            "ParameterArrayView(pending)"
        })
    }
}

/// All loggable facts about one request/response at a single point in time.
///
/// Construct through [`AccessEventData::builder`]. Missing optional values are
/// `None` here; sentinel substitution happens only in
/// [`AccessEvent`](super::AccessEvent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEventData {
    timestamp: i64,
    elapsed_time: Option<u64>,
    sequence_number: Option<u64>,
    thread_name: String,
    server_name: Option<String>,
    local_port: u16,
    remote_addr: String,
    remote_host: String,
    remote_user: Option<String>,
    protocol: String,
    method: String,
    request_uri: Option<String>,
    query_string: String,
    request_url: String,
    request_headers: HeaderMap,
    cookies: BTreeMap<String, String>,
    request_parameters: ParameterMap,
    attributes: BTreeMap<String, String>,
    session_id: Option<String>,
    request_content: Option<String>,
    status_code: u16,
    response_headers: HeaderMap,
    content_length: u64,
    response_content: Option<String>,
    #[serde(skip)]
    parameter_arrays: ParameterArrayView,
}

impl AccessEventData {
    /// Starts building a snapshot.
    ///
    /// The timestamp defaults to now and the thread name to the calling
    /// thread, so adapters only set what they extract.
    pub fn builder() -> AccessEventDataBuilder {
        AccessEventDataBuilder::new()
    }

    /// Capture time in epoch milliseconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Processing time in milliseconds, if known.
    pub fn elapsed_time(&self) -> Option<u64> {
        self.elapsed_time
    }

    /// Sequence number assigned by the context's generator, if configured.
    pub fn sequence_number(&self) -> Option<u64> {
        self.sequence_number
    }

    /// Name of the thread that processed the request.
    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    /// Server name from the Host header or server configuration.
    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    /// Port reported according to the configured local-port strategy.
    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    /// Address of the remote client.
    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    /// Host name of the remote client; equals the address when reverse DNS
    /// is disabled.
    pub fn remote_host(&self) -> &str {
        &self.remote_host
    }

    /// Authenticated user, if any.
    pub fn remote_user(&self) -> Option<&str> {
        self.remote_user.as_deref()
    }

    /// Protocol and version, e.g. `HTTP/1.1`.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Request method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path without query string; `None` for malformed requests.
    pub fn request_uri(&self) -> Option<&str> {
        self.request_uri.as_deref()
    }

    /// Query string with its leading `?`, or empty.
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Full request line: method, URI with query, protocol.
    pub fn request_url(&self) -> &str {
        &self.request_url
    }

    /// Request headers.
    pub fn request_headers(&self) -> &HeaderMap {
        &self.request_headers
    }

    /// Request cookies.
    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    /// Request parameters.
    pub fn request_parameters(&self) -> &ParameterMap {
        &self.request_parameters
    }

    /// Array-shaped view of the request parameters, derived on first access.
    pub fn request_parameter_arrays(&self) -> &ParameterArrayMap {
        self.parameter_arrays
            .get_or_derive(&self.request_parameters)
    }

    /// String-valued request attributes.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Session identifier, if a session exists.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Captured request body, possibly replaced by a suppression marker.
    pub fn request_content(&self) -> Option<&str> {
        self.request_content.as_deref()
    }

    /// Response status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Response headers.
    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    /// Number of response body bytes written.
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Captured response body, possibly replaced by a suppression marker.
    pub fn response_content(&self) -> Option<&str> {
        self.response_content.as_deref()
    }
}

/// Builder for [`AccessEventData`].
///
/// Values are moved in; the finished snapshot exposes no setters.
#[derive(Debug, Clone)]
pub struct AccessEventDataBuilder {
    data: AccessEventData,
}

impl Default for AccessEventDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessEventDataBuilder {
    /// Creates a builder with the current time and thread name.
    pub fn new() -> Self {
        Self {
            data: AccessEventData {
                timestamp: chrono::Utc::now().timestamp_millis(),
                elapsed_time: None,
                sequence_number: None,
                thread_name: std::thread::current()
                    .name()
                    .unwrap_or("unnamed")
                    .to_string(),
                server_name: None,
                local_port: 0,
                remote_addr: String::new(),
                remote_host: String::new(),
                remote_user: None,
                protocol: String::new(),
                method: String::new(),
                request_uri: None,
                query_string: String::new(),
                request_url: String::new(),
                request_headers: HeaderMap::new(),
                cookies: BTreeMap::new(),
                request_parameters: ParameterMap::new(),
                attributes: BTreeMap::new(),
                session_id: None,
                request_content: None,
                status_code: 0,
                response_headers: HeaderMap::new(),
                content_length: 0,
                response_content: None,
                parameter_arrays: ParameterArrayView::default(),
            },
        }
    }

    /// Sets the capture timestamp in epoch milliseconds.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.data.timestamp = timestamp;
        self
    }

    /// Sets the elapsed processing time in milliseconds.
    pub fn with_elapsed_time(mut self, elapsed_ms: Option<u64>) -> Self {
        self.data.elapsed_time = elapsed_ms;
        self
    }

    /// Sets the sequence number.
    pub fn with_sequence_number(mut self, sequence_number: Option<u64>) -> Self {
        self.data.sequence_number = sequence_number;
        self
    }

    /// Sets the processing thread name.
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.data.thread_name = thread_name.into();
        self
    }

    /// Sets the server name.
    pub fn with_server_name(mut self, server_name: Option<String>) -> Self {
        self.data.server_name = server_name;
        self
    }

    /// Sets the reported local port.
    pub fn with_local_port(mut self, port: u16) -> Self {
        self.data.local_port = port;
        self
    }

    /// Sets the remote address.
    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.data.remote_addr = addr.into();
        self
    }

    /// Sets the remote host.
    pub fn with_remote_host(mut self, host: impl Into<String>) -> Self {
        self.data.remote_host = host.into();
        self
    }

    /// Sets the authenticated user.
    pub fn with_remote_user(mut self, user: Option<String>) -> Self {
        self.data.remote_user = user;
        self
    }

    /// Sets the protocol string.
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.data.protocol = protocol.into();
        self
    }

    /// Sets the request method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.data.method = method.into();
        self
    }

    /// Sets the request path.
    pub fn with_request_uri(mut self, uri: Option<String>) -> Self {
        self.data.request_uri = uri;
        self
    }

    /// Sets the query string. Pass the `?`-prefixed form or an empty string.
    pub fn with_query_string(mut self, query: impl Into<String>) -> Self {
        self.data.query_string = query.into();
        self
    }

    /// Sets the full request line.
    pub fn with_request_url(mut self, request_url: impl Into<String>) -> Self {
        self.data.request_url = request_url.into();
        self
    }

    /// Sets the request headers.
    pub fn with_request_headers(mut self, headers: HeaderMap) -> Self {
        self.data.request_headers = headers;
        self
    }

    /// Sets the cookies.
    pub fn with_cookies(mut self, cookies: BTreeMap<String, String>) -> Self {
        self.data.cookies = cookies;
        self
    }

    /// Sets the request parameters.
    pub fn with_request_parameters(mut self, parameters: ParameterMap) -> Self {
        self.data.request_parameters = parameters;
        self
    }

    /// Sets the request attributes.
    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.data.attributes = attributes;
        self
    }

    /// Sets the session identifier.
    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.data.session_id = session_id;
        self
    }

    /// Sets the captured request body.
    pub fn with_request_content(mut self, content: Option<String>) -> Self {
        self.data.request_content = content;
        self
    }

    /// Sets the response status code.
    pub fn with_status_code(mut self, status: u16) -> Self {
        self.data.status_code = status;
        self
    }

    /// Sets the response headers.
    pub fn with_response_headers(mut self, headers: HeaderMap) -> Self {
        self.data.response_headers = headers;
        self
    }

    /// Sets the number of response bytes written.
    pub fn with_content_length(mut self, length: u64) -> Self {
        self.data.content_length = length;
        self
    }

    /// Sets the captured response body.
    pub fn with_response_content(mut self, content: Option<String>) -> Self {
        self.data.response_content = content;
        self
    }

    /// Finishes the snapshot.
    pub fn build(self) -> AccessEventData {
        self.data
    }
}
