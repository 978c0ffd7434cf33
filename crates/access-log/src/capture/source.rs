//! Helpers for server adapters building [`AccessEventData`](crate::AccessEventData).
//!
//! Adapters extract raw values from their server's request/response types and
//! use these functions so every server formats query strings, request lines,
//! attributes and captured bodies the same way.

use super::charset::{decode, encode, resolve_charset};
use super::policy::{BodyCapturePolicy, mime_type};
use crate::event::{INPUT_BUFFER_ATTR, OUTPUT_BUFFER_ATTR, ParameterMap, REMOTE_USER_ATTR};
use std::collections::BTreeMap;

const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";

/// Request-side inputs for body capture.
#[derive(Debug, Clone, Copy)]
pub struct RequestBody<'a> {
    /// Request method
    pub method: &'a str,
    /// Declared `Content-Type`, if any
    pub content_type: Option<&'a str>,
    /// Declared character encoding, if any
    pub character_encoding: Option<&'a str>,
    /// Raw body bytes captured while the request was read
    pub buffer: Option<&'a [u8]>,
    /// Parsed request parameters, used when no raw buffer exists
    pub parameters: &'a ParameterMap,
}

/// Response-side inputs for body capture.
#[derive(Debug, Clone, Copy)]
pub struct ResponseBody<'a> {
    /// Declared `Content-Type`, if any
    pub content_type: Option<&'a str>,
    /// Declared character encoding, if any
    pub character_encoding: Option<&'a str>,
    /// Raw body bytes captured while the response was written
    pub buffer: Option<&'a [u8]>,
}

/// Captures the request body text for a snapshot.
///
/// Returns `None` when capture is disabled, so form data such as login
/// credentials is never exposed unless explicitly enabled. With a raw buffer,
/// the policy is applied to its size and the bytes are decoded. Without one,
/// form-urlencoded POST parameters are re-encoded and the policy is applied
/// to the encoded size.
pub fn capture_request_body(body: &RequestBody<'_>, policy: &BodyCapturePolicy) -> Option<String> {
    if !policy.is_enabled() {
        return None;
    }
    let charset = resolve_charset(body.character_encoding);
    match body.buffer {
        Some(buffer) => Some(
            policy
                .evaluate(body.content_type, buffer.len())
                .map_or_else(|| decode(buffer, charset), |marker| marker.to_string()),
        ),
        None => {
            if !is_form_url_encoded(body.method, body.content_type) {
                return None;
            }
            let form = encode_form_data(body.parameters, body.character_encoding);
            let size = encode(&form, charset).len();
            Some(
                policy
                    .evaluate(body.content_type, size)
                    .map_or(form, |marker| marker.to_string()),
            )
        }
    }
}

/// Captures the response body text for a snapshot.
///
/// Returns `None` when capture is disabled or nothing was captured.
pub fn capture_response_body(
    body: &ResponseBody<'_>,
    policy: &BodyCapturePolicy,
) -> Option<String> {
    if !policy.is_enabled() {
        return None;
    }
    let buffer = body.buffer?;
    Some(
        policy
            .evaluate(body.content_type, buffer.len())
            .map_or_else(
                || decode(buffer, resolve_charset(body.character_encoding)),
                |marker| marker.to_string(),
            ),
    )
}

/// Returns true for a POST whose content type is form-urlencoded.
pub fn is_form_url_encoded(method: &str, content_type: Option<&str>) -> bool {
    method.eq_ignore_ascii_case("POST")
        && content_type.is_some_and(|ct| mime_type(ct) == FORM_URL_ENCODED)
}

/// Re-encodes parameters as `application/x-www-form-urlencoded`.
///
/// Names and values are encoded in the given character set (UTF-8 when
/// unknown) before percent-encoding.
pub fn encode_form_data(parameters: &ParameterMap, character_encoding: Option<&str>) -> String {
    let charset = resolve_charset(character_encoding);
    let component = |text: &str| -> String {
        form_urlencoded::byte_serialize(&encode(text, charset)).collect()
    };
    parameters
        .iter()
        .flat_map(|(name, values)| values.iter().map(move |value| (name, value)))
        .map(|(name, value)| format!("{}={}", component(name), component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Formats a raw query as stored in snapshots: `?query`, or empty when absent.
pub fn format_query_string(query: Option<&str>) -> String {
    query.map(|q| format!("?{q}")).unwrap_or_default()
}

/// Formats the request line: `METHOD /path?query PROTOCOL`.
pub fn format_request_line(
    method: &str,
    uri: Option<&str>,
    query: Option<&str>,
    protocol: &str,
) -> String {
    format!(
        "{method} {}{} {protocol}",
        uri.unwrap_or_default(),
        format_query_string(query)
    )
}

/// Flattens request attributes, dropping the captured body buffers.
pub fn flatten_attributes<I, K, V>(attributes: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    attributes
        .into_iter()
        .map(|(name, value)| (name.into(), value.to_string()))
        .filter(|(name, _)| name != INPUT_BUFFER_ATTR && name != OUTPUT_BUFFER_ATTR)
        .collect()
}

/// Resolves the authenticated user, preferring the value a security layer
/// stored under [`REMOTE_USER_ATTR`] over the server-reported one.
pub fn resolve_remote_user(
    attributes: &BTreeMap<String, String>,
    server_user: Option<&str>,
) -> Option<String> {
    attributes
        .get(REMOTE_USER_ATTR)
        .map(String::as_str)
        .or(server_user)
        .map(str::to_string)
}

/// Current time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Milliseconds elapsed since `start_millis`, clamped at zero.
pub fn elapsed_since(start_millis: i64) -> u64 {
    u64::try_from(now_millis().saturating_sub(start_millis)).unwrap_or(0)
}
