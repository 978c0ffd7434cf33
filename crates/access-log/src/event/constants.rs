//! Sentinel values of the event accessor protocol.
//!
//! Downstream appenders depend on these exact values; they are part of the
//! outbound contract and must not change.

/// Placeholder returned for a missing string field ("not available").
pub const NA: &str = "-";

/// Placeholder returned for a missing numeric field.
pub const SENTINEL: i64 = -1;

/// Request attribute under which a security layer stores the authenticated
/// user name, preferred over the server-reported remote user.
pub const REMOTE_USER_ATTR: &str = "access_log.remote_user";

/// Request attribute holding the captured request body buffer.
///
/// Never copied into the attribute map of a snapshot.
pub const INPUT_BUFFER_ATTR: &str = "access_log.input_buffer";

/// Request attribute holding the captured response body buffer.
///
/// Never copied into the attribute map of a snapshot.
pub const OUTPUT_BUFFER_ATTR: &str = "access_log.output_buffer";
