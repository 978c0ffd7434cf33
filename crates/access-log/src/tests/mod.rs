//! Unit tests for the access log crate.
//!
//! Property-based tests use proptest for the URL filter and body capture
//! policy invariants.

#[cfg(test)]
pub mod appender_tests;


#[cfg(test)]
pub mod config_tests;

#[cfg(test)]
pub mod context_tests;



use crate::capture::{format_query_string, format_request_line};
use crate::event::{AccessEvent, AccessEventData};

/// Builds a GET event for `uri` with a 200 status.
pub(crate) fn event_for(uri: &str) -> AccessEvent {
    AccessEvent::new(
        AccessEventData::builder()
            .with_timestamp(1_700_000_000_000)
            .with_thread_name("http-nio-1")
            .with_method("GET")
            .with_protocol("HTTP/1.1")
            .with_request_uri(Some(uri.to_string()))
            .with_query_string(format_query_string(None))
            .with_request_url(format_request_line("GET", Some(uri), None, "HTTP/1.1"))
            .with_remote_addr("127.0.0.1")
            .with_remote_host("127.0.0.1")
            .with_local_port(8080)
            .with_status_code(200)
            .build(),
    )
}
