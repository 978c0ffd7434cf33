//! Body capture and adapter-side extraction helpers.
//!
//! - **policy**: [`BodyCapturePolicy`], the size/content-type suppression decision
//! - **charset**: [`resolve_charset`] with UTF-8 fallback, byte decoding
//! - **source**: helpers server adapters use to build snapshots consistently

mod charset;
mod policy;
mod source;

pub use charset::{decode, encode, resolve_charset};
pub use policy::{BodyCapturePolicy, SuppressionMarker, evaluate, mime_type};
pub use source::{
    RequestBody, ResponseBody, capture_request_body, capture_response_body, elapsed_since,
    encode_form_data, flatten_attributes, format_query_string, format_request_line,
    is_form_url_encoded, now_millis, resolve_remote_user,
};
