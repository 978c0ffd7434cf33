//! Constants and default values shared across the crate.

/// Default configuration locations, searched in order when no explicit
/// location is configured.
pub const DEFAULT_CONFIGS: &[&str] = &[
    "classpath:access-log-test.json",
    "classpath:access-log.json",
    "file:access-log-test.json",
    "file:access-log.json",
];

/// Built-in configuration used when neither an explicit location nor any
/// default location resolves.
pub const FALLBACK_CONFIG: &str = "classpath:access_log/access-log-default.json";

/// Content of [`FALLBACK_CONFIG`]: a single tracing appender, no filters.
pub const FALLBACK_CONFIG_CONTENT: &str = r#"{
  "appenders": [
    { "type": "tracing", "name": "console" }
  ]
}"#;

/// Default maximum captured body size in bytes. Payloads of exactly this
/// size are still logged.
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 65536;

/// Content types whose bodies are logged verbatim when no allow-list is
/// configured.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] = &[
    "text/*",
    "application/json",
    "application/xml",
    "application/*+json",
    "application/*+xml",
    "application/x-www-form-urlencoded",
];

/// Marker replacing bodies larger than the configured maximum.
pub const CONTENT_TOO_LARGE: &str = "[CONTENT TOO LARGE]";

/// Marker replacing bodies of non-allowed, non-image content types.
pub const BINARY_CONTENT_SUPPRESSED: &str = "[BINARY CONTENT SUPPRESSED]";

/// Marker replacing bodies of non-allowed `image/*` content types.
pub const IMAGE_CONTENTS_SUPPRESSED: &str = "[IMAGE CONTENTS SUPPRESSED]";
