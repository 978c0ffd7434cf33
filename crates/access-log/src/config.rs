//! Configuration types for the access log context.
//!
//! - [`AccessLogConfig`]: top-level settings with builder methods
//! - [`UrlFilterConfig`]: include/exclude URI patterns
//! - [`BodyCaptureConfig`]: body capture switch, size limit and content-type allow-list
//! - [`LocalPortStrategy`]: which port adapters report
//!
//! All types deserialize with serde, falling back to defaults for missing
//! fields, so they can be embedded in an application's own config file.

use crate::constants::{DEFAULT_CONFIGS, DEFAULT_MAX_PAYLOAD_SIZE};
use serde::{Deserialize, Serialize};

/// Strategy for resolving the local port reported in access events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalPortStrategy {
    /// Port of the interface on which the request was received.
    Local,
    /// Port the client sent the request to. Reflects forwarded headers when
    /// the server honours them.
    #[default]
    Server,
}

impl LocalPortStrategy {
    /// Picks the port to report.
    pub fn resolve(&self, local_port: u16, server_port: u16) -> u16 {
        match self {
            LocalPortStrategy::Local => local_port,
            LocalPortStrategy::Server => server_port,
        }
    }
}

/// URI include/exclude patterns.
///
/// `None` for includes means every URI is included; `None` for excludes
/// means nothing is excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlFilterConfig {
    /// Regex patterns a URI must match (anywhere) to be logged.
    pub include_url_patterns: Option<Vec<String>>,
    /// Regex patterns that exclude a URI (anywhere) from logging.
    pub exclude_url_patterns: Option<Vec<String>>,
}

impl UrlFilterConfig {
    /// Creates a configuration that includes every URI.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an include pattern.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_url_patterns
            .get_or_insert_with(Vec::new)
            .push(pattern.into());
        self
    }

    /// Adds an exclude pattern.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_url_patterns
            .get_or_insert_with(Vec::new)
            .push(pattern.into());
        self
    }
}

/// Request/response body capture settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyCaptureConfig {
    /// Whether bodies are captured at all.
    pub enabled: bool,
    /// Largest body, in bytes, that is logged verbatim.
    pub max_payload_size: usize,
    /// Content-type patterns logged verbatim. `None` selects the built-in
    /// textual defaults.
    pub allowed_content_types: Option<Vec<String>>,
}

impl Default for BodyCaptureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            allowed_content_types: None,
        }
    }
}

impl BodyCaptureConfig {
    /// Creates a disabled configuration with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether bodies are captured.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the maximum verbatim payload size in bytes.
    pub fn with_max_payload_size(mut self, size: usize) -> Self {
        self.max_payload_size = size;
        self
    }

    /// Replaces the content-type allow-list.
    pub fn with_allowed_content_types(
        mut self,
        patterns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.allowed_content_types = Some(patterns.into_iter().map(Into::into).collect());
        self
    }
}

/// Top-level access log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessLogConfig {
    /// Whether access logging is active.
    pub enabled: bool,
    /// Explicit configuration resource (`classpath:`, `file:` or a path).
    pub config_location: Option<String>,
    /// Candidate locations tried in order when no explicit location resolves.
    pub default_locations: Vec<String>,
    /// Which port adapters report.
    pub local_port_strategy: LocalPortStrategy,
    /// Body capture settings.
    pub body_capture: BodyCaptureConfig,
    /// URI filtering.
    pub filter: UrlFilterConfig,
}

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            config_location: None,
            default_locations: DEFAULT_CONFIGS.iter().map(|s| s.to_string()).collect(),
            local_port_strategy: LocalPortStrategy::default(),
            body_capture: BodyCaptureConfig::default(),
            filter: UrlFilterConfig::default(),
        }
    }
}

impl AccessLogConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether access logging is active.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the explicit configuration location.
    pub fn with_config_location(mut self, location: impl Into<String>) -> Self {
        self.config_location = Some(location.into());
        self
    }

    /// Replaces the default location list.
    pub fn with_default_locations(
        mut self,
        locations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.default_locations = locations.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the local port strategy.
    pub fn with_local_port_strategy(mut self, strategy: LocalPortStrategy) -> Self {
        self.local_port_strategy = strategy;
        self
    }

    /// Sets body capture settings.
    pub fn with_body_capture(mut self, body_capture: BodyCaptureConfig) -> Self {
        self.body_capture = body_capture;
        self
    }

    /// Sets URI filtering.
    pub fn with_filter(mut self, filter: UrlFilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Adds an include URL pattern.
    pub fn include_url(mut self, pattern: impl Into<String>) -> Self {
        self.filter = self.filter.include(pattern);
        self
    }

    /// Adds an exclude URL pattern.
    pub fn exclude_url(mut self, pattern: impl Into<String>) -> Self {
        self.filter = self.filter.exclude(pattern);
        self
    }
}
