//! Applying a configuration resource to an [`AccessContext`].
//!
//! The [`Configurator`] trait is the seam for configuration formats. The
//! bundled [`JsonConfigurator`] reads documents such as:
//!
//! ```json
//! {
//!   "sequence_numbers": true,
//!   "appenders": [
//!     { "type": "tracing", "name": "console" },
//!     { "type": "json" }
//!   ],
//!   "filters": [
//!     { "type": "status", "min": 200, "max": 399, "on_match": "deny" },
//!     { "type": "method", "methods": ["OPTIONS"] }
//!   ]
//! }
//! ```

use crate::appender::{Appender, JsonAppender, TracingAppender};
use crate::context::AccessContext;
use crate::error::ConfigError;
use crate::event::BasicSequenceNumberGenerator;
use crate::filter::{Filter, FilterReply, MethodFilter, StatusFilter};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Applies configuration content to a context.
pub trait Configurator: Send + Sync {
    /// Attaches appenders, filters and generators described by `content`,
    /// loaded from `location`.
    fn configure(
        &self,
        context: &AccessContext,
        location: &str,
        content: &str,
    ) -> Result<(), ConfigError>;
}

// =============================================================================
// Document model
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDocument {
    #[serde(default)]
    sequence_numbers: bool,
    #[serde(default)]
    appenders: Vec<AppenderEntry>,
    #[serde(default)]
    filters: Vec<FilterEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum AppenderEntry {
    Tracing { name: Option<String> },
    Json { name: Option<String> },
}

impl AppenderEntry {
    fn build(self) -> Arc<dyn Appender> {
        match self {
            AppenderEntry::Tracing { name } => {
                Arc::new(name.map(TracingAppender::new).unwrap_or_default())
            }
            AppenderEntry::Json { name } => Arc::new(name.map(JsonAppender::new).unwrap_or_default()),
        }
    }
}

fn deny() -> FilterReply {
    FilterReply::Deny
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum FilterEntry {
    Status {
        name: Option<String>,
        min: u16,
        max: u16,
        #[serde(default = "deny")]
        on_match: FilterReply,
        #[serde(default)]
        on_mismatch: FilterReply,
    },
    Method {
        name: Option<String>,
        methods: Vec<String>,
        #[serde(default = "deny")]
        on_match: FilterReply,
        #[serde(default)]
        on_mismatch: FilterReply,
    },
}

impl FilterEntry {
    fn build(self, location: &str) -> Result<Arc<dyn Filter>, ConfigError> {
        match self {
            FilterEntry::Status {
                name,
                min,
                max,
                on_match,
                on_mismatch,
            } => {
                if min > max {
                    return Err(ConfigError::Invalid {
                        location: location.to_string(),
                        message: format!("status filter range {min}..={max} is empty"),
                    });
                }
                Ok(Arc::new(
                    StatusFilter::new(name.unwrap_or_else(|| "status".to_string()), min, max)
                        .on_match(on_match)
                        .on_mismatch(on_mismatch),
                ))
            }
            FilterEntry::Method {
                name,
                methods,
                on_match,
                on_mismatch,
            } => {
                if methods.is_empty() {
                    return Err(ConfigError::Invalid {
                        location: location.to_string(),
                        message: "method filter lists no methods".to_string(),
                    });
                }
                Ok(Arc::new(
                    MethodFilter::new(name.unwrap_or_else(|| "method".to_string()), methods)
                        .on_match(on_match)
                        .on_mismatch(on_mismatch),
                ))
            }
        }
    }
}

// =============================================================================
// JsonConfigurator
// =============================================================================

/// Configurator for the JSON document format shown in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConfigurator;

impl Configurator for JsonConfigurator {
    fn configure(
        &self,
        context: &AccessContext,
        location: &str,
        content: &str,
    ) -> Result<(), ConfigError> {
        let document: ConfigDocument =
            serde_json::from_str(content).map_err(|source| ConfigError::Parse {
                location: location.to_string(),
                source,
            })?;

        // Build everything before touching the context so a bad document
        // leaves it empty.
        let appenders: Vec<Arc<dyn Appender>> =
            document.appenders.into_iter().map(AppenderEntry::build).collect();
        let mut seen = HashSet::new();
        if let Some(duplicate) = appenders.iter().find(|a| !seen.insert(a.name().to_string())) {
            return Err(ConfigError::Invalid {
                location: location.to_string(),
                message: format!("duplicate appender name '{}'", duplicate.name()),
            });
        }
        let filters = document
            .filters
            .into_iter()
            .map(|entry| entry.build(location))
            .collect::<Result<Vec<_>, _>>()?;

        if document.sequence_numbers {
            context.set_sequence_number_generator(Arc::new(BasicSequenceNumberGenerator::new()));
        }
        for filter in filters {
            context.add_filter(filter);
        }
        for appender in appenders {
            context.add_appender(appender);
        }
        Ok(())
    }
}
