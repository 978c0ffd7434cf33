//! URI include/exclude filtering.
//!
//! Patterns are regular expressions matched anywhere in the URI: `/api`
//! matches `/v1/api/users`. Anchor patterns (`^/api$`) for exact matching.

use crate::config::UrlFilterConfig;
use crate::error::ConfigError;
use regex::Regex;

/// Compiled URI filter.
///
/// Built once when the context is created; evaluation never recompiles.
#[derive(Debug, Clone, Default)]
pub struct UrlFilter {
    include: Option<Vec<Regex>>,
    exclude: Option<Vec<Regex>>,
}

impl UrlFilter {
    /// Compiles the configured include and exclude patterns.
    pub fn new(config: &UrlFilterConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            include: compile_all(config.include_url_patterns.as_deref())?,
            exclude: compile_all(config.exclude_url_patterns.as_deref())?,
        })
    }

    /// Returns true if the URI is eligible for logging.
    ///
    /// A URI is logged when it matches an include pattern (or none are
    /// configured) and matches no exclude pattern.
    pub fn should_log(&self, uri: &str) -> bool {
        self.matches_include(uri) && !self.matches_exclude(uri)
    }

    fn matches_include(&self, uri: &str) -> bool {
        self.include
            .as_ref()
            .is_none_or(|patterns| patterns.iter().any(|p| p.is_match(uri)))
    }

    fn matches_exclude(&self, uri: &str) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|patterns| patterns.iter().any(|p| p.is_match(uri)))
    }
}

fn compile_all(patterns: Option<&[String]>) -> Result<Option<Vec<Regex>>, ConfigError> {
    patterns
        .map(|patterns| {
            patterns
                .iter()
                .map(|pattern| {
                    Regex::new(pattern).map_err(|source| ConfigError::InvalidUrlPattern {
                        pattern: pattern.clone(),
                        source,
                    })
                })
                .collect()
        })
        .transpose()
}
