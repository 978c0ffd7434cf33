//! Body capture suppression policy.
//!
//! Decides from the declared content type and the payload byte size, never
//! from decoded content, whether a captured body may be logged verbatim.
//!
//! Decision order, first match wins:
//!
//! 1. Payload larger than the maximum: [`SuppressionMarker::ContentTooLarge`],
//!    regardless of content type.
//! 2. Content type not on the allow-list: [`SuppressionMarker::ImageContents`]
//!    for `image/*`, otherwise [`SuppressionMarker::BinaryContent`]. A missing
//!    content type is treated as textual and allowed.
//! 3. Otherwise the body is logged verbatim.

use crate::config::BodyCaptureConfig;
use crate::constants::{
    BINARY_CONTENT_SUPPRESSED, CONTENT_TOO_LARGE, DEFAULT_ALLOWED_CONTENT_TYPES,
    IMAGE_CONTENTS_SUPPRESSED,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder written instead of a body that may not be logged verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionMarker {
    /// Payload exceeded the configured maximum size.
    ContentTooLarge,
    /// Content type not allowed and not an image.
    BinaryContent,
    /// Content type not allowed and an image.
    ImageContents,
}

impl SuppressionMarker {
    /// Returns the marker text written to the log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContentTooLarge => CONTENT_TOO_LARGE,
            Self::BinaryContent => BINARY_CONTENT_SUPPRESSED,
            Self::ImageContents => IMAGE_CONTENTS_SUPPRESSED,
        }
    }
}

impl fmt::Display for SuppressionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One allow-list entry, lower-cased once at construction.
#[derive(Debug, Clone)]
struct MimePattern {
    raw: String,
    kind: MimePatternKind,
}

#[derive(Debug, Clone)]
enum MimePatternKind {
    /// `type/subtype`
    Exact,
    /// `type/*`, stored as the `type/` prefix
    AnySubtype(String),
    /// `type/*+suffix`, stored as `type/` and `+suffix`
    StructuredSuffix { prefix: String, suffix: String },
}

impl MimePattern {
    fn parse(pattern: &str) -> Self {
        let raw = pattern.to_lowercase();
        let kind = if let Some(prefix) = raw.strip_suffix('*').filter(|p| p.ends_with('/')) {
            MimePatternKind::AnySubtype(prefix.to_string())
        } else if let Some((type_, suffix)) = raw.split_once("/*+") {
            MimePatternKind::StructuredSuffix {
                prefix: format!("{type_}/"),
                suffix: format!("+{suffix}"),
            }
        } else {
            MimePatternKind::Exact
        };
        Self { raw, kind }
    }

    fn matches(&self, mime_type: &str) -> bool {
        if self.raw == mime_type {
            return true;
        }
        match &self.kind {
            MimePatternKind::Exact => false,
            MimePatternKind::AnySubtype(prefix) => mime_type.starts_with(prefix.as_str()),
            MimePatternKind::StructuredSuffix { prefix, suffix } => {
                mime_type.starts_with(prefix.as_str()) && mime_type.ends_with(suffix.as_str())
            }
        }
    }
}

/// Extracts the lower-cased MIME type, dropping `;` parameters.
pub fn mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Compiled body capture policy.
///
/// Built once from [`BodyCaptureConfig`] and shared by every capture.
#[derive(Debug, Clone)]
pub struct BodyCapturePolicy {
    enabled: bool,
    max_payload_size: usize,
    allowed: Vec<MimePattern>,
}

impl BodyCapturePolicy {
    /// Compiles the policy from configuration.
    pub fn new(config: &BodyCaptureConfig) -> Self {
        let allowed = match &config.allowed_content_types {
            Some(patterns) => patterns.iter().map(|p| MimePattern::parse(p)).collect(),
            None => DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|p| MimePattern::parse(p))
                .collect(),
        };
        Self {
            enabled: config.enabled,
            max_payload_size: config.max_payload_size,
            allowed,
        }
    }

    /// Whether body capture is switched on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Largest payload logged verbatim.
    pub fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }

    /// Returns `None` when the body may be logged verbatim, otherwise the
    /// marker that replaces it.
    pub fn evaluate(
        &self,
        content_type: Option<&str>,
        payload_size: usize,
    ) -> Option<SuppressionMarker> {
        if payload_size > self.max_payload_size {
            return Some(SuppressionMarker::ContentTooLarge);
        }
        let Some(content_type) = content_type else {
            return None;
        };
        let mime = mime_type(content_type);
        if self.allowed.iter().any(|pattern| pattern.matches(&mime)) {
            None
        } else if mime.starts_with("image/") {
            Some(SuppressionMarker::ImageContents)
        } else {
            Some(SuppressionMarker::BinaryContent)
        }
    }
}

impl Default for BodyCapturePolicy {
    fn default() -> Self {
        Self::new(&BodyCaptureConfig::default())
    }
}

/// Evaluates a single body against a configuration.
///
/// Compiles the allow-list on every call; hold a [`BodyCapturePolicy`] when
/// evaluating repeatedly.
pub fn evaluate(
    content_type: Option<&str>,
    payload_size: usize,
    config: &BodyCaptureConfig,
) -> Option<SuppressionMarker> {
    BodyCapturePolicy::new(config).evaluate(content_type, payload_size)
}
