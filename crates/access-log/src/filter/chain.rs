//! Configured filter chain evaluated after URL filtering.

use crate::error::FilterError;
use crate::event::AccessEvent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Decision returned by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterReply {
    /// Drop the event; later filters are not consulted.
    Deny,
    /// No opinion; consult the next filter.
    #[default]
    Neutral,
    /// Log the event; later filters are not consulted.
    Accept,
}

/// A single accept/deny decision over access events.
pub trait Filter: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Decides on an event.
    fn decide(&self, event: &AccessEvent) -> Result<FilterReply, FilterError>;

    /// Releases resources when the context closes.
    fn stop(&self) {}
}

/// Evaluates filters in order; the first non-neutral reply wins.
///
/// An empty chain is neutral.
pub fn chain_decision(
    filters: &[Arc<dyn Filter>],
    event: &AccessEvent,
) -> Result<FilterReply, FilterError> {
    for filter in filters {
        match filter.decide(event)? {
            FilterReply::Neutral => continue,
            decisive => return Ok(decisive),
        }
    }
    Ok(FilterReply::Neutral)
}

// =============================================================================
// StatusFilter
// =============================================================================

/// Matches events whose status code lies in an inclusive range.
#[derive(Debug, Clone)]
pub struct StatusFilter {
    name: String,
    min: u16,
    max: u16,
    on_match: FilterReply,
    on_mismatch: FilterReply,
}

impl StatusFilter {
    /// Creates a filter matching `min..=max` that denies matches and is
    /// neutral otherwise.
    pub fn new(name: impl Into<String>, min: u16, max: u16) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            on_match: FilterReply::Deny,
            on_mismatch: FilterReply::Neutral,
        }
    }

    /// Sets the reply for matching events.
    pub fn on_match(mut self, reply: FilterReply) -> Self {
        self.on_match = reply;
        self
    }

    /// Sets the reply for non-matching events.
    pub fn on_mismatch(mut self, reply: FilterReply) -> Self {
        self.on_mismatch = reply;
        self
    }
}

impl Filter for StatusFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, event: &AccessEvent) -> Result<FilterReply, FilterError> {
        let status = event.status_code();
        Ok(if (self.min..=self.max).contains(&status) {
            self.on_match
        } else {
            self.on_mismatch
        })
    }
}

// =============================================================================
// MethodFilter
// =============================================================================

/// Matches events by request method, case-insensitively.
#[derive(Debug, Clone)]
pub struct MethodFilter {
    name: String,
    methods: Vec<String>,
    on_match: FilterReply,
    on_mismatch: FilterReply,
}

impl MethodFilter {
    /// Creates a filter matching any of `methods` that denies matches and is
    /// neutral otherwise.
    pub fn new(name: impl Into<String>, methods: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            methods: methods
                .into_iter()
                .map(|m| m.into().to_ascii_uppercase())
                .collect(),
            on_match: FilterReply::Deny,
            on_mismatch: FilterReply::Neutral,
        }
    }

    /// Sets the reply for matching events.
    pub fn on_match(mut self, reply: FilterReply) -> Self {
        self.on_match = reply;
        self
    }

    /// Sets the reply for non-matching events.
    pub fn on_mismatch(mut self, reply: FilterReply) -> Self {
        self.on_mismatch = reply;
        self
    }
}

impl Filter for MethodFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, event: &AccessEvent) -> Result<FilterReply, FilterError> {
        let method = event.method();
        Ok(
            if self.methods.iter().any(|m| m.eq_ignore_ascii_case(method)) {
                self.on_match
            } else {
                self.on_mismatch
            },
        )
    }
}
