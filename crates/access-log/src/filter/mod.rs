//! Event eligibility filtering.
//!
//! Two stages run in order for every emitted event:
//!
//! 1. [`UrlFilter`]: include/exclude regex patterns over the request URI,
//!    compiled once from configuration.
//! 2. The filter chain: [`Filter`] implementations attached to the access
//!    context, evaluated by [`chain_decision`].

mod chain;
mod url;

pub use chain::{Filter, FilterReply, MethodFilter, StatusFilter, chain_decision};
pub use url::UrlFilter;
