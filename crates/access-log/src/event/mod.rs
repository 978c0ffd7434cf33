//! Access event model.
//!
//! - **data**: [`AccessEventData`], the immutable snapshot built by server adapters
//! - **adapter**: [`AccessEvent`], the sentinel-substituting accessor view appenders read
//! - **headers**: case-insensitive [`HeaderMap`]
//! - **sequence**: sequence-number generators queried once per event
//! - **constants**: sentinels and well-known attribute names

mod adapter;
mod constants;
mod data;
mod headers;
mod sequence;

pub use adapter::AccessEvent;
pub use constants::{INPUT_BUFFER_ATTR, NA, OUTPUT_BUFFER_ATTR, REMOTE_USER_ATTR, SENTINEL};
pub use data::{AccessEventData, AccessEventDataBuilder, ParameterArrayMap, ParameterMap};
pub use headers::HeaderMap;
pub use sequence::{BasicSequenceNumberGenerator, SequenceNumberGenerator};
