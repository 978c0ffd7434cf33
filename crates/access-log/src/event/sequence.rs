//! Sequence numbers for ordering access events.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of monotonically increasing event sequence numbers.
///
/// Adapters query the generator once per event while building a snapshot.
pub trait SequenceNumberGenerator: Send + Sync {
    /// Returns the next sequence number.
    fn next_sequence_number(&self) -> u64;
}

/// Process-local generator backed by an atomic counter.
///
/// The first number handed out is 1.
#[derive(Debug, Default)]
pub struct BasicSequenceNumberGenerator {
    counter: AtomicU64,
}

impl BasicSequenceNumberGenerator {
    /// Creates a generator starting from zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator whose next number is `start + 1`.
    pub fn starting_at(start: u64) -> Self {
        Self {
            counter: AtomicU64::new(start),
        }
    }
}

impl SequenceNumberGenerator for BasicSequenceNumberGenerator {
    fn next_sequence_number(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}
