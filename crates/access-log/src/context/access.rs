//! Backing context that owns appenders, the filter chain and the sequence
//! number generator.

use crate::appender::Appender;
use crate::error::{AppendError, FilterError};
use crate::event::{AccessEvent, SequenceNumberGenerator};
use crate::filter::{Filter, FilterReply, chain_decision};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Shared state behind an [`AccessLogContext`](super::AccessLogContext).
///
/// Attaching and detaching appenders or filters is meant for the
/// initialization and close phases. Emission only takes read locks, so
/// concurrent emits never contend with each other. Appenders and filters must
/// not mutate the context from inside `append` or `decide`.
#[derive(Default)]
pub struct AccessContext {
    name: RwLock<String>,
    started: AtomicBool,
    appenders: RwLock<Vec<Arc<dyn Appender>>>,
    filters: RwLock<Vec<Arc<dyn Filter>>>,
    sequence_number_generator: RwLock<Option<Arc<dyn SequenceNumberGenerator>>>,
}

impl AccessContext {
    /// Creates an unstarted, empty context.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: RwLock::new(name.into()),
            ..Self::default()
        }
    }

    /// Name of the context; the resolved configuration location once
    /// initialized.
    pub fn name(&self) -> String {
        read(&self.name).clone()
    }

    /// Renames the context.
    pub fn set_name(&self, name: impl Into<String>) {
        *write(&self.name) = name.into();
    }

    /// Marks the context started.
    pub fn start(&self) {
        self.started.store(true, Ordering::Release);
    }

    /// Marks the context stopped. Stopping twice is a no-op.
    pub fn stop(&self) {
        self.started.store(false, Ordering::Release);
    }

    /// Returns true between `start` and `stop`.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Clears the sequence number generator.
    pub fn reset(&self) {
        *write(&self.sequence_number_generator) = None;
    }

    // =========================================================================
    // Appenders
    // =========================================================================

    /// Attaches and starts an appender.
    pub fn add_appender(&self, appender: Arc<dyn Appender>) {
        appender.start();
        write(&self.appenders).push(appender);
    }

    /// Looks up an attached appender by name.
    pub fn appender(&self, name: &str) -> Option<Arc<dyn Appender>> {
        read(&self.appenders)
            .iter()
            .find(|a| a.name() == name)
            .cloned()
    }

    /// Names of attached appenders, in attachment order.
    pub fn appender_names(&self) -> Vec<String> {
        read(&self.appenders)
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    /// Number of attached appenders.
    pub fn appender_count(&self) -> usize {
        read(&self.appenders).len()
    }

    /// Detaches and stops the named appender. Returns false if none matched.
    pub fn detach_appender(&self, name: &str) -> bool {
        let removed = {
            let mut appenders = write(&self.appenders);
            appenders
                .iter()
                .position(|a| a.name() == name)
                .map(|index| appenders.remove(index))
        };
        match removed {
            Some(appender) => {
                appender.stop();
                true
            }
            None => false,
        }
    }

    /// Detaches and stops every appender; returns how many were attached.
    pub fn detach_and_stop_all_appenders(&self) -> usize {
        let detached = std::mem::take(&mut *write(&self.appenders));
        for appender in &detached {
            appender.stop();
        }
        detached.len()
    }

    /// Delivers an event to every attached appender.
    ///
    /// A failing appender does not prevent delivery to the others; each
    /// failure is reported through `on_failure`.
    pub fn call_appenders(
        &self,
        event: &AccessEvent,
        mut on_failure: impl FnMut(&dyn Appender, AppendError),
    ) {
        for appender in read(&self.appenders).iter() {
            if let Err(error) = appender.append(event) {
                on_failure(appender.as_ref(), error);
            }
        }
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Appends a filter to the chain.
    pub fn add_filter(&self, filter: Arc<dyn Filter>) {
        write(&self.filters).push(filter);
    }

    /// Number of filters in the chain.
    pub fn filter_count(&self) -> usize {
        read(&self.filters).len()
    }

    /// Stops and removes every filter.
    pub fn clear_all_filters(&self) {
        let filters = std::mem::take(&mut *write(&self.filters));
        for filter in &filters {
            filter.stop();
        }
    }

    /// Evaluates the filter chain for an event.
    pub fn filter_chain_decision(&self, event: &AccessEvent) -> Result<FilterReply, FilterError> {
        chain_decision(&read(&self.filters), event)
    }

    // =========================================================================
    // Sequence numbers
    // =========================================================================

    /// Installs the sequence number generator adapters query per event.
    pub fn set_sequence_number_generator(&self, generator: Arc<dyn SequenceNumberGenerator>) {
        *write(&self.sequence_number_generator) = Some(generator);
    }

    /// Returns true if a sequence number generator is installed.
    pub fn has_sequence_number_generator(&self) -> bool {
        read(&self.sequence_number_generator).is_some()
    }

    /// Next sequence number, or `None` when no generator is installed.
    pub fn next_sequence_number(&self) -> Option<u64> {
        read(&self.sequence_number_generator)
            .as_ref()
            .map(|g| g.next_sequence_number())
    }
}

impl std::fmt::Debug for AccessContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessContext")
            .field("name", &self.name())
            .field("started", &self.is_started())
            .field("appenders", &self.appender_names())
            .field("filters", &self.filter_count())
            .finish()
    }
}
