//! The access log pipeline orchestrator.
//!
//! [`AccessLogContext`] owns the configuration, the compiled URL filter and
//! body capture policy, and the backing [`AccessContext`]. Its lifecycle is
//!
//! ```text
//! Unconfigured ──new()──▶ Initializing ──▶ Running ──close()──▶ Closed
//! ```
//!
//! `Closed` is terminal. While `Running`, [`AccessLogContext::emit`] is the
//! only operation request threads call; it never returns an error and never
//! blocks on anything but the appenders themselves.

mod access;
mod resolve;

pub use access::AccessContext;
pub use resolve::{ConfigOrigin, resolve_config_location};

use crate::capture::BodyCapturePolicy;
use crate::config::AccessLogConfig;
use crate::configurator::{Configurator, JsonConfigurator};
use crate::error::{ConfigError, FilterError};
use crate::event::AccessEvent;
use crate::filter::{FilterReply, UrlFilter};
use crate::lifecycle;
use crate::resource::{DefaultResourceLoader, ResourceLoader};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of an [`AccessLogContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    /// Constructed, nothing resolved yet.
    Unconfigured = 0,
    /// Resolving and applying configuration.
    Initializing = 1,
    /// Accepting events.
    Running = 2,
    /// Stopped; terminal.
    Closed = 3,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Unconfigured,
            1 => Self::Initializing,
            2 => Self::Running,
            _ => Self::Closed,
        }
    }
}

/// Why an event was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Access logging is disabled in configuration.
    Disabled,
    /// The context is not running.
    NotRunning,
    /// The request URI failed the include/exclude patterns.
    UrlFiltered,
    /// The filter chain replied [`FilterReply::Deny`].
    FilterChainDenied,
}

/// Outcome of evaluating an event for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitDecision {
    /// Deliver to every appender.
    Log,
    /// Drop silently.
    Drop(DropReason),
}

/// Owns configuration and drives filtering and appender delivery.
pub struct AccessLogContext {
    config: AccessLogConfig,
    url_filter: UrlFilter,
    body_capture: BodyCapturePolicy,
    context: AccessContext,
    state: AtomicU8,
}

impl AccessLogContext {
    /// Initializes a context using the default resource loader and the JSON
    /// configurator.
    pub fn new(config: AccessLogConfig) -> Result<Self, ConfigError> {
        Self::with_loader(config, &DefaultResourceLoader::new(), &JsonConfigurator)
    }

    /// Initializes a context with a custom resource loader and configurator.
    ///
    /// Compiles the URL patterns, resolves the configuration location, applies
    /// it and starts the backing context.
    pub fn with_loader(
        config: AccessLogConfig,
        loader: &dyn ResourceLoader,
        configurator: &dyn Configurator,
    ) -> Result<Self, ConfigError> {
        let this = Self::unconfigured(config)?;
        this.initialize(loader, configurator)?;
        Ok(this)
    }

    /// Compiles the filter and capture policy without loading configuration.
    pub(crate) fn unconfigured(config: AccessLogConfig) -> Result<Self, ConfigError> {
        let url_filter = UrlFilter::new(&config.filter)?;
        let body_capture = BodyCapturePolicy::new(&config.body_capture);
        Ok(Self {
            config,
            url_filter,
            body_capture,
            context: AccessContext::default(),
            state: AtomicU8::new(LifecycleState::Unconfigured as u8),
        })
    }

    fn initialize(
        &self,
        loader: &dyn ResourceLoader,
        configurator: &dyn Configurator,
    ) -> Result<(), ConfigError> {
        self.set_state(LifecycleState::Initializing);

        if !self.config.enabled {
            self.context.set_name("disabled");
            self.context.start();
            self.set_state(LifecycleState::Running);
            lifecycle::log_context_disabled();
            return Ok(());
        }

        let (location, _origin) = resolve_config_location(&self.config, loader)?;
        let content = loader.load(&location)?;
        self.context.set_name(location.as_str());
        configurator.configure(&self.context, &location, &content)?;
        self.context.start();
        self.set_state(LifecycleState::Running);

        lifecycle::log_context_initialized(
            &location,
            self.context.appender_count(),
            self.context.filter_count(),
        );
        Ok(())
    }

    fn set_state(&self, state: LifecycleState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Configuration the context was built from.
    pub fn config(&self) -> &AccessLogConfig {
        &self.config
    }

    /// Compiled URL filter.
    pub fn url_filter(&self) -> &UrlFilter {
        &self.url_filter
    }

    /// Compiled body capture policy, for adapters capturing bodies.
    pub fn body_capture_policy(&self) -> &BodyCapturePolicy {
        &self.body_capture
    }

    /// Backing context holding appenders and filters.
    pub fn access_context(&self) -> &AccessContext {
        &self.context
    }

    /// Context name: the resolved configuration location.
    pub fn name(&self) -> String {
        self.context.name()
    }

    /// Next sequence number for an event being built, if a generator is
    /// configured.
    pub fn next_sequence_number(&self) -> Option<u64> {
        self.context.next_sequence_number()
    }

    /// Returns true if the URI passes the include/exclude patterns.
    pub fn should_log(&self, uri: &str) -> bool {
        self.url_filter.should_log(uri)
    }

    /// Decides whether an event would be delivered, without delivering it.
    pub fn decide(&self, event: &AccessEvent) -> Result<EmitDecision, FilterError> {
        if !self.config.enabled {
            return Ok(EmitDecision::Drop(DropReason::Disabled));
        }
        if self.state() != LifecycleState::Running {
            return Ok(EmitDecision::Drop(DropReason::NotRunning));
        }
        if !self.url_filter.should_log(event.request_uri()) {
            return Ok(EmitDecision::Drop(DropReason::UrlFiltered));
        }
        Ok(match self.context.filter_chain_decision(event)? {
            FilterReply::Deny => EmitDecision::Drop(DropReason::FilterChainDenied),
            FilterReply::Neutral | FilterReply::Accept => EmitDecision::Log,
        })
    }

    /// Filters an event and delivers it to every appender.
    ///
    /// Dropped events leave no trace. Filter and appender errors are logged
    /// with the request URI and swallowed. Panics from appenders or filters
    /// are not caught.
    pub fn emit(&self, event: &AccessEvent) {
        match self.decide(event) {
            Ok(EmitDecision::Log) => self.context.call_appenders(event, |appender, error| {
                lifecycle::log_emit_failure(event.request_uri(), Some(appender.name()), &error);
            }),
            Ok(EmitDecision::Drop(_)) => {}
            Err(error) => lifecycle::log_emit_failure(event.request_uri(), None, &error),
        }
    }

    /// Stops the context, detaching and stopping every appender and clearing
    /// every filter.
    ///
    /// Safe to call more than once; later calls find nothing to stop.
    /// Returns `true` only when this call shut down a running context, which
    /// is also the only case that logs the close.
    pub fn close(&self) -> bool {
        let previous = LifecycleState::from_u8(
            self.state
                .swap(LifecycleState::Closed as u8, Ordering::AcqRel),
        );
        self.context.stop();
        self.context.reset();
        let detached = self.context.detach_and_stop_all_appenders();
        self.context.clear_all_filters();
        let was_running = previous == LifecycleState::Running;
        if was_running {
            lifecycle::log_context_closed(&self.context.name(), detached);
        }
        was_running
    }
}

impl Drop for AccessLogContext {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl fmt::Debug for AccessLogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessLogContext")
            .field("state", &self.state())
            .field("context", &self.context)
            .finish()
    }
}

impl fmt::Display for AccessLogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessLogContext({})", self.context.name())
    }
}
