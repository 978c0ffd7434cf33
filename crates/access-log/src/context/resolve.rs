//! Configuration source resolution.

use crate::config::AccessLogConfig;
use crate::constants::FALLBACK_CONFIG;
use crate::error::ConfigError;
use crate::lifecycle::{log_config_location_missing, log_config_resolved};
use crate::resource::ResourceLoader;

/// Where the selected configuration location came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// `config_location` was set and exists.
    Explicit,
    /// The first existing entry of `default_locations`.
    Default,
    /// The built-in fallback.
    Fallback,
}

/// Selects the configuration location to load.
///
/// Priority: the explicit location, then the default locations in declared
/// order, then [`FALLBACK_CONFIG`]. Only a missing fallback is an error.
pub fn resolve_config_location(
    config: &AccessLogConfig,
    loader: &dyn ResourceLoader,
) -> Result<(String, ConfigOrigin), ConfigError> {
    let resolved = explicit_location(config, loader)
        .map(|location| (location, ConfigOrigin::Explicit))
        .or_else(|| {
            config
                .default_locations
                .iter()
                .find(|location| loader.exists(location))
                .map(|location| (location.clone(), ConfigOrigin::Default))
        })
        .or_else(|| {
            loader
                .exists(FALLBACK_CONFIG)
                .then(|| (FALLBACK_CONFIG.to_string(), ConfigOrigin::Fallback))
        });

    match resolved {
        Some((location, origin)) => {
            log_config_resolved(&location, origin);
            Ok((location, origin))
        }
        None => Err(ConfigError::ResourceNotFound {
            location: FALLBACK_CONFIG.to_string(),
        }),
    }
}

fn explicit_location(config: &AccessLogConfig, loader: &dyn ResourceLoader) -> Option<String> {
    let location = config.config_location.as_deref()?;
    if loader.exists(location) {
        Some(location.to_string())
    } else {
        log_config_location_missing(location);
        None
    }
}
