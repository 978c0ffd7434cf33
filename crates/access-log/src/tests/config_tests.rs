//! Configuration tests - defaults, builders, serde and location resolution

use crate::config::{AccessLogConfig, BodyCaptureConfig, LocalPortStrategy, UrlFilterConfig};
use crate::constants::{DEFAULT_CONFIGS, FALLBACK_CONFIG};
use crate::context::{ConfigOrigin, resolve_config_location};
use crate::error::ConfigError;
use crate::resource::{DefaultResourceLoader, ResourceLoader, ResourceLocation};
use serde_json::json;
use std::path::Path;

const EMPTY_DOC: &str = "{}";

// =============================================================================
// Default & Builder Tests
// =============================================================================

#[test]
fn test_access_log_config_defaults() {
    let config = AccessLogConfig::default();
    assert!(config.enabled);
    assert_eq!(config.config_location, None);
    assert_eq!(config.default_locations, DEFAULT_CONFIGS);
    assert_eq!(config.local_port_strategy, LocalPortStrategy::Server);
    assert_eq!(config.filter, UrlFilterConfig::default());
    assert!(!config.body_capture.enabled);
    assert_eq!(config.body_capture.max_payload_size, 65536);
    assert_eq!(config.body_capture.allowed_content_types, None);
}

#[test]
fn test_access_log_config_builder() {
    let config = AccessLogConfig::new()
        .with_enabled(false)
        .with_config_location("classpath:custom.json")
        .with_default_locations(["classpath:a.json"])
        .with_local_port_strategy(LocalPortStrategy::Local)
        .with_body_capture(BodyCaptureConfig::new().with_enabled(true).with_max_payload_size(10))
        .include_url("^/api/")
        .exclude_url("^/api/internal/");

    assert!(!config.enabled);
    assert_eq!(config.config_location.as_deref(), Some("classpath:custom.json"));
    assert_eq!(config.default_locations, vec!["classpath:a.json".to_string()]);
    assert_eq!(config.local_port_strategy, LocalPortStrategy::Local);
    assert!(config.body_capture.enabled);
    assert_eq!(config.body_capture.max_payload_size, 10);
    assert_eq!(
        config.filter.include_url_patterns,
        Some(vec!["^/api/".to_string()])
    );
    assert_eq!(
        config.filter.exclude_url_patterns,
        Some(vec!["^/api/internal/".to_string()])
    );
}

#[test]
fn test_local_port_strategy_resolve() {
    assert_eq!(LocalPortStrategy::Local.resolve(8080, 443), 8080);
    assert_eq!(LocalPortStrategy::Server.resolve(8080, 443), 443);
}

// =============================================================================
// Serde Tests
// =============================================================================

#[test]
fn test_deserialize_partial_config_uses_defaults() {
    let config: AccessLogConfig = serde_json::from_value(json!({
        "local_port_strategy": "local",
        "body_capture": { "enabled": true },
        "filter": { "exclude_url_patterns": ["^/health"] }
    }))
    .unwrap();

    assert!(config.enabled);
    assert_eq!(config.local_port_strategy, LocalPortStrategy::Local);
    assert!(config.body_capture.enabled);
    assert_eq!(config.body_capture.max_payload_size, 65536);
    assert_eq!(config.filter.include_url_patterns, None);
    assert_eq!(
        config.filter.exclude_url_patterns,
        Some(vec!["^/health".to_string()])
    );
    assert_eq!(config.default_locations.len(), DEFAULT_CONFIGS.len());
}

#[test]
fn test_config_serializes_round_trip() {
    let config = AccessLogConfig::new()
        .include_url("^/api/")
        .with_body_capture(BodyCaptureConfig::new().with_allowed_content_types(["text/*"]));
    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(value["local_port_strategy"], json!("server"));
    let restored: AccessLogConfig = serde_json::from_value(value).unwrap();
    assert_eq!(restored, config);
}

// =============================================================================
// Resource Location Tests
// =============================================================================

#[test]
fn test_resource_location_parse() {
    assert_eq!(
        ResourceLocation::parse("classpath:/access-log.json"),
        ResourceLocation::Classpath("access-log.json")
    );
    assert_eq!(
        ResourceLocation::parse("file:conf/access-log.json"),
        ResourceLocation::File(Path::new("conf/access-log.json"))
    );
    assert_eq!(
        ResourceLocation::parse("/etc/access-log.json"),
        ResourceLocation::File(Path::new("/etc/access-log.json"))
    );
}

#[test]
fn test_loader_registers_fallback() {
    let loader = DefaultResourceLoader::new();
    assert!(loader.exists(FALLBACK_CONFIG));
    assert!(loader.load(FALLBACK_CONFIG).unwrap().contains("tracing"));
}

#[test]
fn test_loader_missing_resource() {
    let loader = DefaultResourceLoader::new();
    assert!(!loader.exists("classpath:nope.json"));
    assert!(matches!(
        loader.load("classpath:nope.json"),
        Err(ConfigError::ResourceNotFound { .. })
    ));
    assert!(matches!(
        loader.load("file:/definitely/not/here/access-log.json"),
        Err(ConfigError::ResourceNotFound { .. })
    ));
}

// =============================================================================
// Resolution Tests
// =============================================================================

fn classpath_defaults() -> AccessLogConfig {
    AccessLogConfig::new()
        .with_default_locations(["classpath:access-log-test.json", "classpath:access-log.json"])
}

#[test]
fn test_explicit_location_wins() {
    let loader = DefaultResourceLoader::new()
        .with_resource("custom.json", EMPTY_DOC)
        .with_resource("access-log-test.json", EMPTY_DOC);
    let config = classpath_defaults().with_config_location("classpath:custom.json");

    let (location, origin) = resolve_config_location(&config, &loader).unwrap();
    assert_eq!(location, "classpath:custom.json");
    assert_eq!(origin, ConfigOrigin::Explicit);
}

#[test]
fn test_missing_explicit_location_falls_through_to_defaults() {
    let loader = DefaultResourceLoader::new().with_resource("access-log.json", EMPTY_DOC);
    let config = classpath_defaults().with_config_location("classpath:missing.json");

    let (location, origin) = resolve_config_location(&config, &loader).unwrap();
    assert_eq!(location, "classpath:access-log.json");
    assert_eq!(origin, ConfigOrigin::Default);
}

#[test]
fn test_defaults_tried_in_declared_order() {
    let loader = DefaultResourceLoader::new()
        .with_resource("access-log-test.json", EMPTY_DOC)
        .with_resource("access-log.json", EMPTY_DOC);

    let (location, _) = resolve_config_location(&classpath_defaults(), &loader).unwrap();
    assert_eq!(location, "classpath:access-log-test.json");
}

#[test]
fn test_fallback_when_nothing_else_exists() {
    let (location, origin) =
        resolve_config_location(&classpath_defaults(), &DefaultResourceLoader::new()).unwrap();
    assert_eq!(location, FALLBACK_CONFIG);
    assert_eq!(origin, ConfigOrigin::Fallback);
}

#[test]
fn test_missing_fallback_is_error() {
    let loader = DefaultResourceLoader::new().without_resource("access_log/access-log-default.json");
    match resolve_config_location(&classpath_defaults(), &loader) {
        Err(ConfigError::ResourceNotFound { location }) => assert_eq!(location, FALLBACK_CONFIG),
        other => panic!("expected ResourceNotFound, got {other:?}"),
    }
}

#[test]
fn test_config_error_converts_to_umbrella() {
    fn load(loader: &DefaultResourceLoader) -> crate::Result<String> {
        Ok(loader.load("classpath:nope.json")?)
    }
    let error = load(&DefaultResourceLoader::new()).unwrap_err();
    assert!(matches!(error, crate::AccessLogError::Config(ConfigError::ResourceNotFound { .. })));
    assert_eq!(error.to_string(), "configuration resource not found: classpath:nope.json");
}
