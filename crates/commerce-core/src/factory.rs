//! Client creation.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::client::CommerceClient;
use crate::config::{merge_config, validate_config, ProviderConfig};
use crate::error::{ApiError, ConfigError, Result};
use crate::registry::ProviderRegistry;

/// Create a client through a registry.
///
/// The config is validated before the factory lookup, so an invalid config
/// fails the same way whether or not its provider is registered. The factory
/// receives the merged config and its client is returned as-is.
#[instrument(skip_all, fields(provider))]
pub fn create_api_client(
    registry: &ProviderRegistry,
    config: ProviderConfig,
) -> Result<Arc<dyn CommerceClient>> {
    validate_config(&config)?;
    let provider = config.provider.ok_or(ConfigError::MissingProvider)?;
    tracing::Span::current().record("provider", provider.as_str());

    let factory = registry
        .get(provider)
        .ok_or_else(|| ApiError::ProviderNotRegistered {
            requested: provider.to_string(),
            available: describe_providers(registry),
        })?;

    let merged = merge_config(config)?;
    let client = factory(merged)?;

    info!(
        %provider,
        base_url = client.config().base_url_str(),
        b2b = client.is_b2b_enabled(),
        "created commerce client"
    );
    Ok(client)
}

/// [`create_api_client`] against [`ProviderRegistry::global`].
pub fn create_api_client_global(config: ProviderConfig) -> Result<Arc<dyn CommerceClient>> {
    create_api_client(ProviderRegistry::global(), config)
}

fn describe_providers(registry: &ProviderRegistry) -> String {
    let providers = registry.providers();
    if providers.is_empty() {
        return "none".to_string();
    }
    providers
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use crate::test_support::{stub_factory, StubClient};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_unregistered_provider_lists_available() {
        let registry = ProviderRegistry::new();
        registry.register_factory(ProviderKind::Bridge, stub_factory());

        let err = create_api_client(
            &registry,
            ProviderConfig::new(ProviderKind::Medusa, "https://x.test"),
        )
        .unwrap_err();

        match &err {
            ApiError::ProviderNotRegistered { requested, available } => {
                assert_eq!(requested, "medusa");
                assert_eq!(available, "bridge");
            }
            other => panic!("unexpected: {:?}", other),
        }
        let message = err.to_string();
        assert!(message.contains("medusa"));
        assert!(message.contains("bridge"));
    }

    #[test]
    fn test_empty_registry_reports_none() {
        let registry = ProviderRegistry::new();
        let err = create_api_client(
            &registry,
            ProviderConfig::new(ProviderKind::Sage, "https://x.test"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("none"));
    }

    #[test]
    fn test_invalid_config_never_reaches_factory() {
        let registry = ProviderRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        registry.register(ProviderKind::Bridge, move |config| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(StubClient::new(config)) as Arc<dyn CommerceClient>)
        });

        let mut config = ProviderConfig::new(ProviderKind::Bridge, "https://x.test");
        config.timeout = Some(0);

        let err = create_api_client(&registry, config).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidTimeout(0))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_factory_receives_merged_config() {
        let registry = ProviderRegistry::new();
        registry.register_factory(ProviderKind::Bridge, stub_factory());

        let client = create_api_client(
            &registry,
            ProviderConfig::new(ProviderKind::Bridge, "https://x.test"),
        )
        .unwrap();

        assert_eq!(client.provider(), ProviderKind::Bridge);
        assert_eq!(client.config().timeout_ms, 30_000);
        assert!(client.b2b().is_none());
        assert!(!client.is_b2b_enabled());
    }

    #[test]
    fn test_factory_errors_propagate() {
        let registry = ProviderRegistry::new();
        registry.register(ProviderKind::Custom, |_| {
            Err(ApiError::Unsupported("health check".to_string()))
        });

        let err = create_api_client(
            &registry,
            ProviderConfig::new(ProviderKind::Custom, "https://x.test"),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Unsupported(_)));
    }
}
