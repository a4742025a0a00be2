//! Provider name to factory mapping.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::client::CommerceClient;
use crate::config::{ClientConfig, ProviderKind};
use crate::error::Result;

/// Builds a client from a validated config.
pub type ProviderFactory =
    Arc<dyn Fn(ClientConfig) -> Result<Arc<dyn CommerceClient>> + Send + Sync>;

static GLOBAL_REGISTRY: LazyLock<ProviderRegistry> = LazyLock::new(ProviderRegistry::new);

/// Registered provider factories.
///
/// Registering a provider twice replaces the earlier factory.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: RwLock<HashMap<ProviderKind, ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry adapters install themselves into.
    pub fn global() -> &'static ProviderRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn register<F>(&self, provider: ProviderKind, factory: F)
    where
        F: Fn(ClientConfig) -> Result<Arc<dyn CommerceClient>> + Send + Sync + 'static,
    {
        self.register_factory(provider, Arc::new(factory));
    }

    pub fn register_factory(&self, provider: ProviderKind, factory: ProviderFactory) {
        let replaced = self.write().insert(provider, factory).is_some();
        debug!(%provider, replaced, "registered provider");
    }

    /// Remove a provider. Returns whether it was registered.
    pub fn unregister(&self, provider: ProviderKind) -> bool {
        self.write().remove(&provider).is_some()
    }

    pub fn get(&self, provider: ProviderKind) -> Option<ProviderFactory> {
        self.read().get(&provider).cloned()
    }

    pub fn contains(&self, provider: ProviderKind) -> bool {
        self.read().contains_key(&provider)
    }

    /// Registered providers, sorted.
    pub fn providers(&self) -> Vec<ProviderKind> {
        let mut providers: Vec<_> = self.read().keys().copied().collect();
        providers.sort();
        providers
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ProviderKind, ProviderFactory>> {
        self.factories.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ProviderKind, ProviderFactory>> {
        self.factories.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::stub_factory;

    #[test]
    fn test_register_and_get_round_trip() {
        let registry = ProviderRegistry::new();
        let factory = stub_factory();

        registry.register_factory(ProviderKind::Custom, factory.clone());

        let stored = registry.get(ProviderKind::Custom).unwrap();
        assert!(Arc::ptr_eq(&stored, &factory));
        assert!(registry.contains(ProviderKind::Custom));
    }

    #[test]
    fn test_unregister() {
        let registry = ProviderRegistry::new();
        registry.register_factory(ProviderKind::Custom, stub_factory());

        assert!(registry.unregister(ProviderKind::Custom));
        assert!(registry.get(ProviderKind::Custom).is_none());
        assert!(!registry.contains(ProviderKind::Custom));

        // Absent providers are not an error.
        assert!(!registry.unregister(ProviderKind::Custom));
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = ProviderRegistry::new();
        let first = stub_factory();
        let second = stub_factory();

        registry.register_factory(ProviderKind::Bridge, first.clone());
        registry.register_factory(ProviderKind::Bridge, second.clone());

        let stored = registry.get(ProviderKind::Bridge).unwrap();
        assert!(Arc::ptr_eq(&stored, &second));
        assert!(!Arc::ptr_eq(&stored, &first));
    }

    #[test]
    fn test_providers_sorted() {
        let registry = ProviderRegistry::new();
        registry.register_factory(ProviderKind::Shopify, stub_factory());
        registry.register_factory(ProviderKind::Medusa, stub_factory());
        registry.register_factory(ProviderKind::Bridge, stub_factory());

        assert_eq!(
            registry.providers(),
            vec![ProviderKind::Medusa, ProviderKind::Bridge, ProviderKind::Shopify]
        );

        registry.clear();
        assert!(registry.providers().is_empty());
    }
}
