//! Named client instances with a default slot.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::client::CommerceClient;
use crate::config::{ClientConfig, ProviderConfig, ProviderKind};
use crate::error::{ApiError, Result};
use crate::factory::create_api_client;
use crate::registry::ProviderRegistry;

static GLOBAL_MANAGER: LazyLock<ApiClientManager> = LazyLock::new(ApiClientManager::new);

struct ClientEntry {
    client: Arc<dyn CommerceClient>,
    config: ClientConfig,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct ManagerState {
    clients: HashMap<String, ClientEntry>,
    default: Option<String>,
}

/// Read-only snapshot of a managed client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientMetadata {
    pub provider: ProviderKind,
    pub base_url: String,
    pub created_at: DateTime<Utc>,
    pub enable_b2b: bool,
}

/// Holds clients by name and tracks which one is the default.
///
/// The first client stored becomes the default. Removing the default
/// promotes one of the remaining clients.
pub struct ApiClientManager {
    registry: Option<Arc<ProviderRegistry>>,
    state: RwLock<ManagerState>,
}

impl ApiClientManager {
    /// A manager that creates clients through the global registry.
    pub fn new() -> Self {
        Self {
            registry: None,
            state: RwLock::new(ManagerState::default()),
        }
    }

    /// A manager bound to a specific registry.
    pub fn with_registry(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry: Some(registry),
            state: RwLock::new(ManagerState::default()),
        }
    }

    /// The process-wide manager.
    pub fn global() -> &'static ApiClientManager {
        &GLOBAL_MANAGER
    }

    /// Create a client stored under `provider:base_url`.
    pub fn initialize(&self, config: ProviderConfig) -> Result<Arc<dyn CommerceClient>> {
        let client = self.create(config)?;
        let key = format!(
            "{}:{}",
            client.config().provider,
            client.config().base_url_str()
        );
        self.insert(key, client.clone());
        Ok(client)
    }

    /// The default client.
    pub fn client(&self) -> Result<Arc<dyn CommerceClient>> {
        let state = self.read();
        state
            .default
            .as_ref()
            .and_then(|name| state.clients.get(name))
            .map(|entry| entry.client.clone())
            .ok_or(ApiError::NotInitialized)
    }

    /// Create a client stored under an explicit name.
    pub fn create_named(
        &self,
        name: impl Into<String>,
        config: ProviderConfig,
    ) -> Result<Arc<dyn CommerceClient>> {
        let client = self.create(config)?;
        self.insert(name.into(), client.clone());
        Ok(client)
    }

    pub fn named(&self, name: &str) -> Result<Arc<dyn CommerceClient>> {
        self.read()
            .clients
            .get(name)
            .map(|entry| entry.client.clone())
            .ok_or_else(|| ApiError::ClientNotFound(name.to_string()))
    }

    pub fn has_named(&self, name: &str) -> bool {
        self.read().clients.contains_key(name)
    }

    pub fn set_default(&self, name: &str) -> Result<()> {
        let mut state = self.write();
        if !state.clients.contains_key(name) {
            return Err(ApiError::ClientNotFound(name.to_string()));
        }
        state.default = Some(name.to_string());
        info!(name, "default commerce client changed");
        Ok(())
    }

    /// Remove a client. Returns whether it existed.
    pub fn remove(&self, name: &str) -> bool {
        let mut state = self.write();
        if state.clients.remove(name).is_none() {
            return false;
        }

        if state.default.as_deref() == Some(name) {
            state.default = state.clients.keys().next().cloned();
            info!(
                removed = name,
                promoted = state.default.as_deref().unwrap_or("none"),
                "default commerce client removed"
            );
        }
        true
    }

    /// Drop every client and the default.
    pub fn clear(&self) {
        let mut state = self.write();
        state.clients.clear();
        state.default = None;
    }

    /// Snapshot of the named client, or the default when `name` is `None`.
    pub fn metadata(&self, name: Option<&str>) -> Option<ClientMetadata> {
        let state = self.read();
        let key = match name {
            Some(name) => name,
            None => state.default.as_deref()?,
        };
        state.clients.get(key).map(|entry| ClientMetadata {
            provider: entry.config.provider,
            base_url: entry.config.base_url_str().to_string(),
            created_at: entry.created_at,
            enable_b2b: entry.config.enable_b2b,
        })
    }

    /// Stored names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.read().clients.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn default_name(&self) -> Option<String> {
        self.read().default.clone()
    }

    fn create(&self, config: ProviderConfig) -> Result<Arc<dyn CommerceClient>> {
        match &self.registry {
            Some(registry) => create_api_client(registry, config),
            None => create_api_client(ProviderRegistry::global(), config),
        }
    }

    fn insert(&self, name: String, client: Arc<dyn CommerceClient>) {
        let entry = ClientEntry {
            config: client.config().clone(),
            client,
            created_at: Utc::now(),
        };

        let mut state = self.write();
        state.clients.insert(name.clone(), entry);
        if state.default.is_none() {
            info!(name = %name, "default commerce client set");
            state.default = Some(name);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ManagerState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ManagerState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ApiClientManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ApiClientManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClientManager")
            .field("names", &self.names())
            .field("default", &self.default_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::stub_factory;

    fn test_registry() -> Arc<ProviderRegistry> {
        let registry = Arc::new(ProviderRegistry::new());
        registry.register_factory(ProviderKind::Bridge, stub_factory());
        registry.register_factory(ProviderKind::Medusa, stub_factory());
        registry
    }

    fn bridge(url: &str) -> ProviderConfig {
        ProviderConfig::new(ProviderKind::Bridge, url)
    }

    // === Default Slot Tests ===

    #[test]
    fn test_fresh_manager_fails_fast() {
        let manager = ApiClientManager::with_registry(test_registry());
        assert!(matches!(manager.client(), Err(ApiError::NotInitialized)));
        assert!(manager.metadata(None).is_none());
    }

    #[test]
    fn test_dropping_manager_releases_registry() {
        let registry = test_registry();
        let manager = ApiClientManager::with_registry(registry.clone());
        manager.create_named("a", bridge("https://a.test")).unwrap();
        assert_eq!(Arc::strong_count(&registry), 2);

        drop(manager);
        assert_eq!(Arc::strong_count(&registry), 1);
    }

    #[test]
    fn test_initialize_uses_derived_key_and_becomes_default() {
        let manager = ApiClientManager::with_registry(test_registry());
        manager.initialize(bridge("https://x.test")).unwrap();

        assert_eq!(manager.names(), vec!["bridge:https://x.test".to_string()]);
        assert_eq!(manager.default_name().as_deref(), Some("bridge:https://x.test"));
        assert!(manager.client().is_ok());
    }

    #[test]
    fn test_first_named_client_stays_default() {
        let manager = ApiClientManager::with_registry(test_registry());
        let a = manager.create_named("a", bridge("https://a.test")).unwrap();
        manager.create_named("b", bridge("https://b.test")).unwrap();

        assert!(Arc::ptr_eq(&manager.client().unwrap(), &a));
    }

    #[test]
    fn test_remove_default_promotes_survivor() {
        let manager = ApiClientManager::with_registry(test_registry());
        manager.create_named("a", bridge("https://a.test")).unwrap();
        let b = manager.create_named("b", bridge("https://b.test")).unwrap();

        assert!(manager.remove("a"));

        assert!(Arc::ptr_eq(&manager.client().unwrap(), &b));
        assert_eq!(manager.default_name().as_deref(), Some("b"));
    }

    #[test]
    fn test_remove_last_clears_default() {
        let manager = ApiClientManager::with_registry(test_registry());
        manager.create_named("only", bridge("https://a.test")).unwrap();

        assert!(manager.remove("only"));
        assert!(!manager.remove("only"));
        assert!(manager.default_name().is_none());
        assert!(matches!(manager.client(), Err(ApiError::NotInitialized)));
    }

    #[test]
    fn test_set_default() {
        let manager = ApiClientManager::with_registry(test_registry());
        manager.create_named("a", bridge("https://a.test")).unwrap();
        let b = manager.create_named("b", bridge("https://b.test")).unwrap();

        manager.set_default("b").unwrap();
        assert!(Arc::ptr_eq(&manager.client().unwrap(), &b));
        assert!(Arc::ptr_eq(&manager.named("b").unwrap(), &b));

        assert!(matches!(
            manager.set_default("missing"),
            Err(ApiError::ClientNotFound(name)) if name == "missing"
        ));
        assert_eq!(manager.default_name().as_deref(), Some("b"));
    }

    // === Named Client Tests ===

    #[test]
    fn test_named_lookup() {
        let manager = ApiClientManager::with_registry(test_registry());
        manager
            .create_named("erp", ProviderConfig::new(ProviderKind::Medusa, "https://m.test"))
            .unwrap();

        assert!(manager.has_named("erp"));
        assert!(!manager.has_named("storefront"));
        assert_eq!(manager.named("erp").unwrap().provider(), ProviderKind::Medusa);
        assert!(matches!(manager.named("storefront"), Err(ApiError::ClientNotFound(_))));
    }

    #[test]
    fn test_create_failure_stores_nothing() {
        let manager = ApiClientManager::with_registry(test_registry());
        let result = manager.create_named("bad", ProviderConfig::new(ProviderKind::Sage, "https://s.test"));

        assert!(matches!(result, Err(ApiError::ProviderNotRegistered { .. })));
        assert!(!manager.has_named("bad"));
    }

    #[test]
    fn test_clear() {
        let manager = ApiClientManager::with_registry(test_registry());
        manager.create_named("a", bridge("https://a.test")).unwrap();
        manager.clear();

        assert!(manager.names().is_empty());
        assert!(manager.client().is_err());
        assert!(manager.metadata(None).is_none());
    }

    // === Metadata Tests ===

    #[test]
    fn test_metadata_snapshot() {
        let manager = ApiClientManager::with_registry(test_registry());
        let mut config = bridge("https://a.test");
        config.enable_b2b = Some(true);
        manager.create_named("a", config).unwrap();

        let meta = manager.metadata(Some("a")).unwrap();
        assert_eq!(meta.provider, ProviderKind::Bridge);
        assert_eq!(meta.base_url, "https://a.test");
        assert!(meta.enable_b2b);
        assert!(meta.created_at <= Utc::now());

        assert_eq!(manager.metadata(None), Some(meta));
        assert!(manager.metadata(Some("missing")).is_none());
    }
}
