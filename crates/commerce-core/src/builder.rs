//! Fluent client construction.

use std::collections::HashMap;
use std::sync::Arc;

use crate::client::CommerceClient;
use crate::config::{B2BContext, ProviderConfig, ProviderKind};
use crate::error::{ConfigError, Result};
use crate::factory::create_api_client;
use crate::registry::ProviderRegistry;

/// Start building a client.
///
/// ```rust,ignore
/// let client = api_client()
///     .provider(ProviderKind::Bridge)
///     .base_url("https://erp.example.com")
///     .enable_b2b(Some("comp_1"), None)
///     .build()?;
/// ```
pub fn api_client() -> ApiClientConfigBuilder {
    ApiClientConfigBuilder::new()
}

/// Accumulates a [`ProviderConfig`] one field at a time.
#[derive(Debug, Clone, Default)]
pub struct ApiClientConfigBuilder {
    config: ProviderConfig,
}

impl ApiClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    pub fn region_id(mut self, region_id: impl Into<String>) -> Self {
        self.config.region_id = Some(region_id.into());
        self
    }

    pub fn publishable_key(mut self, key: impl Into<String>) -> Self {
        self.config.publishable_key = Some(key.into());
        self
    }

    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.config.auth_token = Some(token.into());
        self
    }

    /// Request timeout in milliseconds.
    pub fn timeout(mut self, timeout_ms: i64) -> Self {
        self.config.timeout = Some(timeout_ms);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Merge headers into those already set.
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.config.default_headers.extend(headers);
        self
    }

    /// Turn on B2B with an optional company/employee context.
    pub fn enable_b2b(mut self, company_id: Option<&str>, employee_id: Option<&str>) -> Self {
        self.config.enable_b2b = Some(true);
        self.config.b2b = Some(B2BContext::new(
            company_id.map(str::to_string),
            employee_id.map(str::to_string),
        ));
        self
    }

    pub fn provider_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.config.provider_options.insert(key.into(), value);
        self
    }

    /// The accumulated config, without creating a client.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn into_config(self) -> ProviderConfig {
        self.config
    }

    /// Create the client through the global registry.
    pub fn build(self) -> Result<Arc<dyn CommerceClient>> {
        self.build_with(ProviderRegistry::global())
    }

    /// Create the client through an explicit registry.
    pub fn build_with(self, registry: &ProviderRegistry) -> Result<Arc<dyn CommerceClient>> {
        if self.config.provider.is_none() {
            return Err(ConfigError::MissingProvider.into());
        }
        if self.config.base_url.is_none() {
            return Err(ConfigError::MissingBaseUrl.into());
        }
        create_api_client(registry, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::test_support::stub_factory;

    #[test]
    fn test_builder_accumulates_config() {
        let builder = api_client()
            .provider(ProviderKind::Bridge)
            .base_url("https://x.test")
            .region_id("reg_eu")
            .timeout(5000)
            .header("X-Store", "main");

        let mut extra = HashMap::new();
        extra.insert("X-Locale".to_string(), "en-GB".to_string());
        let config = builder.headers(extra).into_config();

        assert_eq!(config.provider, Some(ProviderKind::Bridge));
        assert_eq!(config.region_id.as_deref(), Some("reg_eu"));
        assert_eq!(config.timeout, Some(5000));
        assert_eq!(config.default_headers.len(), 2);
    }

    #[test]
    fn test_build_requires_provider_and_base_url() {
        let registry = ProviderRegistry::new();

        let err = api_client().base_url("https://x.test").build_with(&registry).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::MissingProvider)));

        let err = api_client().provider(ProviderKind::Bridge).build_with(&registry).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::MissingBaseUrl)));
    }

    #[test]
    fn test_build_enable_b2b_sets_context() {
        let registry = ProviderRegistry::new();
        registry.register_factory(ProviderKind::Bridge, stub_factory());

        let client = api_client()
            .provider(ProviderKind::Bridge)
            .base_url("https://x.test")
            .enable_b2b(Some("comp_1"), None)
            .build_with(&registry)
            .unwrap();

        assert_eq!(client.b2b_context(), Some(B2BContext::company("comp_1")));
        assert!(client.is_b2b_enabled());
    }
}
