//! Provider configuration: validation, defaults and loading.
//!
//! [`ProviderConfig`] is what callers write (every field optional).
//! [`merge_config`] turns it into a [`ClientConfig`], the validated and
//! defaulted value provider factories receive.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Headers every client sends unless overridden.
pub const DEFAULT_HEADERS: [(&str, &str); 2] = [
    ("Accept", "application/json"),
    ("Content-Type", "application/json"),
];

/// Supported commerce backends.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Medusa,
    Bridge,
    Sage,
    Shopify,
    Custom,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::Medusa,
        ProviderKind::Bridge,
        ProviderKind::Sage,
        ProviderKind::Shopify,
        ProviderKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Medusa => "medusa",
            ProviderKind::Bridge => "bridge",
            ProviderKind::Sage => "sage",
            ProviderKind::Shopify => "shopify",
            ProviderKind::Custom => "custom",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownProvider(s.to_string()))
    }
}

/// Company/employee pair scoping B2B requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct B2BContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
}

impl B2BContext {
    pub fn new(company_id: Option<String>, employee_id: Option<String>) -> Self {
        Self {
            company_id,
            employee_id,
        }
    }

    pub fn company(company_id: impl Into<String>) -> Self {
        Self::new(Some(company_id.into()), None)
    }

    pub fn is_empty(&self) -> bool {
        self.company_id.is_none() && self.employee_id.is_none()
    }
}

/// Caller-facing provider configuration.
///
/// Loadable from TOML or JSON:
///
/// ```toml
/// provider = "bridge"
/// base_url = "https://erp.example.com"
/// timeout = 10000
/// enable_b2b = true
///
/// [b2b]
/// company_id = "comp_1"
///
/// [default_headers]
/// X-Store = "main"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub provider: Option<ProviderKind>,
    pub base_url: Option<String>,
    pub region_id: Option<String>,
    pub publishable_key: Option<String>,
    pub auth_token: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout: Option<i64>,
    pub default_headers: HashMap<String, String>,
    pub enable_b2b: Option<bool>,
    pub b2b: Option<B2BContext>,
    /// Opaque per-adapter settings.
    pub provider_options: HashMap<String, serde_json::Value>,
}

impl ProviderConfig {
    /// Minimal config for a provider and base URL.
    pub fn new(provider: ProviderKind, base_url: impl Into<String>) -> Self {
        Self {
            provider: Some(provider),
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    /// Load from a file. `.json` files are read as JSON, anything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::File {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let origin = path.display().to_string();

        if is_json {
            Self::from_json_str(&content).map_err(|e| e.with_origin(origin))
        } else {
            Self::from_toml_str(&content).map_err(|e| e.with_origin(origin))
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            origin: "toml".to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            origin: "json".to_string(),
            message: e.to_string(),
        })
    }

    /// Overlay the process environment (`COMMERCE_*` variables).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides(std::env::vars())
    }

    /// Overlay `COMMERCE_*` variables from an arbitrary source.
    ///
    /// Unknown keys are ignored; malformed values are parse errors.
    pub fn with_env_overrides<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let key = key.as_ref();
            let value: String = value.into();
            match key {
                "COMMERCE_PROVIDER" => self.provider = Some(value.parse()?),
                "COMMERCE_BASE_URL" => self.base_url = Some(value),
                "COMMERCE_REGION_ID" => self.region_id = Some(value),
                "COMMERCE_PUBLISHABLE_KEY" => self.publishable_key = Some(value),
                "COMMERCE_AUTH_TOKEN" => self.auth_token = Some(value),
                "COMMERCE_TIMEOUT_MS" => {
                    let timeout = value.trim().parse().map_err(|_| env_error(key, &value))?;
                    self.timeout = Some(timeout);
                }
                "COMMERCE_ENABLE_B2B" => {
                    let enabled = parse_bool(&value).ok_or_else(|| env_error(key, &value))?;
                    self.enable_b2b = Some(enabled);
                }
                "COMMERCE_COMPANY_ID" => {
                    self.b2b.get_or_insert_with(B2BContext::default).company_id = Some(value);
                }
                "COMMERCE_EMPLOYEE_ID" => {
                    self.b2b.get_or_insert_with(B2BContext::default).employee_id = Some(value);
                }
                _ => {}
            }
        }
        Ok(self)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_error(key: &str, value: &str) -> ConfigError {
    ConfigError::Parse {
        origin: key.to_string(),
        message: format!("invalid value {:?}", value),
    }
}

impl ConfigError {
    fn with_origin(self, origin: String) -> Self {
        match self {
            ConfigError::Parse { message, .. } => ConfigError::Parse { origin, message },
            other => other,
        }
    }
}

/// Validated configuration handed to provider factories.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub provider: ProviderKind,
    pub base_url: Url,
    pub region_id: Option<String>,
    pub publishable_key: Option<String>,
    pub auth_token: Option<String>,
    pub timeout_ms: u64,
    pub default_headers: HashMap<String, String>,
    pub enable_b2b: bool,
    /// Present only when B2B is enabled.
    pub b2b: Option<B2BContext>,
    pub provider_options: HashMap<String, serde_json::Value>,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base URL without the trailing slash `Url` adds to bare origins.
    pub fn base_url_str(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Typed lookup into `provider_options`.
    pub fn provider_option<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.provider_options
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// Check the structural requirements of a config.
pub fn validate_config(config: &ProviderConfig) -> Result<(), ConfigError> {
    if config.provider.is_none() {
        return Err(ConfigError::MissingProvider);
    }

    let base_url = config
        .base_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or(ConfigError::MissingBaseUrl)?;
    parse_base_url(base_url)?;

    if let Some(timeout) = config.timeout {
        if timeout <= 0 {
            return Err(ConfigError::InvalidTimeout(timeout));
        }
    }

    Ok(())
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() || !url.has_host() {
        return Err(invalid("not a hierarchical URL with a host".to_string()));
    }
    Ok(url)
}

/// Validate and overlay a config onto the defaults.
pub fn merge_config(config: ProviderConfig) -> Result<ClientConfig, ConfigError> {
    validate_config(&config)?;

    let provider = config.provider.ok_or(ConfigError::MissingProvider)?;
    let base_url = parse_base_url(config.base_url.as_deref().unwrap_or_default())?;

    let mut default_headers: HashMap<String, String> = DEFAULT_HEADERS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    for (key, value) in config.default_headers {
        // Replace case-insensitively so "accept" overrides "Accept".
        default_headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
        default_headers.insert(key, value);
    }

    let enable_b2b = config.enable_b2b.unwrap_or(false);
    let b2b = enable_b2b.then(|| config.b2b.unwrap_or_default());

    Ok(ClientConfig {
        provider,
        base_url,
        region_id: config.region_id,
        publishable_key: config.publishable_key,
        auth_token: config.auth_token,
        timeout_ms: config
            .timeout
            .and_then(|t| u64::try_from(t).ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS),
        default_headers,
        enable_b2b,
        b2b,
        provider_options: config.provider_options,
    })
}
