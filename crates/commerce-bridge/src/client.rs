//! The Bridge implementation of [`CommerceClient`].

use std::any::Any;
use std::sync::Arc;

use commerce_core::{
    ApiError, B2BServices, CartService, CategoryService, ClientConfig, ClientSession,
    CommerceClient, CustomerService, OrderService, ProductService, Result,
};
use commerce_http::{FetchClient, Transport};
use commerce_types::money::Currency;
use tracing::debug;

use crate::api::{BridgeApi, DEFAULT_API_PREFIX};
use crate::inventory::BridgeInventoryService;
use crate::mappers::Mapper;
use crate::services::{
    b2b_services, BridgeCartService, BridgeCategoryService, BridgeCustomerService,
    BridgeOrderService, BridgeProductService,
};
use crate::sync::BridgeSyncService;

/// Provider option overriding the API path prefix.
pub const OPTION_API_PREFIX: &str = "api_prefix";

/// Provider option naming the fallback currency for amounts without one.
pub const OPTION_CURRENCY: &str = "currency";

/// Client for a Bridge (Laravel ERP sync) backend.
///
/// Besides the normalized services it offers [`inventory`](Self::inventory)
/// and [`sync`](Self::sync). Reach them from a `dyn CommerceClient` with
/// [`BridgeClient::from_client`].
pub struct BridgeClient {
    config: ClientConfig,
    session: Arc<ClientSession>,
    http: FetchClient,
    products: BridgeProductService,
    categories: BridgeCategoryService,
    cart: BridgeCartService,
    orders: BridgeOrderService,
    customers: BridgeCustomerService,
    b2b: Option<B2BServices>,
    inventory: BridgeInventoryService,
    sync: BridgeSyncService,
}

impl BridgeClient {
    /// Build a client over the default reqwest transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = base_http(&config);
        Self::assemble(config, http)
    }

    /// Build a client that sends through `transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let http = base_http(&config).with_transport(transport);
        Self::assemble(config, http)
    }

    fn assemble(config: ClientConfig, http: FetchClient) -> Result<Self> {
        let session = Arc::new(ClientSession::from_config(&config));
        let http = http.with_header_source(session.clone());

        let currency = match config.provider_option::<String>(OPTION_CURRENCY) {
            Some(code) => Currency::from_code(&code)
                .ok_or_else(|| ApiError::Mapping(format!("unsupported currency {:?}", code)))?,
            None => Currency::default(),
        };
        let prefix = config
            .provider_option::<String>(OPTION_API_PREFIX)
            .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());

        let api = BridgeApi::new(http.clone(), prefix);
        let mapper = Mapper::new(currency);
        let inventory = BridgeInventoryService::new(api.clone());
        let b2b = config.enable_b2b.then(|| b2b_services(&api, mapper));

        debug!(
            base_url = %config.base_url_str(),
            prefix = %api.prefix(),
            b2b = config.enable_b2b,
            "bridge client assembled"
        );

        Ok(Self {
            products: BridgeProductService::new(api.clone(), mapper, inventory.clone()),
            categories: BridgeCategoryService::new(api.clone(), mapper),
            cart: BridgeCartService::new(api.clone(), mapper, config.region_id.clone()),
            orders: BridgeOrderService::new(api.clone(), mapper),
            customers: BridgeCustomerService::new(api.clone(), mapper),
            sync: BridgeSyncService::new(api),
            inventory,
            b2b,
            http,
            session,
            config,
        })
    }

    /// Downcast a generic client to a Bridge one.
    pub fn from_client(client: &dyn CommerceClient) -> Option<&BridgeClient> {
        client.as_any().downcast_ref::<BridgeClient>()
    }

    pub fn inventory(&self) -> &BridgeInventoryService {
        &self.inventory
    }

    pub fn sync(&self) -> &BridgeSyncService {
        &self.sync
    }
}

fn base_http(config: &ClientConfig) -> FetchClient {
    FetchClient::new(config.base_url_str())
        .with_default_headers(config.default_headers.clone())
        .with_timeout(config.timeout())
}

impl CommerceClient for BridgeClient {
    fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn products(&self) -> &dyn ProductService {
        &self.products
    }

    fn categories(&self) -> &dyn CategoryService {
        &self.categories
    }

    fn cart(&self) -> &dyn CartService {
        &self.cart
    }

    fn orders(&self) -> &dyn OrderService {
        &self.orders
    }

    fn customers(&self) -> &dyn CustomerService {
        &self.customers
    }

    fn b2b(&self) -> Option<&B2BServices> {
        self.b2b.as_ref()
    }

    fn session(&self) -> &ClientSession {
        &self.session
    }

    fn http_client(&self) -> &FetchClient {
        &self.http
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeClient")
            .field("base_url", &self.config.base_url_str())
            .field("b2b", &self.b2b.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commerce_core::{merge_config, ProviderConfig, ProviderKind};

    fn config(options: serde_json::Value) -> ClientConfig {
        let mut raw = ProviderConfig::new(ProviderKind::Bridge, "https://erp.test/");
        if let serde_json::Value::Object(map) = options {
            raw.provider_options = map.into_iter().collect();
        }
        merge_config(raw).unwrap()
    }

    #[test]
    fn test_defaults() {
        let client = BridgeClient::new(config(serde_json::json!({}))).unwrap();
        assert_eq!(client.http.base_url(), "https://erp.test");
        assert!(client.b2b().is_none());
        assert!(!client.is_b2b_enabled());
    }

    #[test]
    fn test_rejects_unknown_currency_option() {
        let result = BridgeClient::new(config(serde_json::json!({ "currency": "XYZ" })));
        assert!(matches!(result, Err(ApiError::Mapping(_))));
    }

    #[test]
    fn test_from_client_downcasts() {
        let client: Arc<dyn CommerceClient> =
            Arc::new(BridgeClient::new(config(serde_json::json!({}))).unwrap());
        assert!(BridgeClient::from_client(client.as_ref()).is_some());
    }
}
