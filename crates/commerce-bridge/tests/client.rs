//! Normalized client behaviour of the Bridge adapter.

mod common;

use std::sync::Arc;

use commerce_bridge::BridgeClient;
use commerce_core::prelude::*;
use commerce_core::{ClientConfig, ProviderRegistry};
use commerce_http::{Method, Transport};
use serde_json::json;

use common::*;

// === Registration Tests ===

fn registry_with_mock(mock: Arc<MockBridge>) -> ProviderRegistry {
    let registry = ProviderRegistry::new();
    registry.register(ProviderKind::Bridge, move |config: ClientConfig| {
        let transport: Arc<dyn Transport> = mock.clone();
        let client: Arc<dyn CommerceClient> =
            Arc::new(BridgeClient::with_transport(config, transport)?);
        Ok(client)
    });
    registry
}

#[test]
fn test_register_installs_bridge() {
    let registry = ProviderRegistry::new();
    commerce_bridge::register(&registry);

    assert!(registry.contains(ProviderKind::Bridge));
    let client = create_api_client(&registry, bridge_config()).unwrap();
    assert_eq!(client.provider(), ProviderKind::Bridge);
    assert!(BridgeClient::from_client(client.as_ref()).is_some());
}

#[test]
fn test_builder_enables_b2b_context() {
    let registry = ProviderRegistry::new();
    commerce_bridge::register(&registry);

    let client = api_client()
        .provider(ProviderKind::Bridge)
        .base_url(BASE_URL)
        .enable_b2b(Some("comp_1"), None)
        .build_with(&registry)
        .unwrap();

    let context = client.b2b_context().unwrap();
    assert_eq!(context.company_id.as_deref(), Some("comp_1"));
    assert!(context.employee_id.is_none());
    assert!(client.is_b2b_enabled());
    assert!(client.b2b().is_some());
}

// === Header Tests ===

#[tokio::test]
async fn test_auth_and_b2b_headers_follow_session() {
    let mock = MockBridge::new();
    let registry = registry_with_mock(mock.clone());
    let mut config = bridge_config();
    config.enable_b2b = Some(true);
    config.b2b = Some(B2BContext::new(Some("comp_1".to_string()), Some("emp_2".to_string())));
    let client = create_api_client(&registry, config).unwrap();
    mock.on(Method::Get, "/api/v1/customers/me", 200, data(json!({ "id": 5, "email": "a@b.test" })));

    client.set_auth_token("tok_1");
    client.customers().me().await.unwrap();
    let request = mock.last();
    assert_eq!(request.header("Authorization"), Some("Bearer tok_1"));
    assert_eq!(request.header("X-Company-Id"), Some("comp_1"));
    assert_eq!(request.header("X-Employee-Id"), Some("emp_2"));
    assert_eq!(request.header("Accept"), Some("application/json"));

    client.clear_auth();
    client.clear_b2b_context();
    client.customers().me().await.unwrap();
    let request = mock.last();
    assert!(request.header("Authorization").is_none());
    assert!(request.header("X-Company-Id").is_none());
}

// === Catalog Tests ===

#[tokio::test]
async fn test_products_list_maps_page() {
    let (client, mock) = client();
    mock.on(
        Method::Get,
        "/api/v1/products",
        200,
        page(
            json!([
                wire_product(1, "RING-001", json!("1299.00")),
                wire_product(2, "RING-002", json!(49.5))
            ]),
            2,
            2,
            6,
        ),
    );

    let params = ProductListParams::new().with_pagination(2, 2);
    let products = client.products().list(&params).await.unwrap();

    assert_eq!(products.items.len(), 2);
    assert_eq!(products.items[0].id.as_str(), "1");
    assert_eq!(products.items[0].price.amount_cents, 129_900);
    assert_eq!(products.items[1].price.amount_cents, 4_950);
    assert!(products.items[0].in_stock);
    assert_eq!(products.items[0].category_ids[0].as_str(), "7");
    assert_eq!(products.pagination.page, 2);
    assert_eq!(products.pagination.total_pages, 3);
    assert!(products.pagination.has_prev);
    assert_eq!(mock.last().query_param("page").as_deref(), Some("2"));
}

#[tokio::test]
async fn test_get_many_keeps_input_order() {
    let (client, mock) = client();
    mock.on(
        Method::Post,
        "/api/v1/products/batch",
        200,
        data(json!([
            wire_product(2, "B", json!("2.00")),
            wire_product(1, "A", json!(1))
        ])),
    );

    let ids: Vec<ProductId> = vec!["1".into(), "404".into(), "2".into()];
    let products = client.products().get_many(&ids).await.unwrap();

    let skus: Vec<&str> = products.iter().map(|p| p.sku.as_str()).collect();
    assert_eq!(skus, ["A", "B"]);
}

#[tokio::test]
async fn test_not_found_product_is_http_error() {
    let (client, _mock) = client();

    let err = client.products().get_by_slug("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_custom_api_prefix() {
    let mut config = bridge_config();
    config
        .provider_options
        .insert("api_prefix".to_string(), json!("/api/v2"));
    let (client, mock) = client_with(config);
    mock.on(Method::Get, "/api/v2/categories/tree", 200, data(json!([])));

    let tree = client.categories().tree().await.unwrap();
    assert!(tree.is_empty());
}

// === Cart Tests ===

#[tokio::test]
async fn test_update_item_to_zero_removes_line() {
    let (client, mock) = client();
    mock.on(
        Method::Delete,
        "/api/v1/carts/c1/items/l1",
        200,
        data(json!({ "id": "c1", "items": [] })),
    );

    let cart = client
        .cart()
        .update_item(&"c1".into(), &"l1".into(), 0)
        .await
        .unwrap();

    assert!(cart.is_empty());
    assert_eq!(mock.count(Method::Delete, "/api/v1/carts/c1/items/l1"), 1);
}
