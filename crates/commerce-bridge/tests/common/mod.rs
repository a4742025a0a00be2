//! Scripted in-memory Bridge backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use commerce_bridge::BridgeClient;
use commerce_core::{merge_config, ClientConfig, ProviderConfig, ProviderKind};
use commerce_http::{FetchError, Method, Request, Response, Transport};
use serde_json::{json, Value};

pub const BASE_URL: &str = "https://erp.test";

type Handler = Box<dyn Fn(&Request) -> Response + Send + Sync>;

/// Routes `(method, path)` to canned answers and records every request.
#[derive(Default)]
pub struct MockBridge {
    routes: Mutex<HashMap<(Method, String), Handler>>,
    requests: Mutex<Vec<Request>>,
}

impl MockBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `method path` with a fixed status and JSON body.
    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) {
        self.on_fn(method, path, move |_| json_response(status, &body));
    }

    /// Answer `method path` by calling `handler`.
    pub fn on_fn<F>(&self, method: Method, path: &str, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Box::new(handler));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Request {
        self.requests().pop().expect("no request was sent")
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path() == path)
            .count()
    }
}

#[async_trait]
impl Transport for MockBridge {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        self.requests.lock().unwrap().push(request.clone());

        let routes = self.routes.lock().unwrap();
        let response = match routes.get(&(request.method, request.path().to_string())) {
            Some(handler) => handler(&request),
            None => json_response(404, &json!({ "message": "Not found" })),
        };
        Ok(response)
    }
}

pub fn json_response(status: u16, body: &Value) -> Response {
    Response::from_json(status, body).unwrap()
}

/// Wrap a resource the way Laravel does.
pub fn data(value: Value) -> Value {
    json!({ "data": value })
}

pub fn page(items: Value, current_page: i64, per_page: i64, total: i64) -> Value {
    let last_page = ((total + per_page - 1) / per_page).max(1);
    json!({
        "data": items,
        "meta": {
            "current_page": current_page,
            "per_page": per_page,
            "total": total,
            "last_page": last_page
        }
    })
}

pub fn bridge_config() -> ProviderConfig {
    ProviderConfig::new(ProviderKind::Bridge, BASE_URL)
}

pub fn client_config(config: ProviderConfig) -> ClientConfig {
    merge_config(config).unwrap()
}

/// A Bridge client wired to a fresh mock backend.
pub fn client() -> (BridgeClient, Arc<MockBridge>) {
    client_with(bridge_config())
}

pub fn client_with(config: ProviderConfig) -> (BridgeClient, Arc<MockBridge>) {
    let mock = MockBridge::new();
    let client = BridgeClient::with_transport(client_config(config), mock.clone()).unwrap();
    (client, mock)
}

pub fn wire_product(id: i64, sku: &str, price: Value) -> Value {
    json!({
        "id": id,
        "sku": sku,
        "name": format!("Product {}", sku),
        "slug": sku.to_lowercase(),
        "status": "active",
        "price": price,
        "currency": "USD",
        "stock_quantity": 3,
        "category_ids": [7]
    })
}

pub fn wire_job(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "entity_type": "products",
        "direction": "import",
        "status": status,
        "total_items": 100,
        "processed_items": 40,
        "failed_items": 0,
        "created_at": "2024-03-01T12:00:00Z"
    })
}
