use async_trait::async_trait;
use commerce_core::{OrderService, Result};
use commerce_types::cart::Cart;
use commerce_types::order::Order;
use commerce_types::params::ListParams;
use commerce_types::response::PaginatedResponse;
use commerce_types::OrderId;
use serde::Serialize;

use crate::api::{segment, BridgeApi};
use crate::mappers::Mapper;
use crate::wire::{WireCart, WireOrder};

#[derive(Debug, Serialize)]
struct CancelOrder<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

pub(crate) struct BridgeOrderService {
    api: BridgeApi,
    mapper: Mapper,
}

impl BridgeOrderService {
    pub fn new(api: BridgeApi, mapper: Mapper) -> Self {
        Self { api, mapper }
    }

    async fn fetch(&self, path: &str) -> Result<Order> {
        let wire: WireOrder = self.api.get(path).await?;
        self.mapper.order(wire)
    }
}

#[async_trait]
impl OrderService for BridgeOrderService {
    async fn list(&self, params: &ListParams) -> Result<PaginatedResponse<Order>> {
        let mapper = self.mapper;
        self.api
            .get_page_mapped("/orders", params.to_query(), move |w| mapper.order(w))
            .await
    }

    async fn get(&self, id: &OrderId) -> Result<Order> {
        self.fetch(&format!("/orders/{}", segment(id.as_str()))).await
    }

    async fn get_by_number(&self, number: &str) -> Result<Order> {
        self.fetch(&format!("/orders/number/{}", segment(number))).await
    }

    async fn cancel(&self, id: &OrderId, reason: Option<&str>) -> Result<Order> {
        let path = format!("/orders/{}/cancel", segment(id.as_str()));
        let wire: WireOrder = self.api.post(&path, &CancelOrder { reason }).await?;
        self.mapper.order(wire)
    }

    /// Copy the order's lines into a new cart.
    async fn reorder(&self, id: &OrderId) -> Result<Cart> {
        let path = format!("/orders/{}/reorder", segment(id.as_str()));
        let wire: WireCart = self.api.post(&path, &serde_json::json!({})).await?;
        self.mapper.cart(wire)
    }
}
