use async_trait::async_trait;
use commerce_core::{CartService, Result};
use commerce_types::cart::{AddCartItem, Cart};
use commerce_types::customer::Address;
use commerce_types::order::Order;
use commerce_types::{CartId, LineItemId};
use serde::Serialize;

use crate::api::{segment, BridgeApi};
use crate::mappers::Mapper;
use crate::wire::{WireAddress, WireCart, WireOrder};

#[derive(Debug, Serialize)]
struct NewCart<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    region_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Quantity {
    quantity: i64,
}

#[derive(Debug, Serialize)]
struct DiscountCode<'a> {
    code: &'a str,
}

#[derive(Debug, Serialize)]
struct CartAddresses {
    shipping_address: WireAddress,
    billing_address: WireAddress,
}

pub(crate) struct BridgeCartService {
    api: BridgeApi,
    mapper: Mapper,
    region_id: Option<String>,
}

impl BridgeCartService {
    pub fn new(api: BridgeApi, mapper: Mapper, region_id: Option<String>) -> Self {
        Self {
            api,
            mapper,
            region_id,
        }
    }

    fn cart_path(id: &CartId) -> String {
        format!("/carts/{}", segment(id.as_str()))
    }
}

#[async_trait]
impl CartService for BridgeCartService {
    /// Falls back to the configured region.
    async fn create(&self, region_id: Option<&str>) -> Result<Cart> {
        let body = NewCart {
            region_id: region_id.or(self.region_id.as_deref()),
        };
        let wire: WireCart = self.api.post("/carts", &body).await?;
        self.mapper.cart(wire)
    }

    async fn get(&self, id: &CartId) -> Result<Cart> {
        let wire: WireCart = self.api.get(&Self::cart_path(id)).await?;
        self.mapper.cart(wire)
    }

    async fn add_item(&self, cart_id: &CartId, item: &AddCartItem) -> Result<Cart> {
        let path = format!("{}/items", Self::cart_path(cart_id));
        let wire: WireCart = self.api.post(&path, item).await?;
        self.mapper.cart(wire)
    }

    /// A quantity of zero or less removes the line.
    async fn update_item(
        &self,
        cart_id: &CartId,
        line_id: &LineItemId,
        quantity: i64,
    ) -> Result<Cart> {
        if quantity <= 0 {
            return self.remove_item(cart_id, line_id).await;
        }
        let path = format!(
            "{}/items/{}",
            Self::cart_path(cart_id),
            segment(line_id.as_str())
        );
        let wire: WireCart = self.api.patch(&path, &Quantity { quantity }).await?;
        self.mapper.cart(wire)
    }

    async fn remove_item(&self, cart_id: &CartId, line_id: &LineItemId) -> Result<Cart> {
        let path = format!(
            "{}/items/{}",
            Self::cart_path(cart_id),
            segment(line_id.as_str())
        );
        let wire: WireCart = self.api.delete(&path).await?;
        self.mapper.cart(wire)
    }

    async fn apply_discount(&self, cart_id: &CartId, code: &str) -> Result<Cart> {
        let path = format!("{}/discounts", Self::cart_path(cart_id));
        let wire: WireCart = self.api.post(&path, &DiscountCode { code }).await?;
        self.mapper.cart(wire)
    }

    async fn remove_discount(&self, cart_id: &CartId, code: &str) -> Result<Cart> {
        let path = format!("{}/discounts/{}", Self::cart_path(cart_id), segment(code));
        let wire: WireCart = self.api.delete(&path).await?;
        self.mapper.cart(wire)
    }

    /// Billing defaults to the shipping address.
    async fn set_addresses(
        &self,
        cart_id: &CartId,
        shipping: &Address,
        billing: Option<&Address>,
    ) -> Result<Cart> {
        let body = CartAddresses {
            shipping_address: WireAddress::from(shipping),
            billing_address: WireAddress::from(billing.unwrap_or(shipping)),
        };
        let path = format!("{}/addresses", Self::cart_path(cart_id));
        let wire: WireCart = self.api.put(&path, &body).await?;
        self.mapper.cart(wire)
    }

    async fn complete(&self, cart_id: &CartId) -> Result<Order> {
        let path = format!("{}/complete", Self::cart_path(cart_id));
        let wire: WireOrder = self.api.post(&path, &serde_json::json!({})).await?;
        self.mapper.order(wire)
    }
}
