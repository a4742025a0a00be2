//! Normalized services backed by the Bridge REST API.

mod b2b;
mod cart;
mod categories;
mod customers;
mod orders;
mod products;

pub(crate) use b2b::b2b_services;
pub(crate) use cart::BridgeCartService;
pub(crate) use categories::BridgeCategoryService;
pub(crate) use customers::BridgeCustomerService;
pub(crate) use orders::BridgeOrderService;
pub(crate) use products::BridgeProductService;

use commerce_core::Result;

/// Map every item, stopping at the first failure.
fn map_all<W, T>(items: Vec<W>, map: impl FnMut(W) -> Result<T>) -> Result<Vec<T>> {
    items.into_iter().map(map).collect()
}
