//! Cart and line item types.

use crate::customer::Address;
use crate::ids::{CartId, CustomerId, LineItemId, ProductId, VariantId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A line item in a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: LineItemId,
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total: Money,
    pub image_url: Option<String>,
}

/// Cart totals as computed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl CartTotals {
    /// All-zero totals in a currency.
    pub fn zero(currency: Currency) -> Self {
        Self {
            subtotal: Money::zero(currency),
            discount: Money::zero(currency),
            shipping: Money::zero(currency),
            tax: Money::zero(currency),
            total: Money::zero(currency),
        }
    }
}

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub id: CartId,
    pub customer_id: Option<CustomerId>,
    pub email: Option<String>,
    pub items: Vec<CartItem>,
    pub currency: Currency,
    pub totals: CartTotals,
    pub discount_codes: Vec<String>,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub region_id: Option<String>,
}

impl Cart {
    /// Total number of units in the cart.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a line item by SKU.
    pub fn item_by_sku(&self, sku: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.sku == sku)
    }
}

/// Request to add an item to a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddCartItem {
    pub product_id: Option<ProductId>,
    pub variant_id: Option<VariantId>,
    pub sku: Option<String>,
    pub quantity: i64,
}

impl AddCartItem {
    /// Add by SKU, the identifier every backend understands.
    pub fn sku(sku: impl Into<String>, quantity: i64) -> Self {
        Self {
            product_id: None,
            variant_id: None,
            sku: Some(sku.into()),
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_count() {
        let item = |sku: &str, quantity| CartItem {
            id: LineItemId::new(sku),
            product_id: ProductId::new("p"),
            variant_id: None,
            sku: sku.to_string(),
            name: sku.to_string(),
            quantity,
            unit_price: Money::new(100, Currency::USD),
            total: Money::new(100 * quantity, Currency::USD),
            image_url: None,
        };
        let cart = Cart {
            id: CartId::new("c1"),
            customer_id: None,
            email: None,
            items: vec![item("A", 2), item("B", 3)],
            currency: Currency::USD,
            totals: CartTotals::zero(Currency::USD),
            discount_codes: Vec::new(),
            shipping_address: None,
            billing_address: None,
            region_id: None,
        };

        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.item_by_sku("B").unwrap().quantity, 3);
        assert!(!cart.is_empty());
    }
}
