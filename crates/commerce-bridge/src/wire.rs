//! Bridge wire formats.
//!
//! Laravel serializes ids as integers or strings depending on the model and
//! decimals as strings (`"1299.00"`) or numbers, so both are accepted.

use std::fmt;

use chrono::{DateTime, Utc};
use commerce_core::{ApiError, Result};
use commerce_types::b2b::{ApprovalStatus, EmployeeRole, SpendingPeriod};
use commerce_types::customer::Address;
use commerce_types::money::{Currency, Money};
use commerce_types::response::Pagination;
use serde::{Deserialize, Serialize};

// === Envelopes ===

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct PageMeta {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    #[serde(default)]
    pub last_page: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

impl<T> PageEnvelope<T> {
    pub fn pagination(&self) -> Pagination {
        match self.meta {
            Some(meta) => {
                let mut pagination = Pagination::new(meta.current_page, meta.per_page, meta.total);
                if let Some(last_page) = meta.last_page {
                    pagination.total_pages = last_page.max(1);
                    pagination.has_next = meta.current_page < last_page;
                }
                pagination
            }
            None => {
                let total = self.data.len() as i64;
                Pagination::new(1, total.max(1), total)
            }
        }
    }
}

// === Scalars ===

/// An id sent as either a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum WireId {
    Int(i64),
    Str(String),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireId::Int(id) => write!(f, "{}", id),
            WireId::Str(id) => f.write_str(id),
        }
    }
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Int(id) => id.to_string(),
            WireId::Str(id) => id,
        }
    }
}

/// A decimal sent as either a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireDecimal {
    Number(f64),
    Text(String),
}

impl WireDecimal {
    pub fn to_money(&self, currency: Currency) -> Result<Money> {
        match self {
            WireDecimal::Number(value) if value.is_finite() => {
                Ok(Money::from_decimal(*value, currency))
            }
            WireDecimal::Number(value) => {
                Err(ApiError::Mapping(format!("non-finite amount {}", value)))
            }
            WireDecimal::Text(text) => Money::parse_decimal(text, currency)
                .ok_or_else(|| ApiError::Mapping(format!("invalid amount {:?}", text))),
        }
    }
}

impl Default for WireDecimal {
    fn default() -> Self {
        WireDecimal::Number(0.0)
    }
}

pub(crate) fn default_true() -> bool {
    true
}

/// Deserialize a numeric or string id into a `String`.
pub(crate) fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    WireId::deserialize(deserializer).map(String::from)
}

/// Optional variant of [`id_string`].
pub(crate) fn opt_id_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<WireId>::deserialize(deserializer).map(|id| id.map(String::from))
}

// === Catalog ===

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireImage {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireVariant {
    pub id: WireId,
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<WireDecimal>,
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireProduct {
    pub id: WireId,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub price: WireDecimal,
    #[serde(default)]
    pub compare_at_price: Option<WireDecimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub images: Vec<WireImage>,
    #[serde(default)]
    pub variants: Vec<WireVariant>,
    #[serde(default)]
    pub category_ids: Vec<WireId>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub stock_status: Option<String>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireCategory {
    pub id: WireId,
    #[serde(default)]
    pub parent_id: Option<WireId>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub products_count: Option<i64>,
    #[serde(default)]
    pub children: Vec<WireCategory>,
}

// === Addresses / customers ===

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(crate) struct WireAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WireId>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address_line_1: String,
    #[serde(default)]
    pub address_line_2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default_shipping: bool,
    #[serde(default)]
    pub is_default_billing: bool,
}

impl From<&Address> for WireAddress {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id.as_ref().map(|id| WireId::Str(id.to_string())),
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            company: address.company.clone(),
            address_line_1: address.address_1.clone(),
            address_line_2: address.address_2.clone(),
            city: address.city.clone(),
            state: address.province.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country_code.clone(),
            phone: address.phone.clone(),
            is_default_shipping: address.is_default_shipping,
            is_default_billing: address.is_default_billing,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireCustomer {
    pub id: WireId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_id: Option<WireId>,
    #[serde(default)]
    pub addresses: Vec<WireAddress>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// === Cart / orders ===

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireCartItem {
    pub id: WireId,
    pub product_id: WireId,
    #[serde(default)]
    pub variant_id: Option<WireId>,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: WireDecimal,
    #[serde(default)]
    pub total: Option<WireDecimal>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireCart {
    pub id: WireId,
    #[serde(default)]
    pub customer_id: Option<WireId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub items: Vec<WireCartItem>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub subtotal: WireDecimal,
    #[serde(default)]
    pub discount_total: WireDecimal,
    #[serde(default)]
    pub shipping_total: WireDecimal,
    #[serde(default)]
    pub tax_total: WireDecimal,
    #[serde(default)]
    pub total: WireDecimal,
    #[serde(default)]
    pub discount_codes: Vec<String>,
    #[serde(default)]
    pub shipping_address: Option<WireAddress>,
    #[serde(default)]
    pub billing_address: Option<WireAddress>,
    #[serde(default)]
    pub region_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireOrderItem {
    #[serde(default)]
    pub product_id: Option<WireId>,
    #[serde(default)]
    pub variant_id: Option<WireId>,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: WireDecimal,
    #[serde(default)]
    pub total: Option<WireDecimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireOrder {
    pub id: WireId,
    pub order_number: String,
    #[serde(default)]
    pub customer_id: Option<WireId>,
    #[serde(default)]
    pub email: Option<String>,
    pub status: String,
    #[serde(default)]
    pub items: Vec<WireOrderItem>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub subtotal: WireDecimal,
    #[serde(default)]
    pub shipping_total: WireDecimal,
    #[serde(default)]
    pub tax_total: WireDecimal,
    #[serde(default)]
    pub total: WireDecimal,
    #[serde(default)]
    pub shipping_address: Option<WireAddress>,
    #[serde(default)]
    pub billing_address: Option<WireAddress>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// === B2B ===

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireCompany {
    pub id: WireId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub credit_limit: Option<WireDecimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub addresses: Vec<WireAddress>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireEmployee {
    pub id: WireId,
    pub company_id: WireId,
    #[serde(default)]
    pub customer_id: Option<WireId>,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: EmployeeRole,
    #[serde(default)]
    pub spending_limit: Option<WireDecimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireQuoteItem {
    #[serde(default)]
    pub product_id: Option<WireId>,
    #[serde(default)]
    pub variant_id: Option<WireId>,
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub quoted_price: Option<WireDecimal>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireQuote {
    pub id: WireId,
    #[serde(default)]
    pub quote_number: Option<String>,
    #[serde(default)]
    pub company_id: Option<WireId>,
    #[serde(default)]
    pub employee_id: Option<WireId>,
    pub status: String,
    #[serde(default)]
    pub items: Vec<WireQuoteItem>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub total: Option<WireDecimal>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub order_id: Option<WireId>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireApproval {
    pub id: WireId,
    pub company_id: WireId,
    pub requested_by: WireId,
    #[serde(default)]
    pub approver_id: Option<WireId>,
    #[serde(default)]
    pub order_id: Option<WireId>,
    #[serde(default)]
    pub quote_id: Option<WireId>,
    pub amount: WireDecimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: ApprovalStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireSpendingLimit {
    pub company_id: WireId,
    #[serde(default)]
    pub employee_id: Option<WireId>,
    pub period: SpendingPeriod,
    pub limit: WireDecimal,
    #[serde(default)]
    pub spent: WireDecimal,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireSpendingSummary {
    pub company_id: WireId,
    pub period: SpendingPeriod,
    #[serde(default)]
    pub total_spent: WireDecimal,
    #[serde(default)]
    pub order_count: i64,
    #[serde(default)]
    pub pending_approval: WireDecimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub limits: Vec<WireSpendingLimit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_id_accepts_int_and_string() {
        let ids: Vec<WireId> = serde_json::from_str(r#"[12, "prod_12"]"#).unwrap();
        assert_eq!(String::from(ids[0].clone()), "12");
        assert_eq!(ids[1].to_string(), "prod_12");
    }

    #[test]
    fn test_wire_decimal_to_money() {
        let values: Vec<WireDecimal> = serde_json::from_str(r#"["1299.00", 49.99]"#).unwrap();
        assert_eq!(values[0].to_money(Currency::USD).unwrap().amount_cents, 129_900);
        assert_eq!(values[1].to_money(Currency::USD).unwrap().amount_cents, 4_999);

        let bad = WireDecimal::Text("n/a".to_string());
        assert!(matches!(bad.to_money(Currency::USD), Err(ApiError::Mapping(_))));
    }

    #[test]
    fn test_page_meta_to_pagination() {
        let page: PageEnvelope<serde_json::Value> = serde_json::from_str(
            r#"{ "data": [1, 2], "meta": { "current_page": 2, "per_page": 2, "total": 5, "last_page": 3 } }"#,
        )
        .unwrap();

        let pagination = page.pagination();
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.total_pages, 3);
        assert!(pagination.has_next);
        assert!(pagination.has_prev);
    }

    #[test]
    fn test_page_without_meta_is_single_page() {
        let page: PageEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{ "data": [1, 2, 3] }"#).unwrap();
        let pagination = page.pagination();
        assert_eq!(pagination.total, 3);
        assert!(!pagination.has_next);
    }
}
