//! Quotes (request-for-price workflow).

use crate::ids::{CompanyId, EmployeeId, OrderId, ProductId, QuoteId, VariantId};
use crate::money::{Currency, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quote lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Submitted,
    /// Priced by the merchant, awaiting the buyer.
    Quoted,
    Accepted,
    Rejected,
    Expired,
    /// Turned into an order.
    Converted,
}

impl QuoteStatus {
    /// Lenient parse used by mappers.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(QuoteStatus::Draft),
            "submitted" | "pending" => Some(QuoteStatus::Submitted),
            "quoted" | "responded" => Some(QuoteStatus::Quoted),
            "accepted" => Some(QuoteStatus::Accepted),
            "rejected" | "declined" => Some(QuoteStatus::Rejected),
            "expired" => Some(QuoteStatus::Expired),
            "converted" | "ordered" => Some(QuoteStatus::Converted),
            _ => None,
        }
    }

    /// Whether the buyer can still edit line items.
    pub fn is_editable(&self) -> bool {
        matches!(self, QuoteStatus::Draft)
    }

    /// Whether the buyer can accept or reject.
    pub fn awaiting_buyer(&self) -> bool {
        matches!(self, QuoteStatus::Quoted)
    }
}

/// A quote line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteItem {
    pub product_id: Option<ProductId>,
    pub variant_id: Option<VariantId>,
    pub sku: String,
    pub name: Option<String>,
    pub quantity: i64,
    /// Merchant's quoted unit price, once priced.
    pub quoted_price: Option<Money>,
    pub notes: Option<String>,
}

/// A quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub id: QuoteId,
    pub number: Option<String>,
    pub company_id: Option<CompanyId>,
    pub employee_id: Option<EmployeeId>,
    pub status: QuoteStatus,
    pub items: Vec<QuoteItem>,
    pub currency: Currency,
    pub total: Option<Money>,
    pub notes: Option<String>,
    pub valid_until: Option<DateTime<Utc>>,
    /// Order created from this quote.
    pub order_id: Option<OrderId>,
}

/// Request to open a quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CreateQuote {
    pub items: Vec<QuoteItem>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_status_parse() {
        assert_eq!(QuoteStatus::parse("responded"), Some(QuoteStatus::Quoted));
        assert!(QuoteStatus::Quoted.awaiting_buyer());
        assert!(QuoteStatus::Draft.is_editable());
        assert!(!QuoteStatus::Submitted.is_editable());
    }
}
