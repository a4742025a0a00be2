//! Product and variant types.

use crate::ids::{CategoryId, ProductId, VariantId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product status in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Product is in draft mode, not visible to customers.
    Draft,
    /// Product is active and visible.
    #[default]
    Active,
    /// Product is archived, not visible but data preserved.
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Active => "active",
            ProductStatus::Archived => "archived",
        }
    }

    /// Lenient parse used by mappers; backends spell these differently.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" | "proposed" => Some(ProductStatus::Draft),
            "active" | "published" | "enabled" => Some(ProductStatus::Active),
            "archived" | "disabled" | "rejected" => Some(ProductStatus::Archived),
            _ => None,
        }
    }
}

/// A product image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductImage {
    pub url: String,
    pub alt: Option<String>,
    pub position: i32,
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Backend product identifier.
    pub id: ProductId,
    /// Stock keeping unit of the base product.
    pub sku: String,
    pub name: String,
    /// URL-friendly slug.
    pub slug: String,
    pub description: Option<String>,
    /// Short description for listings.
    pub short_description: Option<String>,
    pub status: ProductStatus,
    /// Current selling price.
    pub price: Money,
    /// Compare-at price (original price when on sale).
    pub compare_at_price: Option<Money>,
    pub images: Vec<ProductImage>,
    pub variants: Vec<ProductVariant>,
    pub category_ids: Vec<CategoryId>,
    pub tags: Vec<String>,
    /// Whether any sellable stock exists, as reported by the backend.
    pub in_stock: bool,
    pub is_featured: bool,
    /// Provider-specific attributes (metal, stone, carat...).
    pub metadata: serde_json::Value,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Check if the product is available for purchase.
    pub fn is_available(&self) -> bool {
        self.status == ProductStatus::Active && self.in_stock
    }

    /// Check if this product is on sale (compare-at above price).
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price
            .map(|cap| cap.currency == self.price.currency && cap.amount_cents > self.price.amount_cents)
            .unwrap_or(false)
    }

    /// Find a variant by SKU.
    pub fn variant_by_sku(&self, sku: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.sku == sku)
    }

    /// The first image, used as the listing thumbnail.
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.iter().min_by_key(|i| i.position)
    }
}

/// A product variant (e.g., ring size or metal).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    /// Variant title (e.g., "18k Gold / Size 6").
    pub name: Option<String>,
    pub price: Money,
    /// Option name to value pairs.
    pub options: Vec<(String, String)>,
    /// Sellable quantity, if the backend exposes it on the variant.
    pub available_quantity: Option<i64>,
}
