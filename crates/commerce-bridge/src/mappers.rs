//! Wire to domain conversion.

use commerce_core::{ApiError, Result};
use commerce_types::b2b::{
    Approval, Company, Employee, Quote, QuoteItem, QuoteStatus, SpendingLimit, SpendingSummary,
};
use commerce_types::cart::{Cart, CartItem, CartTotals};
use commerce_types::catalog::{Category, Product, ProductImage, ProductStatus, ProductVariant};
use commerce_types::customer::{Address, Customer};
use commerce_types::money::{Currency, Money};
use commerce_types::order::{Order, OrderItem, OrderStatus};

use crate::wire::*;

/// Converts Bridge payloads using a fallback currency.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mapper {
    currency: Currency,
}

impl Mapper {
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }

    fn currency(&self, code: Option<&str>) -> Result<Currency> {
        match code {
            None => Ok(self.currency),
            Some(code) => Currency::from_code(code)
                .ok_or_else(|| ApiError::Mapping(format!("unsupported currency {:?}", code))),
        }
    }

    pub fn product(&self, wire: WireProduct) -> Result<Product> {
        let currency = self.currency(wire.currency.as_deref())?;
        let product_id: String = wire.id.into();

        let variants = wire
            .variants
            .into_iter()
            .map(|v| {
                Ok(ProductVariant {
                    id: String::from(v.id).into(),
                    product_id: product_id.clone().into(),
                    sku: v.sku,
                    name: v.name,
                    price: match &v.price {
                        Some(price) => price.to_money(currency)?,
                        None => wire.price.to_money(currency)?,
                    },
                    options: v
                        .options
                        .into_iter()
                        .map(|(key, value)| (key, json_to_text(value)))
                        .collect(),
                    available_quantity: v.stock_quantity,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let in_stock = match wire.stock_status.as_deref() {
            Some(status) => status != "out_of_stock",
            None => wire.stock_quantity.map_or(true, |qty| qty > 0),
        };

        Ok(Product {
            id: product_id.into(),
            slug: wire.slug.unwrap_or_else(|| wire.sku.to_lowercase()),
            sku: wire.sku,
            name: wire.name,
            description: wire.description,
            short_description: wire.short_description,
            status: wire
                .status
                .as_deref()
                .and_then(ProductStatus::parse)
                .unwrap_or_default(),
            price: wire.price.to_money(currency)?,
            compare_at_price: wire
                .compare_at_price
                .map(|p| p.to_money(currency))
                .transpose()?,
            images: wire
                .images
                .into_iter()
                .map(|img| ProductImage {
                    url: img.url,
                    alt: img.alt,
                    position: img.position,
                })
                .collect(),
            variants,
            category_ids: wire.category_ids.into_iter().map(|id| String::from(id).into()).collect(),
            tags: wire.tags,
            in_stock,
            is_featured: wire.is_featured,
            metadata: wire.meta.unwrap_or(serde_json::Value::Null),
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }

    pub fn category(&self, wire: WireCategory) -> Category {
        Category {
            id: String::from(wire.id).into(),
            parent_id: wire.parent_id.map(|id| String::from(id).into()),
            name: wire.name,
            slug: wire.slug,
            description: wire.description,
            image_url: wire.image_url,
            position: wire.position,
            product_count: wire.products_count,
            children: wire.children.into_iter().map(|c| self.category(c)).collect(),
        }
    }

    pub fn address(&self, wire: WireAddress) -> Address {
        Address {
            id: wire.id.map(|id| String::from(id).into()),
            first_name: wire.first_name,
            last_name: wire.last_name,
            company: wire.company,
            address_1: wire.address_line_1,
            address_2: wire.address_line_2,
            city: wire.city,
            province: wire.state,
            postal_code: wire.postal_code,
            country_code: wire.country,
            phone: wire.phone,
            is_default_shipping: wire.is_default_shipping,
            is_default_billing: wire.is_default_billing,
        }
    }

    pub fn customer(&self, wire: WireCustomer) -> Customer {
        Customer {
            id: String::from(wire.id).into(),
            email: wire.email,
            first_name: wire.first_name,
            last_name: wire.last_name,
            phone: wire.phone,
            company_id: wire.company_id.map(|id| String::from(id).into()),
            addresses: wire.addresses.into_iter().map(|a| self.address(a)).collect(),
            created_at: wire.created_at,
        }
    }

    pub fn cart(&self, wire: WireCart) -> Result<Cart> {
        let currency = self.currency(wire.currency.as_deref())?;

        let items = wire
            .items
            .into_iter()
            .map(|item| {
                let unit_price = item.unit_price.to_money(currency)?;
                Ok(CartItem {
                    id: String::from(item.id).into(),
                    product_id: String::from(item.product_id).into(),
                    variant_id: item.variant_id.map(|id| String::from(id).into()),
                    total: line_total(item.total.as_ref(), &unit_price, item.quantity, currency)?,
                    sku: item.sku,
                    name: item.name,
                    quantity: item.quantity,
                    unit_price,
                    image_url: item.image_url,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Cart {
            id: String::from(wire.id).into(),
            customer_id: wire.customer_id.map(|id| String::from(id).into()),
            email: wire.email,
            items,
            currency,
            totals: CartTotals {
                subtotal: wire.subtotal.to_money(currency)?,
                discount: wire.discount_total.to_money(currency)?,
                shipping: wire.shipping_total.to_money(currency)?,
                tax: wire.tax_total.to_money(currency)?,
                total: wire.total.to_money(currency)?,
            },
            discount_codes: wire.discount_codes,
            shipping_address: wire.shipping_address.map(|a| self.address(a)),
            billing_address: wire.billing_address.map(|a| self.address(a)),
            region_id: wire.region_id,
        })
    }

    pub fn order(&self, wire: WireOrder) -> Result<Order> {
        let currency = self.currency(wire.currency.as_deref())?;
        let status = OrderStatus::parse(&wire.status)
            .ok_or_else(|| ApiError::Mapping(format!("unknown order status {:?}", wire.status)))?;

        let items = wire
            .items
            .into_iter()
            .map(|item| {
                let unit_price = item.unit_price.to_money(currency)?;
                Ok(OrderItem {
                    product_id: item.product_id.map(|id| String::from(id).into()),
                    variant_id: item.variant_id.map(|id| String::from(id).into()),
                    total: line_total(item.total.as_ref(), &unit_price, item.quantity, currency)?,
                    sku: item.sku,
                    name: item.name,
                    quantity: item.quantity,
                    unit_price,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Order {
            id: String::from(wire.id).into(),
            number: wire.order_number,
            customer_id: wire.customer_id.map(|id| String::from(id).into()),
            email: wire.email,
            status,
            items,
            currency,
            subtotal: wire.subtotal.to_money(currency)?,
            shipping_total: wire.shipping_total.to_money(currency)?,
            tax_total: wire.tax_total.to_money(currency)?,
            total: wire.total.to_money(currency)?,
            shipping_address: wire.shipping_address.map(|a| self.address(a)),
            billing_address: wire.billing_address.map(|a| self.address(a)),
            placed_at: wire.created_at,
        })
    }

    pub fn company(&self, wire: WireCompany) -> Result<Company> {
        let currency = self.currency(wire.currency.as_deref())?;
        Ok(Company {
            id: String::from(wire.id).into(),
            name: wire.name,
            email: wire.email,
            tax_id: wire.tax_id,
            payment_terms: wire.payment_terms,
            credit_limit: wire.credit_limit.map(|c| c.to_money(currency)).transpose()?,
            addresses: wire.addresses.into_iter().map(|a| self.address(a)).collect(),
            is_active: wire.is_active,
        })
    }

    pub fn employee(&self, wire: WireEmployee) -> Result<Employee> {
        let currency = self.currency(wire.currency.as_deref())?;
        Ok(Employee {
            id: String::from(wire.id).into(),
            company_id: String::from(wire.company_id).into(),
            customer_id: wire.customer_id.map(|id| String::from(id).into()),
            email: wire.email,
            name: wire.name,
            role: wire.role,
            spending_limit: wire.spending_limit.map(|l| l.to_money(currency)).transpose()?,
            is_active: wire.is_active,
        })
    }

    pub fn quote(&self, wire: WireQuote) -> Result<Quote> {
        let currency = self.currency(wire.currency.as_deref())?;
        let status = QuoteStatus::parse(&wire.status)
            .ok_or_else(|| ApiError::Mapping(format!("unknown quote status {:?}", wire.status)))?;

        let items = wire
            .items
            .into_iter()
            .map(|item| {
                Ok(QuoteItem {
                    product_id: item.product_id.map(|id| String::from(id).into()),
                    variant_id: item.variant_id.map(|id| String::from(id).into()),
                    sku: item.sku,
                    name: item.name,
                    quantity: item.quantity,
                    quoted_price: item.quoted_price.map(|p| p.to_money(currency)).transpose()?,
                    notes: item.notes,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Quote {
            id: String::from(wire.id).into(),
            number: wire.quote_number,
            company_id: wire.company_id.map(|id| String::from(id).into()),
            employee_id: wire.employee_id.map(|id| String::from(id).into()),
            status,
            items,
            currency,
            total: wire.total.map(|t| t.to_money(currency)).transpose()?,
            notes: wire.notes,
            valid_until: wire.valid_until,
            order_id: wire.order_id.map(|id| String::from(id).into()),
        })
    }

    pub fn approval(&self, wire: WireApproval) -> Result<Approval> {
        let currency = self.currency(wire.currency.as_deref())?;
        Ok(Approval {
            id: String::from(wire.id).into(),
            company_id: String::from(wire.company_id).into(),
            requested_by: String::from(wire.requested_by).into(),
            approver_id: wire.approver_id.map(|id| String::from(id).into()),
            order_id: wire.order_id.map(|id| String::from(id).into()),
            quote_id: wire.quote_id.map(|id| String::from(id).into()),
            amount: wire.amount.to_money(currency)?,
            status: wire.status,
            reason: wire.reason,
            created_at: wire.created_at,
            decided_at: wire.decided_at,
        })
    }

    pub fn spending_limit(&self, wire: WireSpendingLimit) -> Result<SpendingLimit> {
        let currency = self.currency(wire.currency.as_deref())?;
        Ok(SpendingLimit {
            company_id: String::from(wire.company_id).into(),
            employee_id: wire.employee_id.map(|id| String::from(id).into()),
            period: wire.period,
            limit: wire.limit.to_money(currency)?,
            spent: wire.spent.to_money(currency)?,
        })
    }

    pub fn spending_summary(&self, wire: WireSpendingSummary) -> Result<SpendingSummary> {
        let currency = self.currency(wire.currency.as_deref())?;
        Ok(SpendingSummary {
            company_id: String::from(wire.company_id).into(),
            period: wire.period,
            total_spent: wire.total_spent.to_money(currency)?,
            order_count: wire.order_count,
            pending_approval: wire.pending_approval.to_money(currency)?,
            limits: wire
                .limits
                .into_iter()
                .map(|l| self.spending_limit(l))
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

fn line_total(
    total: Option<&WireDecimal>,
    unit_price: &Money,
    quantity: i64,
    currency: Currency,
) -> Result<Money> {
    match total {
        Some(total) => total.to_money(currency),
        None => unit_price.checked_multiply(quantity).ok_or_else(|| {
            ApiError::Mapping(format!(
                "line total overflows for {} x {}",
                unit_price.amount_cents, quantity
            ))
        }),
    }
}

fn json_to_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> Mapper {
        Mapper::new(Currency::USD)
    }

    // === Product Tests ===

    #[test]
    fn test_product_mapping() {
        let wire: WireProduct = serde_json::from_value(serde_json::json!({
            "id": 42,
            "sku": "RING-001",
            "name": "Solitaire Ring",
            "slug": "solitaire-ring",
            "status": "active",
            "price": "1299.00",
            "compare_at_price": 1499,
            "images": [{ "url": "https://cdn.test/ring.jpg", "position": 0 }],
            "variants": [
                { "id": 7, "sku": "RING-001-6", "options": { "size": 6 }, "stock_quantity": 2 }
            ],
            "category_ids": [3, "rings"],
            "stock_status": "in_stock",
            "is_featured": true
        }))
        .unwrap();

        let product = mapper().product(wire).unwrap();
        assert_eq!(product.id.as_str(), "42");
        assert_eq!(product.price.amount_cents, 129_900);
        assert_eq!(product.compare_at_price.unwrap().amount_cents, 149_900);
        assert!(product.is_on_sale());
        assert_eq!(product.status, ProductStatus::Active);
        assert_eq!(product.variants[0].product_id.as_str(), "42");
        assert_eq!(product.variants[0].price.amount_cents, 129_900);
        assert_eq!(product.variants[0].options, vec![("size".to_string(), "6".to_string())]);
        assert_eq!(product.category_ids[1].as_str(), "rings");
        assert!(product.in_stock);
        assert!(product.is_featured);
    }

    #[test]
    fn test_product_out_of_stock_and_currency() {
        let wire: WireProduct = serde_json::from_value(serde_json::json!({
            "id": "p1", "sku": "PEND-01", "name": "Pendant",
            "price": 250, "currency": "EUR", "stock_quantity": 0
        }))
        .unwrap();

        let product = mapper().product(wire).unwrap();
        assert_eq!(product.price.currency, Currency::EUR);
        assert_eq!(product.slug, "pend-01");
        assert!(!product.in_stock);
    }

    #[test]
    fn test_unknown_currency_is_mapping_error() {
        let wire: WireProduct = serde_json::from_value(serde_json::json!({
            "id": 1, "sku": "X", "name": "X", "price": 1, "currency": "XYZ"
        }))
        .unwrap();
        assert!(matches!(mapper().product(wire), Err(ApiError::Mapping(_))));
    }

    // === Cart / Order Tests ===

    #[test]
    fn test_cart_mapping_computes_missing_line_totals() {
        let wire: WireCart = serde_json::from_value(serde_json::json!({
            "id": 5,
            "items": [{
                "id": 1, "product_id": 42, "sku": "RING-001", "name": "Ring",
                "quantity": 2, "unit_price": "100.00"
            }],
            "subtotal": "200.00",
            "total": "200.00",
            "shipping_address": { "address_line_1": "1 Main St", "city": "Austin", "postal_code": "78701", "country": "US" }
        }))
        .unwrap();

        let cart = mapper().cart(wire).unwrap();
        assert_eq!(cart.items[0].total.amount_cents, 20_000);
        assert_eq!(cart.totals.total.amount_cents, 20_000);
        assert_eq!(cart.totals.tax.amount_cents, 0);
        let address = cart.shipping_address.unwrap();
        assert_eq!(address.address_1, "1 Main St");
        assert_eq!(address.country_code, "US");
    }

    #[test]
    fn test_cart_line_total_overflow_is_mapping_error() {
        let wire: WireCart = serde_json::from_value(serde_json::json!({
            "id": 6,
            "items": [{
                "id": 1, "product_id": 42, "sku": "RING-001", "name": "Ring",
                "quantity": i64::MAX, "unit_price": "100.00"
            }]
        }))
        .unwrap();

        assert!(matches!(mapper().cart(wire), Err(ApiError::Mapping(_))));
    }

    #[test]
    fn test_order_mapping_rejects_unknown_status() {
        let wire: WireOrder = serde_json::from_value(serde_json::json!({
            "id": 9, "order_number": "BR-1009", "status": "teleported"
        }))
        .unwrap();
        assert!(matches!(mapper().order(wire), Err(ApiError::Mapping(_))));
    }

    #[test]
    fn test_order_mapping() {
        let wire: WireOrder = serde_json::from_value(serde_json::json!({
            "id": 9, "order_number": "BR-1009", "status": "processing",
            "items": [{ "sku": "RING-001", "name": "Ring", "quantity": 1, "unit_price": 99.5, "total": 99.5 }],
            "total": 99.5
        }))
        .unwrap();

        let order = mapper().order(wire).unwrap();
        assert_eq!(order.number, "BR-1009");
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.items[0].total.amount_cents, 9_950);
    }

    // === Category / Address Tests ===

    #[test]
    fn test_category_mapping_keeps_children() {
        let wire: WireCategory = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Jewelry", "slug": "jewelry",
            "children": [{ "id": 2, "parent_id": 1, "name": "Rings", "slug": "rings", "products_count": 12 }]
        }))
        .unwrap();

        let category = mapper().category(wire);
        assert!(category.is_root());
        assert_eq!(category.children[0].parent_id.as_ref().unwrap().as_str(), "1");
        assert_eq!(category.children[0].product_count, Some(12));
    }

    #[test]
    fn test_address_round_trip_field_names() {
        let address = Address {
            address_1: "1 Main St".to_string(),
            city: "Austin".to_string(),
            province: Some("TX".to_string()),
            postal_code: "78701".to_string(),
            country_code: "US".to_string(),
            ..Default::default()
        };

        let wire = serde_json::to_value(WireAddress::from(&address)).unwrap();
        assert_eq!(wire["address_line_1"], "1 Main St");
        assert_eq!(wire["state"], "TX");
        assert_eq!(wire["country"], "US");
    }
}
