//! Normalized service interfaces every provider adapter implements.

use async_trait::async_trait;
use commerce_types::b2b::{
    Approval, Company, CreateQuote, Employee, EmployeeRole, InviteEmployee, Quote,
    SpendingLimit, SpendingPeriod, SpendingSummary,
};
use commerce_types::cart::{AddCartItem, Cart};
use commerce_types::catalog::{Category, InventoryLevel, Product};
use commerce_types::customer::{Address, Customer, RegisterCustomer, UpdateCustomer};
use commerce_types::order::Order;
use commerce_types::params::{ListParams, ProductListParams, SearchParams};
use commerce_types::response::PaginatedResponse;
use commerce_types::{
    AddressId, ApprovalId, CartId, CategoryId, CompanyId, EmployeeId, LineItemId, OrderId,
    ProductId, QuoteId,
};

use crate::error::Result;

/// Catalog reads.
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list(&self, params: &ProductListParams) -> Result<PaginatedResponse<Product>>;

    async fn get(&self, id: &ProductId) -> Result<Product>;

    async fn get_by_slug(&self, slug: &str) -> Result<Product>;

    async fn get_by_sku(&self, sku: &str) -> Result<Product>;

    /// Products in the same order as `ids`; unknown ids are skipped.
    async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>>;

    async fn search(&self, params: &SearchParams) -> Result<PaginatedResponse<Product>>;

    async fn get_by_category(
        &self,
        category_id: &CategoryId,
        params: &ListParams,
    ) -> Result<PaginatedResponse<Product>>;

    async fn get_featured(&self, limit: u32) -> Result<Vec<Product>>;

    async fn get_new(&self, limit: u32) -> Result<Vec<Product>>;

    async fn get_inventory(&self, sku: &str) -> Result<InventoryLevel>;

    async fn get_inventory_bulk(&self, skus: &[String]) -> Result<Vec<InventoryLevel>>;
}

#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn list(&self, params: &ListParams) -> Result<PaginatedResponse<Category>>;

    async fn get(&self, id: &CategoryId) -> Result<Category>;

    async fn get_by_slug(&self, slug: &str) -> Result<Category>;

    /// Root categories with `children` populated.
    async fn tree(&self) -> Result<Vec<Category>>;

    async fn children(&self, id: &CategoryId) -> Result<Vec<Category>>;
}

#[async_trait]
pub trait CartService: Send + Sync {
    async fn create(&self, region_id: Option<&str>) -> Result<Cart>;

    async fn get(&self, id: &CartId) -> Result<Cart>;

    async fn add_item(&self, cart_id: &CartId, item: &AddCartItem) -> Result<Cart>;

    async fn update_item(
        &self,
        cart_id: &CartId,
        line_id: &LineItemId,
        quantity: i64,
    ) -> Result<Cart>;

    async fn remove_item(&self, cart_id: &CartId, line_id: &LineItemId) -> Result<Cart>;

    async fn apply_discount(&self, cart_id: &CartId, code: &str) -> Result<Cart>;

    async fn remove_discount(&self, cart_id: &CartId, code: &str) -> Result<Cart>;

    async fn set_addresses(
        &self,
        cart_id: &CartId,
        shipping: &Address,
        billing: Option<&Address>,
    ) -> Result<Cart>;

    /// Place the order for a cart.
    async fn complete(&self, cart_id: &CartId) -> Result<Order>;
}

#[async_trait]
pub trait OrderService: Send + Sync {
    async fn list(&self, params: &ListParams) -> Result<PaginatedResponse<Order>>;

    async fn get(&self, id: &OrderId) -> Result<Order>;

    async fn get_by_number(&self, number: &str) -> Result<Order>;

    async fn cancel(&self, id: &OrderId, reason: Option<&str>) -> Result<Order>;

    /// Copy an order's items into a new cart.
    async fn reorder(&self, id: &OrderId) -> Result<Cart>;
}

#[async_trait]
pub trait CustomerService: Send + Sync {
    /// The customer the current auth token belongs to.
    async fn me(&self) -> Result<Customer>;

    async fn update(&self, update: &UpdateCustomer) -> Result<Customer>;

    async fn register(&self, registration: &RegisterCustomer) -> Result<Customer>;

    async fn addresses(&self) -> Result<Vec<Address>>;

    async fn add_address(&self, address: &Address) -> Result<Address>;

    async fn update_address(&self, id: &AddressId, address: &Address) -> Result<Address>;

    async fn delete_address(&self, id: &AddressId) -> Result<()>;
}

// === B2B ===

#[async_trait]
pub trait CompanyService: Send + Sync {
    /// The company of the current B2B context.
    async fn current(&self) -> Result<Company>;

    async fn get(&self, id: &CompanyId) -> Result<Company>;

    async fn addresses(&self, id: &CompanyId) -> Result<Vec<Address>>;
}

#[async_trait]
pub trait EmployeeService: Send + Sync {
    async fn list(&self, params: &ListParams) -> Result<PaginatedResponse<Employee>>;

    async fn get(&self, id: &EmployeeId) -> Result<Employee>;

    async fn invite(&self, invite: &InviteEmployee) -> Result<Employee>;

    async fn update_role(&self, id: &EmployeeId, role: EmployeeRole) -> Result<Employee>;

    async fn deactivate(&self, id: &EmployeeId) -> Result<Employee>;
}

#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn list(&self, params: &ListParams) -> Result<PaginatedResponse<Quote>>;

    async fn get(&self, id: &QuoteId) -> Result<Quote>;

    async fn create(&self, quote: &CreateQuote) -> Result<Quote>;

    async fn submit(&self, id: &QuoteId) -> Result<Quote>;

    async fn accept(&self, id: &QuoteId) -> Result<Quote>;

    async fn reject(&self, id: &QuoteId, reason: Option<&str>) -> Result<Quote>;

    async fn convert_to_order(&self, id: &QuoteId) -> Result<Order>;
}

#[async_trait]
pub trait ApprovalService: Send + Sync {
    async fn list_pending(&self, params: &ListParams) -> Result<PaginatedResponse<Approval>>;

    async fn get(&self, id: &ApprovalId) -> Result<Approval>;

    async fn approve(&self, id: &ApprovalId, note: Option<&str>) -> Result<Approval>;

    async fn reject(&self, id: &ApprovalId, reason: &str) -> Result<Approval>;
}

#[async_trait]
pub trait SpendingService: Send + Sync {
    async fn limits(&self) -> Result<Vec<SpendingLimit>>;

    async fn summary(&self, period: SpendingPeriod) -> Result<SpendingSummary>;

    async fn update_limit(&self, limit: &SpendingLimit) -> Result<SpendingLimit>;
}

/// The full B2B service bundle.
///
/// A client either has all of these or none of them.
pub struct B2BServices {
    pub companies: Box<dyn CompanyService>,
    pub employees: Box<dyn EmployeeService>,
    pub quotes: Box<dyn QuoteService>,
    pub approvals: Box<dyn ApprovalService>,
    pub spending: Box<dyn SpendingService>,
}

impl std::fmt::Debug for B2BServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("B2BServices").finish_non_exhaustive()
    }
}
