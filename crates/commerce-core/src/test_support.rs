//! In-memory client used by the unit tests.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use commerce_http::FetchClient;
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

use crate::client::CommerceClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::registry::ProviderFactory;
use crate::services::*;
use crate::session::ClientSession;

fn unsupported<T>(operation: &str) -> Result<T> {
    Err(ApiError::Unsupported(operation.to_string()))
}

/// Service that answers every call with `Unsupported`.
pub struct Unsupported;

pub struct StubClient {
    config: ClientConfig,
    session: Arc<ClientSession>,
    http: FetchClient,
    b2b: Option<B2BServices>,
}

impl StubClient {
    pub fn new(config: ClientConfig) -> Self {
        let session = Arc::new(ClientSession::from_config(&config));
        let http = FetchClient::new(config.base_url_str()).with_header_source(session.clone());
        let b2b = config.enable_b2b.then(|| B2BServices {
            companies: Box::new(Unsupported),
            employees: Box::new(Unsupported),
            quotes: Box::new(Unsupported),
            approvals: Box::new(Unsupported),
            spending: Box::new(Unsupported),
        });
        Self {
            config,
            session,
            http,
            b2b,
        }
    }
}

pub fn stub_factory() -> ProviderFactory {
    Arc::new(|config| Ok(Arc::new(StubClient::new(config)) as Arc<dyn CommerceClient>))
}

impl CommerceClient for StubClient {
    fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn products(&self) -> &dyn ProductService {
        &Unsupported
    }

    fn categories(&self) -> &dyn CategoryService {
        &Unsupported
    }

    fn cart(&self) -> &dyn CartService {
        &Unsupported
    }

    fn orders(&self) -> &dyn OrderService {
        &Unsupported
    }

    fn customers(&self) -> &dyn CustomerService {
        &Unsupported
    }

    fn b2b(&self) -> Option<&B2BServices> {
        self.b2b.as_ref()
    }

    fn session(&self) -> &ClientSession {
        &self.session
    }

    fn http_client(&self) -> &FetchClient {
        &self.http
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[async_trait]
impl ProductService for Unsupported {
    async fn list(&self, _: &ProductListParams) -> Result<PaginatedResponse<Product>> {
        unsupported("products.list")
    }
    async fn get(&self, _: &ProductId) -> Result<Product> {
        unsupported("products.get")
    }
    async fn get_by_slug(&self, _: &str) -> Result<Product> {
        unsupported("products.get_by_slug")
    }
    async fn get_by_sku(&self, _: &str) -> Result<Product> {
        unsupported("products.get_by_sku")
    }
    async fn get_many(&self, _: &[ProductId]) -> Result<Vec<Product>> {
        unsupported("products.get_many")
    }
    async fn search(&self, _: &SearchParams) -> Result<PaginatedResponse<Product>> {
        unsupported("products.search")
    }
    async fn get_by_category(
        &self,
        _: &CategoryId,
        _: &ListParams,
    ) -> Result<PaginatedResponse<Product>> {
        unsupported("products.get_by_category")
    }
    async fn get_featured(&self, _: u32) -> Result<Vec<Product>> {
        unsupported("products.get_featured")
    }
    async fn get_new(&self, _: u32) -> Result<Vec<Product>> {
        unsupported("products.get_new")
    }
    async fn get_inventory(&self, _: &str) -> Result<InventoryLevel> {
        unsupported("products.get_inventory")
    }
    async fn get_inventory_bulk(&self, _: &[String]) -> Result<Vec<InventoryLevel>> {
        unsupported("products.get_inventory_bulk")
    }
}

#[async_trait]
impl CategoryService for Unsupported {
    async fn list(&self, _: &ListParams) -> Result<PaginatedResponse<Category>> {
        unsupported("categories.list")
    }
    async fn get(&self, _: &CategoryId) -> Result<Category> {
        unsupported("categories.get")
    }
    async fn get_by_slug(&self, _: &str) -> Result<Category> {
        unsupported("categories.get_by_slug")
    }
    async fn tree(&self) -> Result<Vec<Category>> {
        unsupported("categories.tree")
    }
    async fn children(&self, _: &CategoryId) -> Result<Vec<Category>> {
        unsupported("categories.children")
    }
}

#[async_trait]
impl CartService for Unsupported {
    async fn create(&self, _: Option<&str>) -> Result<Cart> {
        unsupported("cart.create")
    }
    async fn get(&self, _: &CartId) -> Result<Cart> {
        unsupported("cart.get")
    }
    async fn add_item(&self, _: &CartId, _: &AddCartItem) -> Result<Cart> {
        unsupported("cart.add_item")
    }
    async fn update_item(&self, _: &CartId, _: &LineItemId, _: i64) -> Result<Cart> {
        unsupported("cart.update_item")
    }
    async fn remove_item(&self, _: &CartId, _: &LineItemId) -> Result<Cart> {
        unsupported("cart.remove_item")
    }
    async fn apply_discount(&self, _: &CartId, _: &str) -> Result<Cart> {
        unsupported("cart.apply_discount")
    }
    async fn remove_discount(&self, _: &CartId, _: &str) -> Result<Cart> {
        unsupported("cart.remove_discount")
    }
    async fn set_addresses(&self, _: &CartId, _: &Address, _: Option<&Address>) -> Result<Cart> {
        unsupported("cart.set_addresses")
    }
    async fn complete(&self, _: &CartId) -> Result<Order> {
        unsupported("cart.complete")
    }
}

#[async_trait]
impl OrderService for Unsupported {
    async fn list(&self, _: &ListParams) -> Result<PaginatedResponse<Order>> {
        unsupported("orders.list")
    }
    async fn get(&self, _: &OrderId) -> Result<Order> {
        unsupported("orders.get")
    }
    async fn get_by_number(&self, _: &str) -> Result<Order> {
        unsupported("orders.get_by_number")
    }
    async fn cancel(&self, _: &OrderId, _: Option<&str>) -> Result<Order> {
        unsupported("orders.cancel")
    }
    async fn reorder(&self, _: &OrderId) -> Result<Cart> {
        unsupported("orders.reorder")
    }
}

#[async_trait]
impl CustomerService for Unsupported {
    async fn me(&self) -> Result<Customer> {
        unsupported("customers.me")
    }
    async fn update(&self, _: &UpdateCustomer) -> Result<Customer> {
        unsupported("customers.update")
    }
    async fn register(&self, _: &RegisterCustomer) -> Result<Customer> {
        unsupported("customers.register")
    }
    async fn addresses(&self) -> Result<Vec<Address>> {
        unsupported("customers.addresses")
    }
    async fn add_address(&self, _: &Address) -> Result<Address> {
        unsupported("customers.add_address")
    }
    async fn update_address(&self, _: &AddressId, _: &Address) -> Result<Address> {
        unsupported("customers.update_address")
    }
    async fn delete_address(&self, _: &AddressId) -> Result<()> {
        unsupported("customers.delete_address")
    }
}

#[async_trait]
impl CompanyService for Unsupported {
    async fn current(&self) -> Result<Company> {
        unsupported("companies.current")
    }
    async fn get(&self, _: &CompanyId) -> Result<Company> {
        unsupported("companies.get")
    }
    async fn addresses(&self, _: &CompanyId) -> Result<Vec<Address>> {
        unsupported("companies.addresses")
    }
}

#[async_trait]
impl EmployeeService for Unsupported {
    async fn list(&self, _: &ListParams) -> Result<PaginatedResponse<Employee>> {
        unsupported("employees.list")
    }
    async fn get(&self, _: &EmployeeId) -> Result<Employee> {
        unsupported("employees.get")
    }
    async fn invite(&self, _: &InviteEmployee) -> Result<Employee> {
        unsupported("employees.invite")
    }
    async fn update_role(&self, _: &EmployeeId, _: EmployeeRole) -> Result<Employee> {
        unsupported("employees.update_role")
    }
    async fn deactivate(&self, _: &EmployeeId) -> Result<Employee> {
        unsupported("employees.deactivate")
    }
}

#[async_trait]
impl QuoteService for Unsupported {
    async fn list(&self, _: &ListParams) -> Result<PaginatedResponse<Quote>> {
        unsupported("quotes.list")
    }
    async fn get(&self, _: &QuoteId) -> Result<Quote> {
        unsupported("quotes.get")
    }
    async fn create(&self, _: &CreateQuote) -> Result<Quote> {
        unsupported("quotes.create")
    }
    async fn submit(&self, _: &QuoteId) -> Result<Quote> {
        unsupported("quotes.submit")
    }
    async fn accept(&self, _: &QuoteId) -> Result<Quote> {
        unsupported("quotes.accept")
    }
    async fn reject(&self, _: &QuoteId, _: Option<&str>) -> Result<Quote> {
        unsupported("quotes.reject")
    }
    async fn convert_to_order(&self, _: &QuoteId) -> Result<Order> {
        unsupported("quotes.convert_to_order")
    }
}

#[async_trait]
impl ApprovalService for Unsupported {
    async fn list_pending(&self, _: &ListParams) -> Result<PaginatedResponse<Approval>> {
        unsupported("approvals.list_pending")
    }
    async fn get(&self, _: &ApprovalId) -> Result<Approval> {
        unsupported("approvals.get")
    }
    async fn approve(&self, _: &ApprovalId, _: Option<&str>) -> Result<Approval> {
        unsupported("approvals.approve")
    }
    async fn reject(&self, _: &ApprovalId, _: &str) -> Result<Approval> {
        unsupported("approvals.reject")
    }
}

#[async_trait]
impl SpendingService for Unsupported {
    async fn limits(&self) -> Result<Vec<SpendingLimit>> {
        unsupported("spending.limits")
    }
    async fn summary(&self, _: SpendingPeriod) -> Result<SpendingSummary> {
        unsupported("spending.summary")
    }
    async fn update_limit(&self, _: &SpendingLimit) -> Result<SpendingLimit> {
        unsupported("spending.update_limit")
    }
}
