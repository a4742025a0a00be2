//! Normalized commerce domain types.
//!
//! Every provider adapter maps its backend's responses into these types, so
//! storefront code is written once against one model:
//!
//! - **Catalog**: products, variants, categories, stock levels
//! - **Cart / Orders / Customers**: the storefront purchase flow
//! - **B2B**: companies, employees, quotes, approvals, spending
//! - **Responses**: `ApiResponse`, `PaginatedResponse`, list parameters

pub mod b2b;
pub mod cart;
pub mod catalog;
pub mod customer;
pub mod ids;
pub mod money;
pub mod order;
pub mod params;
pub mod response;

pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    pub use crate::b2b::{
        Approval, ApprovalStatus, Company, CreateQuote, Employee, EmployeeRole, InviteEmployee,
        Quote, QuoteItem, QuoteStatus, SpendingLimit, SpendingPeriod, SpendingSummary,
    };
    pub use crate::cart::{AddCartItem, Cart, CartItem, CartTotals};
    pub use crate::catalog::{Category, InventoryLevel, Product, ProductImage, ProductStatus, ProductVariant};
    pub use crate::customer::{Address, Customer, RegisterCustomer, UpdateCustomer};
    pub use crate::order::{Order, OrderItem, OrderStatus};
    pub use crate::params::{ListParams, ProductListParams, SearchParams, SortOption};
    pub use crate::response::{ApiResponse, PaginatedResponse, Pagination};
}
