//! Multi-provider commerce client core.
//!
//! Storefront code talks to one normalized [`CommerceClient`] regardless of
//! which backend (Bridge, Medusa, Sage, ...) sits behind it:
//!
//! - [`ProviderRegistry`] maps a [`ProviderKind`] to the factory that builds
//!   its client. Adapter crates install their factory at startup.
//! - [`create_api_client`] validates a [`ProviderConfig`], looks up the
//!   factory, merges defaults and invokes it.
//! - [`api_client`] is a fluent builder over the same path.
//! - [`ApiClientManager`] keeps named clients and a default one.
//!
//! # Example
//!
//! ```rust,ignore
//! use commerce_core::prelude::*;
//!
//! commerce_bridge::register_global();
//!
//! let client = api_client()
//!     .provider(ProviderKind::Bridge)
//!     .base_url("https://erp.example.com")
//!     .build()?;
//!
//! let page = client.products().list(&ProductListParams::new()).await?;
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod manager;
pub mod registry;
pub mod services;
pub mod session;

#[cfg(test)]
mod test_support;

pub use builder::{api_client, ApiClientConfigBuilder};
pub use client::CommerceClient;
pub use config::{
    merge_config, validate_config, B2BContext, ClientConfig, ProviderConfig, ProviderKind,
    DEFAULT_TIMEOUT_MS,
};
pub use error::{ApiError, ConfigError, Result};
pub use factory::{create_api_client, create_api_client_global};
pub use manager::{ApiClientManager, ClientMetadata};
pub use registry::{ProviderFactory, ProviderRegistry};
pub use services::{
    ApprovalService, B2BServices, CartService, CategoryService, CompanyService,
    CustomerService, EmployeeService, OrderService, ProductService, QuoteService,
    SpendingService,
};
pub use session::{B2BHeaderNames, ClientSession};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        api_client, create_api_client, create_api_client_global, ApiClientManager, ApiError,
        B2BContext, CommerceClient, ProviderConfig, ProviderKind, ProviderRegistry,
    };
    pub use commerce_types::prelude::*;
}
