//! The normalized commerce client interface.

use std::any::Any;

use commerce_http::FetchClient;

use crate::config::{B2BContext, ClientConfig, ProviderKind};
use crate::services::{
    B2BServices, CartService, CategoryService, CustomerService, OrderService, ProductService,
};
use crate::session::ClientSession;

/// A stateful handle to one backend.
///
/// Adapters supply the service objects, the config they were built from and
/// the session. Token and B2B context management are provided on top of the
/// session and never touch the network.
pub trait CommerceClient: Send + Sync + 'static {
    fn config(&self) -> &ClientConfig;

    fn products(&self) -> &dyn ProductService;

    fn categories(&self) -> &dyn CategoryService;

    fn cart(&self) -> &dyn CartService;

    fn orders(&self) -> &dyn OrderService;

    fn customers(&self) -> &dyn CustomerService;

    /// `None` when the client was built without B2B.
    fn b2b(&self) -> Option<&B2BServices>;

    fn session(&self) -> &ClientSession;

    /// Raw HTTP access for calls no typed service covers.
    fn http_client(&self) -> &FetchClient;

    /// Downcast hook for provider-specific capabilities.
    fn as_any(&self) -> &dyn Any;

    fn provider(&self) -> ProviderKind {
        self.config().provider
    }

    fn set_auth_token(&self, token: &str) {
        self.session().set_auth_token(token);
    }

    fn clear_auth(&self) {
        self.session().clear_auth();
    }

    fn auth_token(&self) -> Option<String> {
        self.session().auth_token()
    }

    fn set_b2b_context(&self, context: B2BContext) {
        self.session().set_b2b_context(context);
    }

    fn clear_b2b_context(&self) {
        self.session().clear_b2b_context();
    }

    fn b2b_context(&self) -> Option<B2BContext> {
        self.session().b2b_context()
    }

    fn is_b2b_enabled(&self) -> bool {
        self.config().enable_b2b && self.b2b().is_some()
    }
}

impl std::fmt::Debug for dyn CommerceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommerceClient")
            .field("provider", &self.provider())
            .field("base_url", &self.config().base_url_str())
            .finish_non_exhaustive()
    }
}
