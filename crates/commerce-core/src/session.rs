//! Per-client mutable auth and B2B state.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use commerce_http::HeaderSource;

use crate::config::{B2BContext, ClientConfig};

/// Header names used to send the B2B context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct B2BHeaderNames {
    pub company: String,
    pub employee: String,
}

impl Default for B2BHeaderNames {
    fn default() -> Self {
        Self {
            company: "X-Company-Id".to_string(),
            employee: "X-Employee-Id".to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    auth_token: Option<String>,
    b2b_context: Option<B2BContext>,
}

/// Auth token and B2B context for one client.
///
/// Mutations are local and synchronous. The session is also a
/// [`HeaderSource`], so the next request picks up any change.
#[derive(Debug, Default)]
pub struct ClientSession {
    state: RwLock<SessionState>,
    header_names: B2BHeaderNames,
}

impl ClientSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the token and B2B context in a config.
    pub fn from_config(config: &ClientConfig) -> Self {
        let session = Self::new();
        {
            let mut state = session.write();
            state.auth_token = config.auth_token.clone();
            state.b2b_context = config.b2b.clone().filter(|ctx| !ctx.is_empty());
        }
        session
    }

    pub fn with_header_names(mut self, header_names: B2BHeaderNames) -> Self {
        self.header_names = header_names;
        self
    }

    pub fn set_auth_token(&self, token: impl Into<String>) {
        self.write().auth_token = Some(token.into());
    }

    pub fn clear_auth(&self) {
        self.write().auth_token = None;
    }

    pub fn auth_token(&self) -> Option<String> {
        self.read().auth_token.clone()
    }

    pub fn set_b2b_context(&self, context: B2BContext) {
        self.write().b2b_context = Some(context);
    }

    pub fn clear_b2b_context(&self) {
        self.write().b2b_context = None;
    }

    pub fn b2b_context(&self) -> Option<B2BContext> {
        self.read().b2b_context.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HeaderSource for ClientSession {
    fn headers(&self) -> Vec<(String, String)> {
        let state = self.read();
        let mut headers = Vec::new();

        if let Some(token) = &state.auth_token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        if let Some(ctx) = &state.b2b_context {
            if let Some(company_id) = &ctx.company_id {
                headers.push((self.header_names.company.clone(), company_id.clone()));
            }
            if let Some(employee_id) = &ctx.employee_id {
                headers.push((self.header_names.employee.clone(), employee_id.clone()));
            }
        }

        headers
    }
}
