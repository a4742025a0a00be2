//! Company, employee, quote, approval and spending services.

use async_trait::async_trait;
use commerce_core::{
    ApprovalService, B2BServices, CompanyService, EmployeeService, QuoteService, Result,
    SpendingService,
};
use commerce_types::b2b::{
    Approval, Company, CreateQuote, Employee, EmployeeRole, InviteEmployee, Quote,
    SpendingLimit, SpendingPeriod, SpendingSummary,
};
use commerce_types::customer::Address;
use commerce_types::order::Order;
use commerce_types::params::ListParams;
use commerce_types::response::PaginatedResponse;
use commerce_types::{ApprovalId, CompanyId, EmployeeId, QuoteId};
use serde::Serialize;

use super::map_all;
use crate::api::{query, segment, BridgeApi};
use crate::mappers::Mapper;
use crate::wire::*;

/// Build the B2B service set over one API handle.
pub(crate) fn b2b_services(api: &BridgeApi, mapper: Mapper) -> B2BServices {
    let service = || B2BApi {
        api: api.clone(),
        mapper,
    };
    B2BServices {
        companies: Box::new(BridgeCompanyService(service())),
        employees: Box::new(BridgeEmployeeService(service())),
        quotes: Box::new(BridgeQuoteService(service())),
        approvals: Box::new(BridgeApprovalService(service())),
        spending: Box::new(BridgeSpendingService(service())),
    }
}

struct B2BApi {
    api: BridgeApi,
    mapper: Mapper,
}

fn period_str(period: SpendingPeriod) -> &'static str {
    match period {
        SpendingPeriod::Order => "order",
        SpendingPeriod::Daily => "daily",
        SpendingPeriod::Weekly => "weekly",
        SpendingPeriod::Monthly => "monthly",
        SpendingPeriod::Quarterly => "quarterly",
        SpendingPeriod::Yearly => "yearly",
    }
}

// === Companies ===

struct BridgeCompanyService(B2BApi);

#[async_trait]
impl CompanyService for BridgeCompanyService {
    async fn current(&self) -> Result<Company> {
        let wire: WireCompany = self.0.api.get("/b2b/company").await?;
        self.0.mapper.company(wire)
    }

    async fn get(&self, id: &CompanyId) -> Result<Company> {
        let wire: WireCompany = self
            .0
            .api
            .get(&format!("/b2b/companies/{}", segment(id.as_str())))
            .await?;
        self.0.mapper.company(wire)
    }

    async fn addresses(&self, id: &CompanyId) -> Result<Vec<Address>> {
        let wire: Vec<WireAddress> = self
            .0
            .api
            .get(&format!("/b2b/companies/{}/addresses", segment(id.as_str())))
            .await?;
        Ok(wire.into_iter().map(|a| self.0.mapper.address(a)).collect())
    }
}

// === Employees ===

#[derive(Debug, Serialize)]
struct Invitation<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    role: EmployeeRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    spending_limit: Option<f64>,
}

#[derive(Debug, Serialize)]
struct RoleChange {
    role: EmployeeRole,
}

struct BridgeEmployeeService(B2BApi);

impl BridgeEmployeeService {
    fn path(id: &EmployeeId) -> String {
        format!("/b2b/employees/{}", segment(id.as_str()))
    }
}

#[async_trait]
impl EmployeeService for BridgeEmployeeService {
    async fn list(&self, params: &ListParams) -> Result<PaginatedResponse<Employee>> {
        let mapper = self.0.mapper;
        self.0
            .api
            .get_page_mapped("/b2b/employees", params.to_query(), move |w| {
                mapper.employee(w)
            })
            .await
    }

    async fn get(&self, id: &EmployeeId) -> Result<Employee> {
        let wire: WireEmployee = self.0.api.get(&Self::path(id)).await?;
        self.0.mapper.employee(wire)
    }

    async fn invite(&self, invite: &InviteEmployee) -> Result<Employee> {
        let body = Invitation {
            email: &invite.email,
            name: invite.name.as_deref(),
            role: invite.role,
            spending_limit: invite.spending_limit.map(|m| m.to_decimal()),
        };
        let wire: WireEmployee = self.0.api.post("/b2b/employees/invite", &body).await?;
        self.0.mapper.employee(wire)
    }

    async fn update_role(&self, id: &EmployeeId, role: EmployeeRole) -> Result<Employee> {
        let wire: WireEmployee = self.0.api.patch(&Self::path(id), &RoleChange { role }).await?;
        self.0.mapper.employee(wire)
    }

    async fn deactivate(&self, id: &EmployeeId) -> Result<Employee> {
        let path = format!("{}/deactivate", Self::path(id));
        let wire: WireEmployee = self.0.api.post(&path, &serde_json::json!({})).await?;
        self.0.mapper.employee(wire)
    }
}

// === Quotes ===

#[derive(Debug, Serialize)]
struct NewQuoteItem<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    product_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    variant_id: Option<&'a str>,
    sku: &'a str,
    quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    requested_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct NewQuote<'a> {
    items: Vec<NewQuoteItem<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

impl<'a> From<&'a CreateQuote> for NewQuote<'a> {
    fn from(quote: &'a CreateQuote) -> Self {
        Self {
            items: quote
                .items
                .iter()
                .map(|item| NewQuoteItem {
                    product_id: item.product_id.as_ref().map(|id| id.as_str()),
                    variant_id: item.variant_id.as_ref().map(|id| id.as_str()),
                    sku: &item.sku,
                    quantity: item.quantity,
                    requested_price: item.quoted_price.map(|p| p.to_decimal()),
                    notes: item.notes.as_deref(),
                })
                .collect(),
            notes: quote.notes.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Reason<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

struct BridgeQuoteService(B2BApi);

impl BridgeQuoteService {
    async fn action(&self, id: &QuoteId, action: &str, body: &Reason<'_>) -> Result<Quote> {
        let path = format!("/b2b/quotes/{}/{}", segment(id.as_str()), action);
        let wire: WireQuote = self.0.api.post(&path, body).await?;
        self.0.mapper.quote(wire)
    }
}

#[async_trait]
impl QuoteService for BridgeQuoteService {
    async fn list(&self, params: &ListParams) -> Result<PaginatedResponse<Quote>> {
        let mapper = self.0.mapper;
        self.0
            .api
            .get_page_mapped("/b2b/quotes", params.to_query(), move |w| mapper.quote(w))
            .await
    }

    async fn get(&self, id: &QuoteId) -> Result<Quote> {
        let wire: WireQuote = self
            .0
            .api
            .get(&format!("/b2b/quotes/{}", segment(id.as_str())))
            .await?;
        self.0.mapper.quote(wire)
    }

    async fn create(&self, quote: &CreateQuote) -> Result<Quote> {
        let wire: WireQuote = self.0.api.post("/b2b/quotes", &NewQuote::from(quote)).await?;
        self.0.mapper.quote(wire)
    }

    async fn submit(&self, id: &QuoteId) -> Result<Quote> {
        self.action(id, "submit", &Reason { reason: None }).await
    }

    async fn accept(&self, id: &QuoteId) -> Result<Quote> {
        self.action(id, "accept", &Reason { reason: None }).await
    }

    async fn reject(&self, id: &QuoteId, reason: Option<&str>) -> Result<Quote> {
        self.action(id, "reject", &Reason { reason }).await
    }

    async fn convert_to_order(&self, id: &QuoteId) -> Result<Order> {
        let path = format!("/b2b/quotes/{}/convert", segment(id.as_str()));
        let wire: WireOrder = self.0.api.post(&path, &serde_json::json!({})).await?;
        self.0.mapper.order(wire)
    }
}

// === Approvals ===

#[derive(Debug, Serialize)]
struct Decision<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

struct BridgeApprovalService(B2BApi);

impl BridgeApprovalService {
    async fn decide(&self, id: &ApprovalId, action: &str, body: &Decision<'_>) -> Result<Approval> {
        let path = format!("/b2b/approvals/{}/{}", segment(id.as_str()), action);
        let wire: WireApproval = self.0.api.post(&path, body).await?;
        self.0.mapper.approval(wire)
    }
}

#[async_trait]
impl ApprovalService for BridgeApprovalService {
    async fn list_pending(&self, params: &ListParams) -> Result<PaginatedResponse<Approval>> {
        let mut query = params.to_query();
        query.push(("status".to_string(), "pending".to_string()));
        let mapper = self.0.mapper;
        self.0
            .api
            .get_page_mapped("/b2b/approvals", query, move |w| mapper.approval(w))
            .await
    }

    async fn get(&self, id: &ApprovalId) -> Result<Approval> {
        let wire: WireApproval = self
            .0
            .api
            .get(&format!("/b2b/approvals/{}", segment(id.as_str())))
            .await?;
        self.0.mapper.approval(wire)
    }

    async fn approve(&self, id: &ApprovalId, note: Option<&str>) -> Result<Approval> {
        self.decide(id, "approve", &Decision { note, reason: None })
            .await
    }

    async fn reject(&self, id: &ApprovalId, reason: &str) -> Result<Approval> {
        let body = Decision {
            note: None,
            reason: Some(reason),
        };
        self.decide(id, "reject", &body).await
    }
}

// === Spending ===

#[derive(Debug, Serialize)]
struct LimitChange<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    employee_id: Option<&'a str>,
    period: SpendingPeriod,
    limit: f64,
}

struct BridgeSpendingService(B2BApi);

#[async_trait]
impl SpendingService for BridgeSpendingService {
    async fn limits(&self) -> Result<Vec<SpendingLimit>> {
        let wire: Vec<WireSpendingLimit> = self.0.api.get("/b2b/spending/limits").await?;
        map_all(wire, |l| self.0.mapper.spending_limit(l))
    }

    async fn summary(&self, period: SpendingPeriod) -> Result<SpendingSummary> {
        let wire: WireSpendingSummary = self
            .0
            .api
            .get_query(
                "/b2b/spending/summary",
                query(&[("period", period_str(period).to_string())]),
            )
            .await?;
        self.0.mapper.spending_summary(wire)
    }

    async fn update_limit(&self, limit: &SpendingLimit) -> Result<SpendingLimit> {
        let body = LimitChange {
            employee_id: limit.employee_id.as_ref().map(|id| id.as_str()),
            period: limit.period,
            limit: limit.limit.to_decimal(),
        };
        let wire: WireSpendingLimit = self.0.api.put("/b2b/spending/limits", &body).await?;
        self.0.mapper.spending_limit(wire)
    }
}
