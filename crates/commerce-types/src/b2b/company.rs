//! Companies and their employees.

use crate::customer::Address;
use crate::ids::{CompanyId, CustomerId, EmployeeId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A B2B buyer organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub email: Option<String>,
    pub tax_id: Option<String>,
    /// Negotiated payment terms, e.g. "net30".
    pub payment_terms: Option<String>,
    pub credit_limit: Option<Money>,
    pub addresses: Vec<Address>,
    pub is_active: bool,
}

/// Role of an employee within a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    Admin,
    Approver,
    #[default]
    Buyer,
    Viewer,
}

impl EmployeeRole {
    /// Whether this role may approve purchases.
    pub fn can_approve(&self) -> bool {
        matches!(self, EmployeeRole::Admin | EmployeeRole::Approver)
    }

    /// Whether this role may place orders.
    pub fn can_purchase(&self) -> bool {
        !matches!(self, EmployeeRole::Viewer)
    }
}

/// An employee of a company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub id: EmployeeId,
    pub company_id: CompanyId,
    pub customer_id: Option<CustomerId>,
    pub email: String,
    pub name: Option<String>,
    pub role: EmployeeRole,
    /// Per-order spending cap for this employee.
    pub spending_limit: Option<Money>,
    pub is_active: bool,
}

/// Invitation of a new employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InviteEmployee {
    pub email: String,
    pub name: Option<String>,
    pub role: EmployeeRole,
    pub spending_limit: Option<Money>,
}
