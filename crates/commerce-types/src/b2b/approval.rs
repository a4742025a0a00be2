//! Purchase approvals.

use crate::ids::{ApprovalId, CompanyId, EmployeeId, OrderId, QuoteId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Approval decision state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A purchase awaiting (or having received) an approver's decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Approval {
    pub id: ApprovalId,
    pub company_id: CompanyId,
    pub requested_by: EmployeeId,
    pub approver_id: Option<EmployeeId>,
    pub order_id: Option<OrderId>,
    pub quote_id: Option<QuoteId>,
    pub amount: Money,
    pub status: ApprovalStatus,
    pub reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl Approval {
    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }
}
