//! Spending limits and summaries.

use crate::ids::{CompanyId, EmployeeId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Period a spending limit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpendingPeriod {
    Order,
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

/// A spending cap for a company or one of its employees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendingLimit {
    pub company_id: CompanyId,
    /// None when the limit applies company-wide.
    pub employee_id: Option<EmployeeId>,
    pub period: SpendingPeriod,
    pub limit: Money,
    pub spent: Money,
}

impl SpendingLimit {
    /// Remaining budget in this period, floored at zero.
    pub fn remaining(&self) -> Money {
        Money::new(
            (self.limit.amount_cents - self.spent.amount_cents).max(0),
            self.limit.currency,
        )
    }

    /// Whether a purchase of `amount` fits the remaining budget.
    pub fn allows(&self, amount: &Money) -> bool {
        amount.currency == self.limit.currency
            && amount.amount_cents <= self.remaining().amount_cents
    }
}

/// Aggregated spend for a period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendingSummary {
    pub company_id: CompanyId,
    pub period: SpendingPeriod,
    pub total_spent: Money,
    pub order_count: i64,
    pub pending_approval: Money,
    pub limits: Vec<SpendingLimit>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_spending_limit_remaining() {
        let limit = SpendingLimit {
            company_id: CompanyId::new("c1"),
            employee_id: None,
            period: SpendingPeriod::Monthly,
            limit: Money::new(500_000, Currency::USD),
            spent: Money::new(450_000, Currency::USD),
        };

        assert_eq!(limit.remaining().amount_cents, 50_000);
        assert!(limit.allows(&Money::new(50_000, Currency::USD)));
        assert!(!limit.allows(&Money::new(50_001, Currency::USD)));
        assert!(!limit.allows(&Money::new(1, Currency::EUR)));
    }
}
