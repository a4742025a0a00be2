//! B2B entities: companies, employees, quotes, approvals, spending.

mod approval;
mod company;
mod quote;
mod spending;

pub use approval::{Approval, ApprovalStatus};
pub use company::{Company, Employee, EmployeeRole, InviteEmployee};
pub use quote::{CreateQuote, Quote, QuoteItem, QuoteStatus};
pub use spending::{SpendingLimit, SpendingPeriod, SpendingSummary};
