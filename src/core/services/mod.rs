pub mod budget_service;
pub mod report_service;
pub mod savings_service;
pub mod transaction_service;

pub use budget_service::{BudgetService, BudgetStatus};
pub use report_service::{DashboardSummary, ReportService, TrendPoint};
pub use savings_service::SavingsService;
pub use transaction_service::TransactionService;

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
}
