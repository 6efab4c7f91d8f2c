//! Monthly budget upkeep and utilization.

use serde::Serialize;
use tracing::info;

use crate::core::{aggregation, filter::TransactionFilter};
use crate::ledger::{Budget, TransactionKind};
use crate::storage::{LedgerReader, LedgerStore};

use super::ServiceResult;

/// Spending measured against one budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub id: i64,
    pub category: String,
    pub budget: f64,
    pub spent: f64,
    /// Negative when the category is overspent.
    pub remaining: f64,
    /// Zero whenever the budget amount is not positive.
    pub percentage: f64,
}

impl BudgetStatus {
    pub fn is_over(&self) -> bool {
        self.remaining < 0.0
    }
}

pub struct BudgetService;

impl BudgetService {
    /// Creates the `(category, month)` budget or replaces its amount.
    pub fn set<S: LedgerStore + ?Sized>(
        store: &mut S,
        category: &str,
        amount: f64,
        month: &str,
    ) -> ServiceResult<Budget> {
        let budget = store.upsert_budget(category, amount, month)?;
        info!(id = budget.id, category, month, amount, "budget set");
        Ok(budget)
    }

    /// Budgets for `month` only, in store order.
    pub fn for_month<R: LedgerReader + ?Sized>(
        store: &R,
        month: &str,
    ) -> ServiceResult<Vec<Budget>> {
        Ok(store
            .budgets()?
            .into_iter()
            .filter(|budget| budget.month == month)
            .collect())
    }

    /// Spending against every budget of `month`. Other months are not carried forward.
    pub fn status<R: LedgerReader + ?Sized>(
        store: &R,
        month: &str,
    ) -> ServiceResult<Vec<BudgetStatus>> {
        let budgets = Self::for_month(store, month)?;
        if budgets.is_empty() {
            return Ok(Vec::new());
        }
        let transactions = store.transactions()?;
        let month_expenses = TransactionFilter::new()
            .kind(TransactionKind::Expense)
            .month(month);

        Ok(budgets
            .into_iter()
            .map(|budget| {
                let filter = month_expenses.clone().category(budget.category.as_str());
                let spent =
                    aggregation::total_by_kind(filter.select(&transactions), TransactionKind::Expense);
                Self::measure(budget, spent)
            })
            .collect())
    }

    fn measure(budget: Budget, spent: f64) -> BudgetStatus {
        let percentage = if budget.amount > 0.0 {
            spent / budget.amount * 100.0
        } else {
            0.0
        };
        BudgetStatus {
            id: budget.id,
            remaining: budget.amount - spent,
            budget: budget.amount,
            category: budget.category,
            spent,
            percentage,
        }
    }
}
