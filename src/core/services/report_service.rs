//! Derived views: trailing monthly trend, category ranking and the dashboard summary.

use serde::Serialize;
use tracing::debug;

use crate::core::{
    aggregation::{self, CategoryTotal, Totals},
    filter::{sort_recent_first, TransactionFilter},
    time::{current_month, Clock, TrendStepping},
};
use crate::ledger::{SavingsGoal, Transaction, TransactionKind};
use crate::storage::LedgerReader;

use super::{ServiceError, ServiceResult};

pub const DEFAULT_TREND_MONTHS: usize = 6;
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Income, expense and net savings for one month bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub income: f64,
    pub expense: f64,
    pub savings: f64,
}

/// Overview of the current month plus recent activity and goals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub month: String,
    pub totals: Totals,
    pub recent: Vec<Transaction>,
    pub expense_by_category: Vec<CategoryTotal>,
    pub goals: Vec<SavingsGoal>,
}

pub struct ReportService;

impl ReportService {
    /// Trailing series of `window` buckets, oldest first, ending at the clock's month.
    pub fn monthly_trend<R: LedgerReader + ?Sized>(
        store: &R,
        clock: &dyn Clock,
        window: usize,
        stepping: TrendStepping,
    ) -> ServiceResult<Vec<TrendPoint>> {
        let today = clock.today();
        let oldest = window.saturating_sub(1);
        let months = u32::try_from(oldest)
            .ok()
            .and_then(|oldest| {
                (0..=oldest)
                    .rev()
                    .map(|offset| stepping.bucket_label(today, offset))
                    .collect::<Option<Vec<_>>>()
            })
            .ok_or_else(|| {
                ServiceError::Invalid(format!(
                    "a trend window of {window} months reaches before the earliest supported date"
                ))
            })?;

        let transactions = store.transactions()?;
        let points = months
            .into_iter()
            .take(window)
            .map(|month| Self::trend_point(&transactions, month))
            .collect::<Vec<_>>();
        debug!(window, ?stepping, "monthly trend computed");
        Ok(points)
    }

    fn trend_point(transactions: &[Transaction], month: String) -> TrendPoint {
        let in_month = TransactionFilter::new().month(month.as_str()).select(transactions);
        let totals = aggregation::totals(in_month);
        TrendPoint {
            month,
            income: totals.income,
            expense: totals.expense,
            savings: totals.balance,
        }
    }

    /// Expense totals per category for `month`, largest first. Ties keep first-seen order.
    pub fn category_breakdown<R: LedgerReader + ?Sized>(
        store: &R,
        month: &str,
    ) -> ServiceResult<Vec<CategoryTotal>> {
        let mut breakdown = Self::month_expenses_by_category(&store.transactions()?, month);
        breakdown.sort_by(|a, b| b.total.total_cmp(&a.total));
        Ok(breakdown)
    }

    /// Current-month totals, the `recent_limit` latest transactions, current-month spending
    /// per category and every goal in store order.
    pub fn dashboard<R: LedgerReader + ?Sized>(
        store: &R,
        clock: &dyn Clock,
        recent_limit: usize,
    ) -> ServiceResult<DashboardSummary> {
        let transactions = store.transactions()?;
        let month = current_month(clock);

        let totals = aggregation::totals(
            TransactionFilter::new()
                .month(month.as_str())
                .select(&transactions),
        );
        let expense_by_category = Self::month_expenses_by_category(&transactions, &month);

        let mut recent = transactions;
        sort_recent_first(&mut recent);
        recent.truncate(recent_limit);

        Ok(DashboardSummary {
            month,
            totals,
            recent,
            expense_by_category,
            goals: store.goals()?,
        })
    }

    fn month_expenses_by_category(
        transactions: &[Transaction],
        month: &str,
    ) -> Vec<CategoryTotal> {
        let expenses = TransactionFilter::new()
            .kind(TransactionKind::Expense)
            .month(month)
            .select(transactions);
        aggregation::group_by_category(expenses)
    }
}
