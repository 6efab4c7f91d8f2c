//! Predicate chains over transactions.
//!
//! Dates are compared as text, so callers must supply canonical `YYYY-MM-DD` bounds for the
//! ordering to be meaningful.

use crate::ledger::{Transaction, TransactionKind};

/// Query tokens that mean "no restriction" for textual criteria.
pub const ALL: &str = "all";
pub const ANY: &str = "-";

/// Conjunction of optional criteria. An unset criterion passes every transaction through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    /// Inclusive lower bound.
    pub start_date: Option<String>,
    /// Inclusive upper bound.
    pub end_date: Option<String>,
    /// `YYYY-MM` prefix match.
    pub month: Option<String>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from raw query values where `"all"`, `"-"` or an empty string means unset.
    pub fn from_query(
        kind: &str,
        category: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Self, String> {
        let kind = match criterion(kind) {
            Some(raw) => Some(raw.parse::<TransactionKind>()?),
            None => None,
        };
        Ok(Self {
            kind,
            category: criterion(category).map(str::to_string),
            start_date: criterion(start_date).map(str::to_string),
            end_date: criterion(end_date).map(str::to_string),
            month: None,
        })
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    pub fn month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.kind.map_or(true, |kind| txn.kind == kind)
            && self
                .category
                .as_deref()
                .map_or(true, |category| txn.category == category)
            && self
                .start_date
                .as_deref()
                .map_or(true, |start| txn.date.as_str() >= start)
            && self
                .end_date
                .as_deref()
                .map_or(true, |end| txn.date.as_str() <= end)
            && self.month.as_deref().map_or(true, |month| txn.in_month(month))
    }

    /// Borrowing variant of [`apply`](Self::apply); input order is preserved.
    pub fn select<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|txn| self.matches(txn)).collect()
    }

    /// Returns the matching transactions in input order.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|txn| self.matches(txn))
            .cloned()
            .collect()
    }
}

/// Trimmed query value, or `None` when it is blank or a "no restriction" token.
pub fn criterion(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == ANY || trimmed.eq_ignore_ascii_case(ALL) {
        None
    } else {
        Some(trimmed)
    }
}

/// Most recent date first; among equal dates, the most recently created first.
pub fn sort_recent_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| (&b.date, b.id).cmp(&(&a.date, a.id)));
}
