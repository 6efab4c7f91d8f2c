use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A recorded movement of money. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Canonical `YYYY-MM-DD`; ordering and month bucketing compare this text directly.
    pub date: String,
}

impl Transaction {
    pub fn is_kind(&self, kind: TransactionKind) -> bool {
        self.kind == kind
    }

    /// True when the date falls in `month` (`YYYY-MM`), by string prefix.
    pub fn in_month(&self, month: &str) -> bool {
        self.date.starts_with(month)
    }
}

/// Fields required to record a transaction; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
    pub date: String,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionKind,
        category: impl Into<String>,
        amount: f64,
        date: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category: category.into(),
            amount,
            description: None,
            date: date.into(),
        }
    }

    pub fn income(category: impl Into<String>, amount: f64, date: impl Into<String>) -> Self {
        Self::new(TransactionKind::Income, category, amount, date)
    }

    pub fn expense(category: impl Into<String>, amount: f64, date: impl Into<String>) -> Self {
        Self::new(TransactionKind::Expense, category, amount, date)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let text = description.into();
        self.description = if text.is_empty() { None } else { Some(text) };
        self
    }

    pub(crate) fn into_transaction(self, id: i64) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            description: self.description,
            date: self.date,
        }
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction type `{other}`")),
        }
    }
}
