use serde::{Deserialize, Serialize};

/// A spending limit for one category in one month.
///
/// At most one budget exists per `(category, month)`; stores enforce this by upserting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category: String,
    pub amount: f64,
    /// `YYYY-MM`.
    pub month: String,
}

impl Budget {
    pub fn new(id: i64, category: impl Into<String>, amount: f64, month: impl Into<String>) -> Self {
        Self {
            id,
            category: category.into(),
            amount,
            month: month.into(),
        }
    }

    pub fn matches_key(&self, category: &str, month: &str) -> bool {
        self.category == category && self.month == month
    }
}
