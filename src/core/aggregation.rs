//! Sums and groupings over transaction sets. Every function is total: empty input yields
//! zero or an empty collection.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::ledger::{Transaction, TransactionKind};

/// Summed amount for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Income, expense and their difference over one transaction set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

pub fn total_by_kind<'a, I>(transactions: I, kind: TransactionKind) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|txn| txn.is_kind(kind))
        .map(|txn| txn.amount)
        .sum()
}

/// Sums amounts per category in first-seen order. Categories absent from the input never
/// appear; there is no zero fill.
pub fn group_by_category<'a, I>(transactions: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<CategoryTotal> = Vec::new();
    for txn in transactions {
        match positions.get(txn.category.as_str()) {
            Some(&idx) => grouped[idx].total += txn.amount,
            None => {
                positions.insert(txn.category.as_str(), grouped.len());
                grouped.push(CategoryTotal {
                    category: txn.category.clone(),
                    total: txn.amount,
                });
            }
        }
    }
    grouped
}

/// Distinct categories by exact string match, sorted.
pub fn categories_present<'a, I>(transactions: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .map(|txn| txn.category.clone())
        .collect()
}

pub fn totals<'a, I>(transactions: I) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = Totals::default();
    for txn in transactions {
        match txn.kind {
            TransactionKind::Income => totals.income += txn.amount,
            TransactionKind::Expense => totals.expense += txn.amount,
        }
    }
    totals.balance = totals.income - totals.expense;
    totals
}

pub fn balance<'a, I>(transactions: I) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    totals(transactions).balance
}
