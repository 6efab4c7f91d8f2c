//! Business logic helpers for recording and listing transactions.

use std::collections::BTreeSet;

use tracing::info;

use crate::core::{
    aggregation,
    filter::{sort_recent_first, TransactionFilter},
};
use crate::ledger::{NewTransaction, Transaction};
use crate::storage::{LedgerReader, LedgerStore};

use super::ServiceResult;

pub struct TransactionService;

impl TransactionService {
    /// Records a transaction and returns it with its assigned id.
    pub fn add<S: LedgerStore + ?Sized>(
        store: &mut S,
        transaction: NewTransaction,
    ) -> ServiceResult<Transaction> {
        let stored = store.add_transaction(transaction)?;
        info!(id = stored.id, kind = %stored.kind, amount = stored.amount, "transaction recorded");
        Ok(stored)
    }

    /// Deletes by id. Returns `false` when nothing matched and the store ignores missing ids.
    pub fn delete<S: LedgerStore + ?Sized>(store: &mut S, id: i64) -> ServiceResult<bool> {
        let removed = store.delete_transaction(id)?;
        if removed {
            info!(id, "transaction deleted");
        }
        Ok(removed)
    }

    /// Default listing: filtered, most recent date first, newest id first within a date.
    pub fn list<R: LedgerReader + ?Sized>(
        store: &R,
        filter: &TransactionFilter,
    ) -> ServiceResult<Vec<Transaction>> {
        let mut listed = filter.apply(&store.transactions()?);
        sort_recent_first(&mut listed);
        Ok(listed)
    }

    /// The `limit` most recent transactions.
    pub fn recent<R: LedgerReader + ?Sized>(
        store: &R,
        limit: usize,
    ) -> ServiceResult<Vec<Transaction>> {
        let mut listed = Self::list(store, &TransactionFilter::new())?;
        listed.truncate(limit);
        Ok(listed)
    }

    /// Every category that appears on at least one transaction.
    pub fn categories<R: LedgerReader + ?Sized>(store: &R) -> ServiceResult<BTreeSet<String>> {
        Ok(aggregation::categories_present(&store.transactions()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionKind;
    use crate::storage::MemoryStore;

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        for txn in [
            NewTransaction::income("Salary", 1000.0, "2024-01-05"),
            NewTransaction::expense("Food", 200.0, "2024-01-10"),
            NewTransaction::expense("Food", 50.0, "2024-01-20"),
            NewTransaction::expense("Rent", 600.0, "2024-01-10"),
        ] {
            TransactionService::add(&mut store, txn).unwrap();
        }
        store
    }

    #[test]
    fn list_sorts_recent_first_after_filtering() {
        let store = seeded();
        let expenses = TransactionService::list(
            &store,
            &TransactionFilter::new().kind(TransactionKind::Expense),
        )
        .unwrap();
        let ids: Vec<i64> = expenses.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 4, 2]);
    }

    #[test]
    fn recent_truncates() {
        let store = seeded();
        let recent = TransactionService::recent(&store, 2).unwrap();
        assert_eq!(recent.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn delete_unknown_id_is_a_no_op() {
        let mut store = seeded();
        assert!(!TransactionService::delete(&mut store, 99).unwrap());
        assert_eq!(store.transactions().unwrap().len(), 4);
    }

    #[test]
    fn categories_are_sorted_and_distinct() {
        let store = seeded();
        let categories: Vec<String> = TransactionService::categories(&store)
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(categories, vec!["Food", "Rent", "Salary"]);
    }
}
