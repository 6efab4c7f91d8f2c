//! Ledger records: transactions, monthly budgets and savings goals.

pub mod budget;
pub mod goal;
pub mod transaction;

pub use budget::Budget;
pub use goal::{NewGoal, SavingsGoal, NO_DEADLINE_SENTINEL};
pub use transaction::{NewTransaction, Transaction, TransactionKind};
