pub mod json_backend;
pub mod memory;
pub mod sqlite;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

use crate::{
    errors::{LedgerError, LedgerResult},
    ledger::{Budget, NewGoal, NewTransaction, SavingsGoal, Transaction},
};

pub use json_backend::{load_snapshot_from_path, save_snapshot_to_path};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Read-only view over the ledger collections. Reporting code depends only on this.
pub trait LedgerReader {
    /// All transactions in insertion order.
    fn transactions(&self) -> LedgerResult<Vec<Transaction>>;
    /// All budgets in creation order.
    fn budgets(&self) -> LedgerResult<Vec<Budget>>;
    /// All savings goals in creation order.
    fn goals(&self) -> LedgerResult<Vec<SavingsGoal>>;
}

/// Abstraction over persistence backends that own the ledger collections.
///
/// Deleting or updating an unknown id returns `Ok(false)` unless the backend was built with
/// [`MissingIdPolicy::Error`], in which case it fails with [`LedgerError::NotFound`].
pub trait LedgerStore: LedgerReader + Send {
    fn add_transaction(&mut self, transaction: NewTransaction) -> LedgerResult<Transaction>;
    fn delete_transaction(&mut self, id: i64) -> LedgerResult<bool>;
    fn upsert_budget(&mut self, category: &str, amount: f64, month: &str)
        -> LedgerResult<Budget>;
    fn add_goal(&mut self, goal: NewGoal) -> LedgerResult<SavingsGoal>;
    fn delete_goal(&mut self, id: i64) -> LedgerResult<bool>;
    fn update_goal_amount(&mut self, id: i64, delta: f64) -> LedgerResult<bool>;

    /// Human-readable backend name for diagnostics.
    fn backend_name(&self) -> &'static str;

    /// Copies every collection along with the id allocator state.
    fn snapshot(&self) -> LedgerResult<LedgerSnapshot> {
        LedgerSnapshot::capture(self)
    }
}

/// How id-scoped mutations treat ids that match no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingIdPolicy {
    /// Unknown ids are a silent no-op; repeated deletes are idempotent.
    #[default]
    Ignore,
    /// Unknown ids are reported as [`LedgerError::NotFound`].
    Error,
}

impl MissingIdPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            MissingIdPolicy::Error
        } else {
            MissingIdPolicy::Ignore
        }
    }

    /// Maps the outcome of an id-scoped mutation onto this policy.
    pub(crate) fn resolve(self, entity: &'static str, id: i64, found: bool) -> LedgerResult<bool> {
        match (found, self) {
            (true, _) => Ok(true),
            (false, MissingIdPolicy::Ignore) => Ok(false),
            (false, MissingIdPolicy::Error) => {
                warn!(entity, id, "id-scoped mutation matched no record");
                Err(LedgerError::NotFound { entity, id })
            }
        }
    }
}

/// Portable copy of every collection plus the id allocator state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub goals: Vec<SavingsGoal>,
    #[serde(default)]
    pub next_ids: NextIds,
}

/// Next id each allocator will hand out. Zero means "derive from the records".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextIds {
    pub transaction: i64,
    pub budget: i64,
    pub goal: i64,
}

impl LedgerSnapshot {
    /// Copies the current contents of any reader, deriving allocator state from the records.
    pub fn capture<R: LedgerReader + ?Sized>(reader: &R) -> LedgerResult<Self> {
        let transactions = reader.transactions()?;
        let budgets = reader.budgets()?;
        let goals = reader.goals()?;
        let next_ids = NextIds {
            transaction: next_after(transactions.iter().map(|t| t.id)),
            budget: next_after(budgets.iter().map(|b| b.id)),
            goal: next_after(goals.iter().map(|g| g.id)),
        };
        Ok(Self {
            transactions,
            budgets,
            goals,
            next_ids,
        })
    }

    /// Rejects duplicate ids and more than one budget per `(category, month)`.
    pub fn validate(&self) -> LedgerResult<()> {
        unique_ids("transaction", self.transactions.iter().map(|t| t.id))?;
        unique_ids("budget", self.budgets.iter().map(|b| b.id))?;
        unique_ids("savings goal", self.goals.iter().map(|g| g.id))?;

        let mut keys = HashSet::new();
        for budget in &self.budgets {
            if !keys.insert((budget.category.as_str(), budget.month.as_str())) {
                return Err(LedgerError::InvalidRecord(format!(
                    "more than one budget for {} in {}",
                    budget.category, budget.month
                )));
            }
        }
        Ok(())
    }
}

fn unique_ids(entity: &str, ids: impl Iterator<Item = i64>) -> LedgerResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(LedgerError::InvalidRecord(format!("duplicate {entity} id {id}")));
        }
    }
    Ok(())
}

pub(crate) fn next_after(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().map_or(1, |max| max + 1)
}
