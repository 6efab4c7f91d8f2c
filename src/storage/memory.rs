//! In-memory backend: id-keyed arenas plus a `(category, month)` index for budgets.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::{
    errors::LedgerResult,
    ledger::{Budget, NewGoal, NewTransaction, SavingsGoal, Transaction},
};

use super::{next_after, LedgerReader, LedgerSnapshot, LedgerStore, MissingIdPolicy, NextIds};

/// Monotonic id source. Never hands out a value twice, even after deletions.
#[derive(Debug, Clone, Copy)]
struct IdAllocator {
    next: i64,
}

impl IdAllocator {
    fn starting_at(next: i64) -> Self {
        Self { next: next.max(1) }
    }

    fn allocate(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

/// Ledger store that keeps every record in process memory.
///
/// Arenas are keyed by id, and ids are allocated monotonically, so iteration order equals
/// insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    transactions: BTreeMap<i64, Transaction>,
    budgets: BTreeMap<i64, Budget>,
    budget_index: HashMap<(String, String), i64>,
    goals: BTreeMap<i64, SavingsGoal>,
    transaction_ids: IdAllocator,
    budget_ids: IdAllocator,
    goal_ids: IdAllocator,
    policy: MissingIdPolicy,
}

impl MemoryStore {
    pub const BACKEND_NAME: &'static str = "memory";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MissingIdPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> MissingIdPolicy {
        self.policy
    }

    /// Rebuilds a store from a snapshot. Allocators never fall behind the largest stored id.
    pub fn from_snapshot(snapshot: LedgerSnapshot, policy: MissingIdPolicy) -> Self {
        let LedgerSnapshot {
            transactions,
            budgets,
            goals,
            next_ids,
        } = snapshot;

        let transaction_next =
            next_ids.transaction.max(next_after(transactions.iter().map(|t| t.id)));
        let budget_next = next_ids.budget.max(next_after(budgets.iter().map(|b| b.id)));
        let goal_next = next_ids.goal.max(next_after(goals.iter().map(|g| g.id)));

        let mut store = Self {
            transactions: transactions.into_iter().map(|t| (t.id, t)).collect(),
            goals: goals.into_iter().map(|g| (g.id, g)).collect(),
            transaction_ids: IdAllocator::starting_at(transaction_next),
            budget_ids: IdAllocator::starting_at(budget_next),
            goal_ids: IdAllocator::starting_at(goal_next),
            policy,
            ..Self::default()
        };
        for budget in budgets {
            store
                .budget_index
                .insert((budget.category.clone(), budget.month.clone()), budget.id);
            store.budgets.insert(budget.id, budget);
        }
        store
    }
}

impl LedgerReader for MemoryStore {
    fn transactions(&self) -> LedgerResult<Vec<Transaction>> {
        Ok(self.transactions.values().cloned().collect())
    }

    fn budgets(&self) -> LedgerResult<Vec<Budget>> {
        Ok(self.budgets.values().cloned().collect())
    }

    fn goals(&self) -> LedgerResult<Vec<SavingsGoal>> {
        Ok(self.goals.values().cloned().collect())
    }
}

impl LedgerStore for MemoryStore {
    fn add_transaction(&mut self, transaction: NewTransaction) -> LedgerResult<Transaction> {
        let id = self.transaction_ids.allocate();
        let stored = transaction.into_transaction(id);
        self.transactions.insert(id, stored.clone());
        debug!(id, kind = %stored.kind, category = %stored.category, "transaction added");
        Ok(stored)
    }

    fn delete_transaction(&mut self, id: i64) -> LedgerResult<bool> {
        let found = self.transactions.remove(&id).is_some();
        debug!(id, found, "transaction delete");
        self.policy.resolve("transaction", id, found)
    }

    fn upsert_budget(
        &mut self,
        category: &str,
        amount: f64,
        month: &str,
    ) -> LedgerResult<Budget> {
        let key = (category.to_string(), month.to_string());
        if let Some(existing) = self
            .budget_index
            .get(&key)
            .and_then(|id| self.budgets.get_mut(id))
        {
            existing.amount = amount;
            debug!(id = existing.id, category, month, amount, "budget replaced");
            return Ok(existing.clone());
        }

        let id = self.budget_ids.allocate();
        let budget = Budget::new(id, category, amount, month);
        self.budget_index.insert(key, id);
        self.budgets.insert(id, budget.clone());
        debug!(id, category, month, amount, "budget created");
        Ok(budget)
    }

    fn add_goal(&mut self, goal: NewGoal) -> LedgerResult<SavingsGoal> {
        let id = self.goal_ids.allocate();
        let stored = goal.into_goal(id);
        self.goals.insert(id, stored.clone());
        debug!(id, name = %stored.name, "goal added");
        Ok(stored)
    }

    fn delete_goal(&mut self, id: i64) -> LedgerResult<bool> {
        let found = self.goals.remove(&id).is_some();
        debug!(id, found, "goal delete");
        self.policy.resolve("savings goal", id, found)
    }

    fn update_goal_amount(&mut self, id: i64, delta: f64) -> LedgerResult<bool> {
        let found = match self.goals.get_mut(&id) {
            Some(goal) => {
                goal.apply_delta(delta);
                true
            }
            None => false,
        };
        debug!(id, delta, found, "goal progress update");
        self.policy.resolve("savings goal", id, found)
    }

    fn backend_name(&self) -> &'static str {
        Self::BACKEND_NAME
    }

    fn snapshot(&self) -> LedgerResult<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            transactions: self.transactions()?,
            budgets: self.budgets()?,
            goals: self.goals()?,
            next_ids: NextIds {
                transaction: self.transaction_ids.next,
                budget: self.budget_ids.next,
                goal: self.goal_ids.next,
            },
        })
    }
}
