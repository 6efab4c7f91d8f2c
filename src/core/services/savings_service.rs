use tracing::info;

use crate::ledger::{NewGoal, SavingsGoal};
use crate::storage::{LedgerReader, LedgerStore};

use super::ServiceResult;

pub struct SavingsService;

impl SavingsService {
    pub fn add<S: LedgerStore + ?Sized>(
        store: &mut S,
        goal: NewGoal,
    ) -> ServiceResult<SavingsGoal> {
        let stored = store.add_goal(goal)?;
        info!(id = stored.id, name = %stored.name, target = stored.target_amount, "goal created");
        Ok(stored)
    }

    pub fn delete<S: LedgerStore + ?Sized>(store: &mut S, id: i64) -> ServiceResult<bool> {
        let removed = store.delete_goal(id)?;
        if removed {
            info!(id, "goal deleted");
        }
        Ok(removed)
    }

    /// Adds `delta` (possibly negative) to the goal's balance. No clamping is applied.
    pub fn update_amount<S: LedgerStore + ?Sized>(
        store: &mut S,
        id: i64,
        delta: f64,
    ) -> ServiceResult<bool> {
        let updated = store.update_goal_amount(id, delta)?;
        if updated {
            info!(id, delta, "goal progress recorded");
        }
        Ok(updated)
    }

    /// Goals by ascending deadline; undated goals last. Equal keys keep store order.
    pub fn list<R: LedgerReader + ?Sized>(store: &R) -> ServiceResult<Vec<SavingsGoal>> {
        let mut goals = store.goals()?;
        goals.sort_by(|a, b| a.deadline_key().cmp(b.deadline_key()));
        Ok(goals)
    }

    /// Percentage of the target reached; 0 when the target is not positive.
    pub fn progress(goal: &SavingsGoal) -> f64 {
        if goal.target_amount > 0.0 {
            goal.current_amount / goal.target_amount * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn undated_goals_sort_last() {
        let mut store = MemoryStore::new();
        SavingsService::add(&mut store, NewGoal::new("A", 100.0).with_deadline("2024-06-01"))
            .unwrap();
        SavingsService::add(&mut store, NewGoal::new("B", 100.0)).unwrap();
        SavingsService::add(&mut store, NewGoal::new("C", 100.0).with_deadline("2024-03-01"))
            .unwrap();
        SavingsService::add(&mut store, NewGoal::new("D", 100.0)).unwrap();

        let names: Vec<String> = SavingsService::list(&store)
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["C", "A", "B", "D"]);
    }

    #[test]
    fn progress_is_not_clamped() {
        let mut store = MemoryStore::new();
        let goal =
            SavingsService::add(&mut store, NewGoal::new("Laptop", 100.0).with_current(50.0))
                .unwrap();
        assert!(SavingsService::update_amount(&mut store, goal.id, -100.0).unwrap());
        let stored = &store.goals().unwrap()[0];
        assert_eq!(stored.current_amount, -50.0);

        SavingsService::update_amount(&mut store, goal.id, 300.0).unwrap();
        let stored = &store.goals().unwrap()[0];
        assert_eq!(SavingsService::progress(stored), 250.0);
    }

    #[test]
    fn zero_target_progress_is_zero() {
        let goal = NewGoal::new("Nothing", 0.0).with_current(10.0);
        let mut store = MemoryStore::new();
        let stored = SavingsService::add(&mut store, goal).unwrap();
        assert_eq!(SavingsService::progress(&stored), 0.0);
    }

    #[test]
    fn updating_unknown_goal_is_a_no_op() {
        let mut store = MemoryStore::new();
        assert!(!SavingsService::update_amount(&mut store, 42, 10.0).unwrap());
        assert!(!SavingsService::delete(&mut store, 42).unwrap());
    }
}
