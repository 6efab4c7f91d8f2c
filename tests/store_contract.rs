mod common;

use chrono::NaiveDate;
use common::{for_each_backend, fresh_store, seed_january, BACKENDS};
use finance_core::{
    core::{
        aggregation,
        filter::TransactionFilter,
        services::{BudgetService, ReportService, SavingsService, TransactionService},
        time::{FixedClock, TrendStepping},
    },
    errors::LedgerError,
    ledger::{NewGoal, NewTransaction, TransactionKind},
    storage::{LedgerReader, MissingIdPolicy},
};

fn clock(y: i32, m: u32, d: u32) -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

#[test]
fn totals_and_grouping_match_the_january_ledger() {
    for_each_backend(|backend, store| {
        seed_january(store);
        let transactions = store.transactions().unwrap();

        let expense = aggregation::total_by_kind(&transactions, TransactionKind::Expense);
        assert_eq!(expense, 250.0, "{backend:?}");

        let grouped = aggregation::group_by_category(
            TransactionFilter::new()
                .kind(TransactionKind::Expense)
                .select(&transactions),
        );
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].category, "Food");
        assert_eq!(grouped[0].total, 250.0);
        assert_eq!(grouped.iter().map(|g| g.total).sum::<f64>(), expense);

        let totals = aggregation::totals(&transactions);
        assert_eq!(totals.balance, 750.0);
        assert_eq!(totals.balance, totals.income - totals.expense);
    });
}

#[test]
fn dashboard_balance_is_income_minus_expense() {
    for_each_backend(|backend, store| {
        seed_january(store);
        let summary = ReportService::dashboard(&*store, &clock(2024, 1, 31), 10).unwrap();
        assert_eq!(summary.totals.income, 1000.0, "{backend:?}");
        assert_eq!(summary.totals.expense, 250.0);
        assert_eq!(summary.totals.balance, 750.0);
        assert_eq!(summary.recent.len(), 3);
        assert_eq!(summary.recent[0].date, "2024-01-20");
    });
}

#[test]
fn date_window_selects_the_late_food_expense() {
    for_each_backend(|backend, store| {
        seed_january(store);
        let filter = TransactionFilter::from_query("expense", "all", "2024-01-15", "2024-01-31")
            .unwrap();
        let listed = TransactionService::list(&*store, &filter).unwrap();
        assert_eq!(listed.len(), 1, "{backend:?}");
        assert_eq!(listed[0].category, "Food");
        assert_eq!(listed[0].amount, 50.0);
        assert_eq!(listed[0].date, "2024-01-20");
    });
}

#[test]
fn filter_order_does_not_matter() {
    for_each_backend(|_, store| {
        seed_january(store);
        store
            .add_transaction(NewTransaction::income("Food", 20.0, "2024-01-11"))
            .unwrap();
        let transactions = store.transactions().unwrap();

        let by_kind = TransactionFilter::new().kind(TransactionKind::Expense);
        let by_category = TransactionFilter::new().category("Food");
        let kind_then_category = by_category.apply(&by_kind.apply(&transactions));
        let category_then_kind = by_kind.apply(&by_category.apply(&transactions));
        assert_eq!(kind_then_category, category_then_kind);
        assert_eq!(kind_then_category.len(), 2);
    });
}

#[test]
fn budget_upsert_replaces_and_status_reports_progress() {
    for_each_backend(|backend, store| {
        seed_january(store);
        let first = BudgetService::set(store, "Food", 300.0, "2024-01").unwrap();
        let second = BudgetService::set(store, "Food", 400.0, "2024-01").unwrap();
        assert_eq!(first.id, second.id, "{backend:?}");

        let budgets = store.budgets().unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].amount, 400.0);

        let status = BudgetService::status(&*store, "2024-01").unwrap();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].spent, 250.0);
        assert_eq!(status[0].remaining, 150.0);
        assert_eq!(status[0].percentage, 62.5);
    });
}

#[test]
fn zero_budget_reports_zero_percent() {
    for_each_backend(|backend, store| {
        store
            .add_transaction(NewTransaction::expense("Rent", 900.0, "2024-01-01"))
            .unwrap();
        BudgetService::set(store, "Rent", 0.0, "2024-01").unwrap();
        let status = BudgetService::status(&*store, "2024-01").unwrap();
        assert_eq!(status[0].spent, 900.0, "{backend:?}");
        assert_eq!(status[0].percentage, 0.0);
        assert_eq!(status[0].remaining, -900.0);
        assert!(status[0].is_over());
    });
}

#[test]
fn goals_order_by_deadline_with_undated_last() {
    for_each_backend(|backend, store| {
        for goal in [
            NewGoal::new("A", 100.0).with_deadline("2024-06-01"),
            NewGoal::new("B", 100.0),
            NewGoal::new("C", 100.0).with_deadline("2024-03-01"),
            NewGoal::new("D", 100.0),
        ] {
            SavingsService::add(store, goal).unwrap();
        }
        let names: Vec<String> = SavingsService::list(&*store)
            .unwrap()
            .into_iter()
            .map(|goal| goal.name)
            .collect();
        assert_eq!(names, vec!["C", "A", "B", "D"], "{backend:?}");
    });
}

#[test]
fn goal_balance_has_no_floor() {
    for_each_backend(|backend, store| {
        let goal = SavingsService::add(store, NewGoal::new("Car", 5000.0).with_current(50.0))
            .unwrap();
        assert!(SavingsService::update_amount(store, goal.id, -100.0).unwrap());
        let goals = store.goals().unwrap();
        assert_eq!(goals[0].current_amount, -50.0, "{backend:?}");
    });
}

#[test]
fn six_month_trend_ends_at_the_current_bucket() {
    for_each_backend(|backend, store| {
        seed_january(store);
        for stepping in [TrendStepping::ThirtyDay, TrendStepping::Calendar] {
            let trend =
                ReportService::monthly_trend(&*store, &clock(2024, 3, 15), 6, stepping).unwrap();
            assert_eq!(trend.len(), 6, "{backend:?} {stepping:?}");
            assert!(trend.windows(2).all(|pair| pair[0].month <= pair[1].month));
            assert_eq!(trend[5].month, "2024-03");
            let january = trend.iter().find(|p| p.month == "2024-01").unwrap();
            assert_eq!(january.savings, 750.0);
        }
    });
}

#[test]
fn deleted_ids_are_never_reused() {
    for_each_backend(|backend, store| {
        let ids: Vec<i64> = (1..=3)
            .map(|day| {
                store
                    .add_transaction(NewTransaction::expense("Misc", 1.0, format!("2024-01-0{day}")))
                    .unwrap()
                    .id
            })
            .collect();
        assert_eq!(ids, vec![1, 2, 3], "{backend:?}");
        assert!(store.delete_transaction(3).unwrap());
        let next = store
            .add_transaction(NewTransaction::expense("Misc", 1.0, "2024-01-04"))
            .unwrap();
        assert_ne!(next.id, 3);
        assert_eq!(next.id, 4);
    });
}

#[test]
fn missing_ids_are_ignored_by_default() {
    for_each_backend(|backend, store| {
        assert!(!store.delete_transaction(99).unwrap(), "{backend:?}");
        assert!(!store.delete_goal(99).unwrap());
        assert!(!store.update_goal_amount(99, 10.0).unwrap());
    });
}

#[test]
fn strict_mode_reports_missing_ids() {
    for backend in BACKENDS {
        let mut store = fresh_store(backend, MissingIdPolicy::Error);
        let err = store.delete_transaction(7).unwrap_err();
        assert!(
            matches!(err, LedgerError::NotFound { entity: "transaction", id: 7 }),
            "{backend:?}: {err}"
        );
        assert!(matches!(
            store.update_goal_amount(3, 1.0),
            Err(LedgerError::NotFound { id: 3, .. })
        ));
    }
}
