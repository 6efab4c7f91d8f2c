//! Relational backend on SQLite.
//!
//! The store keeps only the database path. Each operation opens its own connection and drops
//! it before returning, so no handle outlives a call, including on error paths.

use std::path::{Path, PathBuf};

use rusqlite::{
    params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
    Connection, OptionalExtension, Row,
};
use tracing::{debug, info};

use crate::{
    errors::LedgerResult,
    ledger::{Budget, NewGoal, NewTransaction, SavingsGoal, Transaction, TransactionKind},
};

use super::{LedgerReader, LedgerSnapshot, LedgerStore, MissingIdPolicy, NextIds};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL,
    category TEXT NOT NULL,
    amount REAL NOT NULL,
    description TEXT,
    date TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS budgets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL,
    amount REAL NOT NULL,
    month TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS savings_goals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    target_amount REAL NOT NULL,
    current_amount REAL NOT NULL DEFAULT 0,
    deadline TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

/// Ledger store persisted in a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    policy: MissingIdPolicy,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and ensures the schema exists.
    pub fn open(path: impl Into<PathBuf>, policy: MissingIdPolicy) -> LedgerResult<Self> {
        let store = Self {
            path: path.into(),
            policy,
        };
        if let Some(parent) = store.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = store.connect()?;
        conn.execute_batch(SCHEMA)?;
        info!(path = %store.path.display(), "sqlite ledger ready");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> LedgerResult<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    fn next_sequence(conn: &Connection, table: &str) -> LedgerResult<i64> {
        let seq: Option<i64> = conn
            .query_row(
                "SELECT seq FROM sqlite_sequence WHERE name = ?1",
                params![table],
                |row| row.get(0),
            )
            .optional()?;
        Ok(seq.map_or(1, |value| value + 1))
    }
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get("id")?,
        kind: row.get("type")?,
        category: row.get("category")?,
        amount: row.get("amount")?,
        description: row.get("description")?,
        date: row.get("date")?,
    })
}

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get("id")?,
        category: row.get("category")?,
        amount: row.get("amount")?,
        month: row.get("month")?,
    })
}

fn goal_from_row(row: &Row<'_>) -> rusqlite::Result<SavingsGoal> {
    Ok(SavingsGoal {
        id: row.get("id")?,
        name: row.get("name")?,
        target_amount: row.get("target_amount")?,
        current_amount: row.get("current_amount")?,
        deadline: row.get("deadline")?,
    })
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err: String| FromSqlError::Other(err.into()))
    }
}

impl LedgerReader for SqliteStore {
    fn transactions(&self) -> LedgerResult<Vec<Transaction>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, type, category, amount, description, date FROM transactions ORDER BY id",
        )?;
        let rows = stmt.query_map([], transaction_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn budgets(&self) -> LedgerResult<Vec<Budget>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id, category, amount, month FROM budgets ORDER BY id")?;
        let rows = stmt.query_map([], budget_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn goals(&self) -> LedgerResult<Vec<SavingsGoal>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, target_amount, current_amount, deadline FROM savings_goals ORDER BY id",
        )?;
        let rows = stmt.query_map([], goal_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

impl LedgerStore for SqliteStore {
    fn add_transaction(&mut self, transaction: NewTransaction) -> LedgerResult<Transaction> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO transactions (type, category, amount, description, date) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                transaction.kind,
                transaction.category,
                transaction.amount,
                transaction.description,
                transaction.date
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, kind = %transaction.kind, category = %transaction.category, "transaction added");
        Ok(transaction.into_transaction(id))
    }

    fn delete_transaction(&mut self, id: i64) -> LedgerResult<bool> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        debug!(id, removed, "transaction delete");
        self.policy.resolve("transaction", id, removed > 0)
    }

    fn upsert_budget(
        &mut self,
        category: &str,
        amount: f64,
        month: &str,
    ) -> LedgerResult<Budget> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM budgets WHERE category = ?1 AND month = ?2 ORDER BY id LIMIT 1",
                params![category, month],
                |row| row.get(0),
            )
            .optional()?;
        let id = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE budgets SET amount = ?1 WHERE id = ?2",
                    params![amount, id],
                )?;
                debug!(id, category, month, amount, "budget replaced");
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO budgets (category, amount, month) VALUES (?1, ?2, ?3)",
                    params![category, amount, month],
                )?;
                let id = tx.last_insert_rowid();
                debug!(id, category, month, amount, "budget created");
                id
            }
        };
        tx.commit()?;
        Ok(Budget::new(id, category, amount, month))
    }

    fn add_goal(&mut self, goal: NewGoal) -> LedgerResult<SavingsGoal> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO savings_goals (name, target_amount, current_amount, deadline) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                goal.name,
                goal.target_amount,
                goal.current_amount,
                goal.deadline
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, name = %goal.name, "goal added");
        Ok(goal.into_goal(id))
    }

    fn delete_goal(&mut self, id: i64) -> LedgerResult<bool> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM savings_goals WHERE id = ?1", params![id])?;
        debug!(id, removed, "goal delete");
        self.policy.resolve("savings goal", id, removed > 0)
    }

    fn update_goal_amount(&mut self, id: i64, delta: f64) -> LedgerResult<bool> {
        let conn = self.connect()?;
        let updated = conn.execute(
            "UPDATE savings_goals SET current_amount = current_amount + ?1 WHERE id = ?2",
            params![delta, id],
        )?;
        debug!(id, delta, updated, "goal progress update");
        self.policy.resolve("savings goal", id, updated > 0)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn snapshot(&self) -> LedgerResult<LedgerSnapshot> {
        let mut snapshot = LedgerSnapshot::capture(self)?;
        let conn = self.connect()?;
        snapshot.next_ids = NextIds {
            transaction: Self::next_sequence(&conn, "transactions")?,
            budget: Self::next_sequence(&conn, "budgets")?,
            goal: Self::next_sequence(&conn, "savings_goals")?,
        };
        Ok(snapshot)
    }
}
