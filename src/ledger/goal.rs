use serde::{Deserialize, Serialize};

/// Sort key used for goals without a deadline so they land after every dated goal.
pub const NO_DEADLINE_SENTINEL: &str = "9999-12-31";

/// A savings target tracked by accumulating deposits and withdrawals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i64,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl SavingsGoal {
    pub fn deadline_key(&self) -> &str {
        self.deadline.as_deref().unwrap_or(NO_DEADLINE_SENTINEL)
    }

    /// Adds `delta` without clamping; the balance may exceed the target or go negative.
    pub fn apply_delta(&mut self, delta: f64) {
        self.current_amount += delta;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<String>,
}

impl NewGoal {
    pub fn new(name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            deadline: None,
        }
    }

    pub fn with_current(mut self, current_amount: f64) -> Self {
        self.current_amount = current_amount;
        self
    }

    /// Sets the deadline; an empty string means no deadline.
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        let text = deadline.into();
        self.deadline = if text.trim().is_empty() { None } else { Some(text) };
        self
    }

    pub(crate) fn into_goal(self, id: i64) -> SavingsGoal {
        SavingsGoal {
            id,
            name: self.name,
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            deadline: self.deadline,
        }
    }
}
