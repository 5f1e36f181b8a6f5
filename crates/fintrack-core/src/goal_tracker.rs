//! Savings goal and its achieved/remaining split.

use fintrack_domain::GoalSplit;
use tracing::debug;

use crate::{persistence, storage::KeyValueStore, validation::ensure_finite, CoreError};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GoalTracker {
    goal: Option<f64>,
}

impl GoalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rehydrate<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self {
            goal: persistence::read_goal(store),
        }
    }

    /// Writes the goal key. An unset goal leaves the store untouched.
    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), CoreError> {
        match self.goal {
            Some(goal) => persistence::write_goal(store, goal),
            None => Ok(()),
        }
    }

    pub fn goal(&self) -> Option<f64> {
        self.goal
    }

    /// Sets a new target. Zero, negative and non-finite values are rejected.
    pub fn set_goal(&mut self, value: f64) -> Result<(), CoreError> {
        let value = ensure_finite(value, "goal")?;
        if value <= 0.0 {
            return Err(CoreError::InvalidInput(
                "goal must be greater than zero".into(),
            ));
        }
        self.goal = Some(value);
        debug!(goal = value, "goal updated");
        Ok(())
    }

    pub fn split(&self, current_balance: f64) -> GoalSplit {
        split(current_balance, self.goal.unwrap_or(0.0))
    }

    /// Share of the goal already covered, clamped to `0.0..=1.0`.
    pub fn progress_ratio(&self, current_balance: f64) -> f64 {
        match self.goal {
            Some(goal) => (self.split(current_balance).achieved / goal).clamp(0.0, 1.0),
            None => 0.0,
        }
    }
}

/// `achieved = min(balance, goal)`, `remaining = max(goal - balance, 0)`.
/// A non-positive goal counts as no goal.
pub fn split(current_balance: f64, goal: f64) -> GoalSplit {
    if goal.is_nan() || goal <= 0.0 {
        return GoalSplit::default();
    }
    GoalSplit::new(
        current_balance.min(goal),
        (goal - current_balance).max(0.0),
    )
}
