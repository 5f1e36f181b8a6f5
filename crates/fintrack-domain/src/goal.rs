use serde::{Deserialize, Serialize};

/// Achieved/remaining decomposition of a savings goal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct GoalSplit {
    pub achieved: f64,
    pub remaining: f64,
}

impl GoalSplit {
    pub fn new(achieved: f64, remaining: f64) -> Self {
        Self {
            achieved,
            remaining,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining <= 0.0 && self.achieved > 0.0
    }
}
