//! Change notifications emitted after every successful mutation.

use fintrack_domain::{GoalSplit, LedgerSnapshot};

/// What changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    BalanceReset,
    TransactionAdded { index: usize },
    TransactionEdited { index: usize },
    TransactionDeleted { index: usize },
    GoalSet,
    /// State was reloaded from the store (startup or restore).
    Reloaded,
}

/// Event payload: the kind of change plus the state after it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub snapshot: LedgerSnapshot,
    pub goal: Option<f64>,
    pub split: GoalSplit,
}

/// Subscriber invoked synchronously after a change is persisted.
pub trait ChangeHandler {
    fn handle(&self, event: &ChangeEvent);
}

impl<F> ChangeHandler for F
where
    F: Fn(&ChangeEvent),
{
    fn handle(&self, event: &ChangeEvent) {
        self(event)
    }
}
