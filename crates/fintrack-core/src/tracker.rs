//! Session facade that keeps the ledger, the goal and the store in step.

use fintrack_domain::{GoalSplit, LedgerSnapshot, Transaction, TransactionKind};
use tracing::{info, warn};

use crate::{
    events::{ChangeEvent, ChangeHandler, ChangeKind},
    presentation::{AmountFormatter, Dashboard},
    storage::KeyValueStore,
    CoreError, GoalTracker, Ledger,
};

/// Owns the session state and its store.
///
/// A mutation that passes validation is applied in memory, written to the
/// store and announced to every subscribed [`ChangeHandler`]. A mutation that
/// fails validation changes nothing and writes nothing. If the write itself
/// fails the in-memory change is kept and the storage error is returned.
pub struct Tracker<S: KeyValueStore> {
    ledger: Ledger,
    goal: GoalTracker,
    store: S,
    handlers: Vec<Box<dyn ChangeHandler>>,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Rehydrates ledger and goal from `store`.
    pub fn open(store: S) -> Self {
        let ledger = Ledger::rehydrate(&store);
        let goal = GoalTracker::rehydrate(&store);
        info!(
            transactions = ledger.len(),
            balance = ledger.current_balance(),
            goal = ?goal.goal(),
            "tracker opened"
        );
        Self {
            ledger,
            goal,
            store,
            handlers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl ChangeHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn goal(&self) -> &GoalTracker {
        &self.goal
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access for backend maintenance. Call [`Tracker::reload`]
    /// after changing stored values behind the tracker's back.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    pub fn goal_split(&self) -> GoalSplit {
        self.goal.split(self.ledger.current_balance())
    }

    pub fn dashboard(&self, formatter: &dyn AmountFormatter) -> Dashboard {
        Dashboard::build(
            &self.ledger.snapshot(),
            self.goal.goal(),
            self.goal_split(),
            formatter,
        )
    }

    pub fn set_initial_balance(&mut self, value: f64) -> Result<LedgerSnapshot, CoreError> {
        self.ledger.set_initial_balance(value)?;
        self.commit_ledger(ChangeKind::BalanceReset)
    }

    pub fn add_transaction(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        description: &str,
    ) -> Result<LedgerSnapshot, CoreError> {
        self.ledger.add_transaction(kind, amount, description)?;
        let index = self.ledger.len() - 1;
        self.commit_ledger(ChangeKind::TransactionAdded { index })
    }

    pub fn edit_transaction(
        &mut self,
        index: usize,
        new_amount: f64,
        new_description: &str,
    ) -> Result<LedgerSnapshot, CoreError> {
        self.ledger
            .edit_transaction(index, new_amount, new_description)?;
        self.commit_ledger(ChangeKind::TransactionEdited { index })
    }

    /// Deletes the entry at `index` and returns it.
    pub fn delete_transaction(&mut self, index: usize) -> Result<Transaction, CoreError> {
        let removed = self.ledger.delete_transaction(index)?;
        self.commit_ledger(ChangeKind::TransactionDeleted { index })?;
        Ok(removed)
    }

    pub fn set_goal(&mut self, value: f64) -> Result<GoalSplit, CoreError> {
        self.goal.set_goal(value)?;
        let persisted = self.goal.persist(&mut self.store);
        self.finish(ChangeKind::GoalSet, persisted)?;
        Ok(self.goal_split())
    }

    /// Discards in-memory state and rehydrates from the store.
    pub fn reload(&mut self) {
        self.ledger = Ledger::rehydrate(&self.store);
        self.goal = GoalTracker::rehydrate(&self.store);
        self.notify(ChangeKind::Reloaded);
    }

    fn commit_ledger(&mut self, kind: ChangeKind) -> Result<LedgerSnapshot, CoreError> {
        let persisted = self.ledger.persist(&mut self.store);
        self.finish(kind, persisted)?;
        Ok(self.ledger.snapshot())
    }

    fn finish(&mut self, kind: ChangeKind, persisted: Result<(), CoreError>) -> Result<(), CoreError> {
        if let Err(err) = &persisted {
            warn!(?kind, error = %err, "change applied in memory but not persisted");
        }
        self.notify(kind);
        persisted
    }

    fn notify(&self, kind: ChangeKind) {
        if self.handlers.is_empty() {
            return;
        }
        let event = ChangeEvent {
            kind,
            snapshot: self.ledger.snapshot(),
            goal: self.goal.goal(),
            split: self.goal_split(),
        };
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }
}
