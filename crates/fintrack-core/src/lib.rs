//! fintrack-core
//!
//! Ledger state management for the tracker: balance bookkeeping, the savings
//! goal, validation, the key-value persistence contract and render-ready views.
//! Depends on fintrack-domain. No CLI, no terminal I/O, no file access.

pub mod error;
pub mod events;
pub mod goal_tracker;
pub mod ledger;
pub mod persistence;
pub mod presentation;
pub mod storage;
pub mod tracker;
pub mod validation;

pub use error::CoreError;
pub use events::{ChangeEvent, ChangeHandler, ChangeKind};
pub use goal_tracker::GoalTracker;
pub use ledger::Ledger;
pub use presentation::{
    AmountFormatter, BarChart, Dashboard, GoalPie, PresentationAdapter, SymbolFormatter,
    TransactionRow,
};
pub use storage::{KeyValueStore, MemoryStore};
pub use tracker::Tracker;
