//! fintrack-domain
//!
//! Pure domain models (Transaction, ledger snapshots, goal splits).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod goal;
pub mod snapshot;
pub mod transaction;

pub use common::*;
pub use goal::*;
pub use snapshot::*;
pub use transaction::*;
