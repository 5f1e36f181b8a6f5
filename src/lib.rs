#![doc(test(attr(deny(warnings))))]

//! FinTrack keeps a running balance over an ordered list of credits and
//! debits, tracks progress toward a savings goal and persists both to a
//! local JSON store. The terminal shell in [`cli`] is the presentation layer.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("FinTrack tracing initialized.");
    });
}
