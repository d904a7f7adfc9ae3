#![doc(test(attr(deny(warnings))))]

//! ExpenseFlow tracks shared expenses within a group, derives each member's
//! net balance, and proposes the transfers that settle everyone up.
//!
//! The pure ledger and settlement logic lives in `expenseflow-core`; this
//! crate wires it to persistence, configuration, and an interactive shell.

pub mod cli;
pub mod errors;
pub mod session;
pub mod utils;

pub use errors::{AppError, Result};
pub use session::Session;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("ExpenseFlow tracing initialized.");
    });
}
