//! expenseflow-domain
//!
//! Pure domain models (Ledger, Expense, Balances, Settlement).
//! No I/O, no CLI, no storage. Only data types and their accessors.

pub mod common;
pub mod expense;
pub mod ledger;
pub mod settlement;

pub use common::*;
pub use expense::*;
pub use ledger::*;
pub use settlement::*;
