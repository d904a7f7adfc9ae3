//! expenseflow-core
//!
//! Business logic for ExpenseFlow: ledger mutation rules, the settlement
//! engine, the key-value persistence seam, and export snapshots.
//! Depends on expenseflow-domain. No CLI, no terminal I/O, no direct file access.

pub mod error;
pub mod export_service;
pub mod ledger_service;
pub mod settlement_service;
pub mod storage;


pub use error::CoreError;
pub use export_service::*;
pub use ledger_service::*;
pub use settlement_service::*;
pub use storage::{KeyValueStore, LedgerStore, MemoryStore};
