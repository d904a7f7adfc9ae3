use std::io;

use expenseflow_domain::ExpenseId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid member: {0}")]
    InvalidMember(String),
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Expense {0} has nobody left to split it")]
    DegenerateSplit(ExpenseId),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CoreError {
    /// Benign errors describe a no-op; callers may report them without failing.
    pub fn is_benign(&self) -> bool {
        matches!(self, CoreError::NotFound(_))
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
