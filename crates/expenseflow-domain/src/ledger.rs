use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    common::{total_amount, Identifiable},
    expense::{Expense, ExpenseId},
};

/// Ordered members and expenses of a single expense group.
///
/// The struct only stores data; validation and cascading rules live in the
/// core crate's `LedgerService`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger directly from persisted values without validation.
    pub fn from_parts(members: Vec<String>, expenses: Vec<Expense>) -> Self {
        Self { members, expenses }
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn contains_member(&self, name: &str) -> bool {
        self.members.iter().any(|member| member == name)
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id() == id)
    }

    pub fn last_expense_id(&self) -> Option<ExpenseId> {
        self.expenses.iter().map(Identifiable::id).max()
    }

    /// Id for an expense created at `now`. Normally clock-derived and past
    /// every existing id; once the id space above the largest id is used up
    /// the lowest unused id is handed out instead.
    pub fn next_expense_id(&self, now: DateTime<Utc>) -> ExpenseId {
        ExpenseId::next_after(self.last_expense_id(), now)
            .unwrap_or_else(|| self.lowest_free_expense_id())
    }

    fn lowest_free_expense_id(&self) -> ExpenseId {
        let taken: HashSet<ExpenseId> = self.expenses.iter().map(Identifiable::id).collect();
        (0..=u64::MAX)
            .map(ExpenseId)
            .find(|id| !taken.contains(id))
            .unwrap_or(ExpenseId(0))
    }

    /// Sum of every expense amount.
    pub fn total(&self) -> f64 {
        total_amount(&self.expenses)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.expenses.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }
}
