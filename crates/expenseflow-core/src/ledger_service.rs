//! Validation and cascading rules for ledger mutations.
//!
//! Every operation validates before it mutates, so a rejected call leaves the
//! ledger exactly as it was.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use expenseflow_domain::{Expense, ExpenseId, Ledger};

use crate::CoreError;

/// What a member removal cascaded into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberRemoval {
    pub member: String,
    /// Expenses deleted because the member paid for them.
    pub paid_expenses_removed: usize,
    /// Expenses deleted because nobody was left in their split.
    pub emptied_expenses_removed: usize,
    /// Remaining expenses the member was stripped from.
    pub splits_pruned: usize,
}

impl MemberRemoval {
    pub fn expenses_removed(&self) -> usize {
        self.paid_expenses_removed + self.emptied_expenses_removed
    }
}

/// Provides the mutation operations for [`Ledger`] instances.
pub struct LedgerService;

impl LedgerService {
    /// Adds a trimmed, non-empty, not yet present member name.
    pub fn add_member(ledger: &mut Ledger, name: &str) -> Result<String, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidMember("name must not be empty".into()));
        }
        if ledger.contains_member(name) {
            return Err(CoreError::InvalidMember(format!(
                "`{}` is already a member",
                name
            )));
        }
        ledger.members.push(name.to_string());
        debug!(member = name, "member added");
        Ok(name.to_string())
    }

    /// Removes a member, every expense they paid, and their share of every
    /// other expense. Expenses left without anyone to split them are removed
    /// too, which keeps balances zero-sum.
    pub fn remove_member(ledger: &mut Ledger, name: &str) -> Result<MemberRemoval, CoreError> {
        if !ledger.contains_member(name) {
            return Err(CoreError::NotFound(format!("member `{}`", name)));
        }

        let mut report = MemberRemoval {
            member: name.to_string(),
            ..MemberRemoval::default()
        };

        ledger.members.retain(|member| member != name);

        let before = ledger.expenses.len();
        ledger.expenses.retain(|expense| expense.paid_by != name);
        report.paid_expenses_removed = before - ledger.expenses.len();

        for expense in &mut ledger.expenses {
            let split_len = expense.split_between.len();
            expense.split_between.retain(|member| member != name);
            if expense.split_between.len() != split_len {
                report.splits_pruned += 1;
            }
        }

        let before = ledger.expenses.len();
        ledger.expenses.retain(|expense| !expense.is_degenerate());
        report.emptied_expenses_removed = before - ledger.expenses.len();

        debug!(
            member = name,
            paid_removed = report.paid_expenses_removed,
            emptied_removed = report.emptied_expenses_removed,
            splits_pruned = report.splits_pruned,
            "member removed"
        );
        Ok(report)
    }

    /// Adds an expense stamped with the current time and returns its id.
    pub fn add_expense(
        ledger: &mut Ledger,
        description: &str,
        amount: f64,
        paid_by: &str,
        split_between: &[String],
    ) -> Result<ExpenseId, CoreError> {
        Self::add_expense_at(
            ledger,
            description,
            amount,
            paid_by,
            split_between,
            Utc::now(),
        )
    }

    /// Same as [`LedgerService::add_expense`] with an explicit creation time.
    ///
    /// Payer and split names are not checked against the member list; names
    /// that are not members simply do not contribute to any balance.
    pub fn add_expense_at(
        ledger: &mut Ledger,
        description: &str,
        amount: f64,
        paid_by: &str,
        split_between: &[String],
        date: DateTime<Utc>,
    ) -> Result<ExpenseId, CoreError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(CoreError::InvalidExpense(
                "description must not be empty".into(),
            ));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::InvalidExpense(format!(
                "amount must be a positive number, got {}",
                amount
            )));
        }
        let paid_by = paid_by.trim();
        if paid_by.is_empty() {
            return Err(CoreError::InvalidExpense("payer must be provided".into()));
        }
        let split = dedup_names(split_between);
        if split.is_empty() {
            return Err(CoreError::InvalidExpense(
                "select at least one member to split with".into(),
            ));
        }

        let id = ledger.next_expense_id(date);
        ledger
            .expenses
            .push(Expense::new(id, description, amount, paid_by, split, date));
        debug!(expense = %id, amount, payer = paid_by, "expense added");
        Ok(id)
    }

    /// Deletes the expense with `id` and returns it.
    pub fn remove_expense(ledger: &mut Ledger, id: ExpenseId) -> Result<Expense, CoreError> {
        let index = ledger
            .expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("expense {}", id)))?;
        let removed = ledger.expenses.remove(index);
        debug!(expense = %id, "expense removed");
        Ok(removed)
    }

    /// Empties members and expenses unconditionally.
    pub fn clear(ledger: &mut Ledger) {
        ledger.members.clear();
        ledger.expenses.clear();
        debug!("ledger cleared");
    }

    /// Rebuilds a ledger from persisted values, dropping duplicate or blank
    /// members and any expense `add_expense` would have rejected, including
    /// ones that can no longer be split.
    pub fn restore(members: Vec<String>, expenses: Vec<Expense>) -> Ledger {
        let mut seen = HashSet::new();
        let mut kept_members = Vec::with_capacity(members.len());
        for member in members {
            let trimmed = member.trim();
            if trimmed.is_empty() || !seen.insert(trimmed.to_string()) {
                warn!(member = %member, "dropping blank or duplicate stored member");
                continue;
            }
            kept_members.push(trimmed.to_string());
        }

        let mut kept_expenses = Vec::with_capacity(expenses.len());
        for expense in expenses {
            if let Some(problem) = stored_expense_problem(&expense) {
                warn!(expense = %expense.id, problem, "dropping invalid stored expense");
                continue;
            }
            kept_expenses.push(expense);
        }

        Ledger::from_parts(kept_members, kept_expenses)
    }
}

/// Why a stored expense cannot be loaded, if it cannot.
fn stored_expense_problem(expense: &Expense) -> Option<&'static str> {
    if expense.description.trim().is_empty() {
        Some("empty description")
    } else if !expense.amount.is_finite() || expense.amount <= 0.0 {
        Some("amount is not a positive number")
    } else if expense.paid_by.trim().is_empty() {
        Some("missing payer")
    } else if expense.is_degenerate() {
        Some("empty split")
    } else {
        None
    }
}

fn dedup_names(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}
