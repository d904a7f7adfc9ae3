//! Text rendering for amounts, balances, and ledger rows.

use expenseflow_core::BalanceStatus;
use expenseflow_domain::{Displayable, Expense, Settlement};

/// Formats money with a currency symbol and two decimals, e.g. `$12.30`.
#[derive(Debug, Clone)]
pub struct MoneyFormat {
    symbol: String,
}

impl MoneyFormat {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn amount(&self, value: f64) -> String {
        let sign = if value < 0.0 && format!("{:.2}", value.abs()) != "0.00" {
            "-"
        } else {
            ""
        };
        format!("{}{}{:.2}", sign, self.symbol, value.abs())
    }

    /// `+$60.00` for credits, `-$30.00` for debts, `settled` inside the band.
    pub fn balance(&self, value: f64, status: BalanceStatus) -> String {
        match status {
            BalanceStatus::Owed => format!("+{}{:.2}", self.symbol, value.abs()),
            BalanceStatus::Owes => format!("-{}{:.2}", self.symbol, value.abs()),
            BalanceStatus::Settled => "settled".to_string(),
        }
    }

    pub fn settlement(&self, settlement: &Settlement) -> String {
        format!(
            "{} → {}: {}",
            settlement.from,
            settlement.to,
            self.amount(settlement.amount)
        )
    }

    pub fn expense(&self, expense: &Expense) -> String {
        format!(
            "#{} {}  {}  {}  {}",
            expense.id,
            expense.date.format("%Y-%m-%d"),
            expense.description,
            self.amount(expense.amount),
            expense.display_label()
        )
    }
}
