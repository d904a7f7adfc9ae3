//! Shared traits for ledger entities.

use crate::expense::ExpenseId;

/// Exposes a stable identifier for expenses stored in the ledger.
pub trait Identifiable {
    fn id(&self) -> ExpenseId;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Sums the amounts of any collection of [`Amounted`] entities.
pub fn total_amount<'a, T, I>(items: I) -> f64
where
    T: Amounted + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .fold(0.0, |total, item| total + item.amount())
}
