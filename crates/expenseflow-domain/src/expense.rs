use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{Amounted, Displayable, Identifiable};

/// Numeric expense identifier; serialized as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub u64);

impl ExpenseId {
    /// Returns an id derived from `now` that is strictly greater than `floor`,
    /// or `None` when `floor` is already the largest representable id.
    pub fn next_after(floor: Option<ExpenseId>, now: DateTime<Utc>) -> Option<Self> {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        match floor {
            Some(ExpenseId(last)) if last >= millis => last.checked_add(1).map(ExpenseId),
            _ => Some(ExpenseId(millis)),
        }
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shared cost paid by one member and split evenly between several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
    pub split_between: Vec<String>,
    pub date: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        id: ExpenseId,
        description: impl Into<String>,
        amount: f64,
        paid_by: impl Into<String>,
        split_between: Vec<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            amount,
            paid_by: paid_by.into(),
            split_between,
            date,
        }
    }

    /// Equal per-head share, or `None` when nobody is left in the split.
    pub fn share(&self) -> Option<f64> {
        if self.split_between.is_empty() {
            None
        } else {
            Some(self.amount / self.split_between.len() as f64)
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.split_between.is_empty()
    }

    pub fn involves(&self, member: &str) -> bool {
        self.paid_by == member || self.split_between.iter().any(|name| name == member)
    }
}

impl Identifiable for Expense {
    fn id(&self) -> ExpenseId {
        self.id
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!(
            "Paid by {} • Split: {}",
            self.paid_by,
            self.split_between.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).single().unwrap()
    }

    #[test]
    fn next_id_follows_clock_when_ahead_of_ledger() {
        let id = ExpenseId::next_after(Some(ExpenseId(10)), at(1_700_000_000_000));
        assert_eq!(id, Some(ExpenseId(1_700_000_000_000)));
    }

    #[test]
    fn next_id_bumps_past_existing_ids_in_same_millisecond() {
        let now = at(1_700_000_000_000);
        let first = ExpenseId::next_after(None, now).unwrap();
        let second = ExpenseId::next_after(Some(first), now).unwrap();
        assert!(second > first);
    }

    #[test]
    fn next_id_is_none_past_the_largest_id() {
        assert_eq!(ExpenseId::next_after(Some(ExpenseId(u64::MAX)), at(0)), None);
    }

    #[test]
    fn serializes_with_original_field_names() {
        let expense = Expense::new(
            ExpenseId(42),
            "Dinner",
            90.0,
            "A",
            vec!["A".into(), "B".into()],
            at(0),
        );
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["paidBy"], "A");
        assert_eq!(json["splitBetween"][1], "B");
        assert_eq!(json["date"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn share_is_none_for_empty_split() {
        let expense = Expense::new(ExpenseId(1), "Taxi", 12.0, "A", Vec::new(), at(0));
        assert_eq!(expense.share(), None);
        assert!(expense.is_degenerate());
    }
}
