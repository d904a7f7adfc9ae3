//! Net balances and greedy settlement plans.

use tracing::debug;

use expenseflow_domain::{Balances, Expense, Ledger, Settlement};

use crate::CoreError;

/// Default tolerance, one cent of a two-decimal currency.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// How balances are classified and which transfers are too small to emit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettlementPolicy {
    tolerance: f64,
}

impl SettlementPolicy {
    pub fn new(tolerance: f64) -> Result<Self, CoreError> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(CoreError::Validation(format!(
                "settlement tolerance must be a positive number, got {}",
                tolerance
            )));
        }
        Ok(Self { tolerance })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Classification of a single balance against the tolerance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceStatus {
    /// The group owes this member.
    Owed,
    /// This member owes the group.
    Owes,
    Settled,
}

/// Balances, transfers, and the expense total for one ledger snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementReport {
    pub balances: Balances,
    pub settlements: Vec<Settlement>,
    pub total: f64,
}

#[derive(Debug)]
struct Party<'a> {
    name: &'a str,
    remaining: f64,
}

/// Derives balances and settlement plans from ledger snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementService {
    policy: SettlementPolicy,
}

impl SettlementService {
    pub fn new(policy: SettlementPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SettlementPolicy {
        self.policy
    }

    pub fn classify(&self, amount: f64) -> BalanceStatus {
        let tolerance = self.policy.tolerance;
        if amount > tolerance {
            BalanceStatus::Owed
        } else if amount < -tolerance {
            BalanceStatus::Owes
        } else {
            BalanceStatus::Settled
        }
    }

    /// Computes every member's net balance, in member order.
    ///
    /// The payer is credited the full amount and each split member is debited
    /// an equal share. Names that are not current members are ignored. An
    /// expense with an empty split is rejected before anything is computed.
    pub fn compute_balances(
        &self,
        members: &[String],
        expenses: &[Expense],
    ) -> Result<Balances, CoreError> {
        if let Some(expense) = expenses.iter().find(|expense| expense.is_degenerate()) {
            return Err(CoreError::DegenerateSplit(expense.id));
        }

        let mut balances = Balances::new();
        for member in members {
            balances.insert_member(member);
        }

        for expense in expenses {
            let Some(share) = expense.share() else {
                continue;
            };
            if !balances.adjust(&expense.paid_by, expense.amount) {
                debug!(expense = %expense.id, payer = %expense.paid_by, "payer is not a member");
            }
            for person in &expense.split_between {
                balances.adjust(person, -share);
            }
        }

        Ok(balances)
    }

    /// Reduces balances to a transfer list by greedily pairing the largest
    /// debtor with the largest creditor.
    ///
    /// Ties keep member order, so the same balances always yield the same
    /// sequence.
    pub fn compute_settlements(&self, balances: &Balances) -> Vec<Settlement> {
        let tolerance = self.policy.tolerance;
        let mut debtors = Vec::new();
        let mut creditors = Vec::new();

        for entry in balances.iter() {
            match self.classify(entry.amount) {
                BalanceStatus::Owes => debtors.push(Party {
                    name: &entry.name,
                    remaining: -entry.amount,
                }),
                BalanceStatus::Owed => creditors.push(Party {
                    name: &entry.name,
                    remaining: entry.amount,
                }),
                BalanceStatus::Settled => {}
            }
        }

        debtors.sort_by(|a, b| b.remaining.total_cmp(&a.remaining));
        creditors.sort_by(|a, b| b.remaining.total_cmp(&a.remaining));

        let mut settlements = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < debtors.len() && j < creditors.len() {
            let debtor = &mut debtors[i];
            let creditor = &mut creditors[j];
            let amount = debtor.remaining.min(creditor.remaining);

            if amount > tolerance {
                settlements.push(Settlement::new(debtor.name, creditor.name, amount));
            }

            debtor.remaining -= amount;
            creditor.remaining -= amount;

            if debtor.remaining < tolerance {
                i += 1;
            }
            if creditor.remaining < tolerance {
                j += 1;
            }
        }

        settlements
    }

    /// Runs both computations over a ledger snapshot.
    pub fn settle(&self, ledger: &Ledger) -> Result<SettlementReport, CoreError> {
        let balances = self.compute_balances(ledger.members(), ledger.expenses())?;
        let settlements = self.compute_settlements(&balances);
        Ok(SettlementReport {
            balances,
            settlements,
            total: ledger.total(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use expenseflow_domain::ExpenseId;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    fn expense(id: u64, amount: f64, paid_by: &str, split: &[&str]) -> Expense {
        Expense::new(
            ExpenseId(id),
            "item",
            amount,
            paid_by,
            names(split),
            Utc::now(),
        )
    }

    #[test]
    fn three_way_split_credits_payer() {
        let engine = SettlementService::default();
        let balances = engine
            .compute_balances(
                &names(&["A", "B", "C"]),
                &[expense(1, 90.0, "A", &["A", "B", "C"])],
            )
            .unwrap();

        assert_eq!(balances.get("A"), Some(60.0));
        assert_eq!(balances.get("B"), Some(-30.0));
        assert_eq!(balances.get("C"), Some(-30.0));

        let settlements = engine.compute_settlements(&balances);
        assert_eq!(
            settlements,
            vec![Settlement::new("B", "A", 30.0), Settlement::new("C", "A", 30.0)]
        );
    }

    #[test]
    fn offsetting_expenses_net_out() {
        let engine = SettlementService::default();
        let balances = engine
            .compute_balances(
                &names(&["A", "B"]),
                &[
                    expense(1, 50.0, "A", &["A", "B"]),
                    expense(2, 30.0, "B", &["A", "B"]),
                ],
            )
            .unwrap();

        assert_eq!(balances.get("A"), Some(10.0));
        assert_eq!(balances.get("B"), Some(-10.0));
        assert_eq!(
            engine.compute_settlements(&balances),
            vec![Settlement::new("B", "A", 10.0)]
        );
    }

    #[test]
    fn no_expenses_means_zero_balances_and_no_transfers() {
        let engine = SettlementService::default();
        let balances = engine
            .compute_balances(&names(&["A", "B", "C"]), &[])
            .unwrap();

        assert_eq!(balances.len(), 3);
        assert!(balances.iter().all(|entry| entry.amount == 0.0));
        assert!(engine.compute_settlements(&balances).is_empty());
    }

    #[test]
    fn empty_split_is_rejected() {
        let engine = SettlementService::default();
        let err = engine
            .compute_balances(&names(&["A"]), &[expense(7, 10.0, "A", &[])])
            .unwrap_err();
        assert!(matches!(err, CoreError::DegenerateSplit(ExpenseId(7))));
    }

    #[test]
    fn stale_names_do_not_create_entries() {
        let engine = SettlementService::default();
        let balances = engine
            .compute_balances(
                &names(&["A", "B"]),
                &[expense(1, 40.0, "Ghost", &["A", "B", "Ghost", "Other"])],
            )
            .unwrap();

        assert_eq!(balances.len(), 2);
        assert_eq!(balances.get("A"), Some(-10.0));
        assert_eq!(balances.get("Ghost"), None);
    }

    #[test]
    fn balances_within_tolerance_are_settled() {
        let engine = SettlementService::default();
        let balances: Balances = vec![("A".to_string(), 0.004), ("B".to_string(), -0.004)]
            .into_iter()
            .collect();
        assert_eq!(engine.classify(0.004), BalanceStatus::Settled);
        assert!(engine.compute_settlements(&balances).is_empty());
    }

    #[test]
    fn ties_keep_member_order() {
        let engine = SettlementService::default();
        let balances: Balances = vec![
            ("A".to_string(), -20.0),
            ("B".to_string(), 20.0),
            ("C".to_string(), -20.0),
            ("D".to_string(), 20.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            engine.compute_settlements(&balances),
            vec![Settlement::new("A", "B", 20.0), Settlement::new("C", "D", 20.0)]
        );
    }

    #[test]
    fn largest_debtor_pays_largest_creditor_first() {
        let engine = SettlementService::default();
        let balances: Balances = vec![
            ("A".to_string(), 50.0),
            ("B".to_string(), -10.0),
            ("C".to_string(), -40.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            engine.compute_settlements(&balances),
            vec![Settlement::new("C", "A", 40.0), Settlement::new("B", "A", 10.0)]
        );
    }

    #[test]
    fn custom_tolerance_widens_settled_band() {
        let engine = SettlementService::new(SettlementPolicy::new(1.0).unwrap());
        let balances: Balances = vec![("A".to_string(), 0.5), ("B".to_string(), -0.5)]
            .into_iter()
            .collect();
        assert!(engine.compute_settlements(&balances).is_empty());
    }

    #[test]
    fn policy_rejects_non_positive_tolerance() {
        assert!(SettlementPolicy::new(0.0).is_err());
        assert!(SettlementPolicy::new(f64::NAN).is_err());
        assert_eq!(SettlementPolicy::default().tolerance(), DEFAULT_TOLERANCE);
    }
}
