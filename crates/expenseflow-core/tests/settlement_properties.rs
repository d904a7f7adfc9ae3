use expenseflow_core::{LedgerService, SettlementPolicy, SettlementService};
use expenseflow_domain::{Balances, Ledger};
use proptest::prelude::*;

const MEMBERS: [&str; 6] = ["Ana", "Bo", "Cy", "Di", "Ed", "Flo"];

/// (amount in cents, payer index, split membership mask)
type ExpenseSpec = (u32, usize, u8);

fn build_ledger(member_count: usize, specs: &[ExpenseSpec]) -> Ledger {
    let mut ledger = Ledger::new();
    for name in &MEMBERS[..member_count] {
        LedgerService::add_member(&mut ledger, name).unwrap();
    }
    for (cents, payer, mask) in specs {
        let payer = MEMBERS[payer % member_count];
        let mut split: Vec<String> = (0..member_count)
            .filter(|index| (*mask >> *index) & 1 == 1)
            .map(|index| MEMBERS[index].to_string())
            .collect();
        if split.is_empty() {
            split.push(payer.to_string());
        }
        let amount = f64::from(*cents) / 100.0;
        LedgerService::add_expense(&mut ledger, "generated", amount, payer, &split).unwrap();
    }
    ledger
}

fn replay(balances: &Balances, engine: &SettlementService) -> Balances {
    let mut remaining = balances.clone();
    for transfer in engine.compute_settlements(balances) {
        remaining.adjust(&transfer.from, transfer.amount);
        remaining.adjust(&transfer.to, -transfer.amount);
    }
    remaining
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Property: balances of a consistent ledger always sum to zero.
    #[test]
    fn balances_are_conserved(
        member_count in 1usize..=6,
        specs in prop::collection::vec((1u32..100_000u32, 0usize..6, any::<u8>()), 0..20)
    ) {
        let ledger = build_ledger(member_count, &specs);
        let balances = SettlementService::default()
            .compute_balances(ledger.members(), ledger.expenses())
            .unwrap();

        prop_assert_eq!(balances.len(), member_count);
        prop_assert!(balances.sum().abs() < 1e-6);
    }

    /// Property: replaying the emitted transfers brings everyone back to zero.
    #[test]
    fn settlements_zero_out_balances(
        member_count in 1usize..=6,
        specs in prop::collection::vec((1u32..100_000u32, 0usize..6, any::<u8>()), 0..20)
    ) {
        let engine = SettlementService::default();
        let ledger = build_ledger(member_count, &specs);
        let balances = engine.compute_balances(ledger.members(), ledger.expenses()).unwrap();
        let slack = engine.policy().tolerance() * (member_count as f64 + 1.0);

        for entry in replay(&balances, &engine).iter() {
            prop_assert!(entry.amount.abs() <= slack, "{} left with {}", entry.name, entry.amount);
        }
    }

    /// Property: nobody ever pays themselves and every transfer is above tolerance.
    #[test]
    fn transfers_are_between_distinct_members(
        member_count in 2usize..=6,
        specs in prop::collection::vec((1u32..100_000u32, 0usize..6, any::<u8>()), 1..20)
    ) {
        let engine = SettlementService::default();
        let ledger = build_ledger(member_count, &specs);
        let balances = engine.compute_balances(ledger.members(), ledger.expenses()).unwrap();
        let settlements = engine.compute_settlements(&balances);

        prop_assert!(settlements.len() < member_count);
        for transfer in &settlements {
            prop_assert_ne!(&transfer.from, &transfer.to);
            prop_assert!(transfer.amount > engine.policy().tolerance());
        }
    }

    /// Property: the same snapshot always yields the same sequence.
    #[test]
    fn settlements_are_deterministic(
        member_count in 1usize..=6,
        specs in prop::collection::vec((1u32..100_000u32, 0usize..6, any::<u8>()), 0..20),
        tolerance_cents in 1u32..100u32
    ) {
        let engine =
            SettlementService::new(SettlementPolicy::new(f64::from(tolerance_cents) / 100.0).unwrap());
        let ledger = build_ledger(member_count, &specs);
        let balances = engine.compute_balances(ledger.members(), ledger.expenses()).unwrap();

        prop_assert_eq!(engine.compute_settlements(&balances), engine.compute_settlements(&balances));
    }
}
