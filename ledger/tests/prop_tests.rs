use proptest::prelude::*;

use flow_ledger::{BalanceHistory, SnapshotLedger};
use flow_types::{Address, CallContext, Point, Timestamp};

/// Linear reference: balance of the latest entry at or before `point`.
fn reference_balance(writes: &[(u64, u128)], point: u64) -> u128 {
    let mut balance = 0;
    for &(p, b) in writes {
        if p <= point {
            balance = b;
        }
    }
    balance
}

/// Non-decreasing points with balances, as the ledger would observe them.
fn write_sequence() -> impl Strategy<Value = Vec<(u64, u128)>> {
    prop::collection::vec((0u64..4, 0u128..1_000), 0..40).prop_map(|steps| {
        let mut point = 0;
        steps
            .into_iter()
            .map(|(gap, balance)| {
                point += gap;
                (point, balance)
            })
            .collect()
    })
}

proptest! {
    /// Binary search agrees with a linear scan for every queried point.
    #[test]
    fn balance_at_matches_linear_reference(writes in write_sequence(), extra in 0u64..10) {
        let mut history = BalanceHistory::new();
        for &(p, b) in &writes {
            history.record(b, Point::new(p));
        }
        let last = writes.last().map_or(0, |w| w.0);
        for point in 0..=last + extra {
            prop_assert_eq!(
                history.balance_at(Point::new(point)),
                reference_balance(&writes, point),
                "point {}", point
            );
        }
    }

    /// One entry per distinct point, sorted, starting at genesis.
    #[test]
    fn history_has_one_entry_per_point(writes in write_sequence()) {
        let mut history = BalanceHistory::new();
        for &(p, b) in &writes {
            history.record(b, Point::new(p));
        }
        let entries = history.entries();
        prop_assert_eq!(entries[0].point, Point::GENESIS);
        prop_assert!(entries.windows(2).all(|w| w[0].point < w[1].point));

        let mut distinct: Vec<u64> = writes.iter().map(|w| w.0).filter(|&p| p > 0).collect();
        distinct.dedup();
        prop_assert_eq!(entries.len(), distinct.len() + 1);
    }

    /// Recording twice at the same point keeps the latest balance and length.
    #[test]
    fn record_is_idempotent_per_point(
        writes in write_sequence(),
        first in 0u128..1_000,
        second in 0u128..1_000,
    ) {
        let mut history = BalanceHistory::new();
        for &(p, b) in &writes {
            history.record(b, Point::new(p));
        }
        let point = Point::new(writes.last().map_or(0, |w| w.0) + 1);
        history.record(first, point);
        let len = history.len();
        history.record(second, point);
        prop_assert_eq!(history.len(), len);
        prop_assert_eq!(history.balance_at(point), second);
    }

    /// Without writes between p1 < p2, both points report the same balance.
    #[test]
    fn forward_fill_between_writes(
        amount in 1u128..1_000_000,
        mint_at in 1u64..50,
        p1_offset in 0u64..50,
        gap in 1u64..50,
    ) {
        let admin = Address::new("tz1admin");
        let holder = Address::new("tz1holder");
        let mut ledger = SnapshotLedger::new(admin.clone());
        let ctx = CallContext::new(admin, Point::new(mint_at), Timestamp::EPOCH);
        ledger.mint(&ctx, &holder, amount).unwrap();

        let p1 = Point::new(mint_at + p1_offset);
        let p2 = p1.advance(gap);
        let current = p2.advance(1);
        prop_assert_eq!(
            ledger.balance_at(&holder, p1, current).unwrap(),
            ledger.balance_at(&holder, p2, current).unwrap()
        );
        prop_assert_eq!(ledger.balance_at(&holder, p1, current).unwrap(), amount);
    }

    /// Transfers conserve the total supply.
    #[test]
    fn transfers_conserve_supply(amounts in prop::collection::vec(0u128..50, 1..20)) {
        let admin = Address::new("tz1admin");
        let a = Address::new("tz1a");
        let b = Address::new("tz1b");
        let mut ledger = SnapshotLedger::new(admin.clone());
        ledger
            .mint(&CallContext::new(admin, Point::new(1), Timestamp::EPOCH), &a, 1_000)
            .unwrap();
        for (i, amount) in amounts.iter().enumerate() {
            let ctx = CallContext::new(a.clone(), Point::new(2 + i as u64), Timestamp::EPOCH);
            ledger.transfer(&ctx, &a, &b, *amount).unwrap();
        }
        prop_assert_eq!(ledger.balance_of(&a) + ledger.balance_of(&b), ledger.total_supply());
    }
}
