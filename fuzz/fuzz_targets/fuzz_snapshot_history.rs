#![no_main]

use arbitrary::Arbitrary;
use flow_ledger::BalanceHistory;
use flow_types::Point;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    /// (point increment, balance) pairs; a zero increment rewrites the last point.
    writes: Vec<(u8, u128)>,
    queries: Vec<u16>,
}

// Binary search over a history must agree with a linear scan.
fuzz_target!(|input: Input| {
    let mut history = BalanceHistory::new();
    let mut point = 1u64;
    for (step, balance) in input.writes {
        point += u64::from(step);
        history.record(balance, Point::new(point));
    }

    for query in input.queries {
        let query = Point::new(u64::from(query));
        let expected = history
            .entries()
            .iter()
            .rev()
            .find(|entry| entry.point <= query)
            .map_or(0, |entry| entry.balance);
        assert_eq!(history.balance_at(query), expected);
    }
});
