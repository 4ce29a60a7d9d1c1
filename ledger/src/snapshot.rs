//! Per-holder balance history.
//!
//! Each holder's history is an append-only list of `(point, balance)` pairs,
//! strictly increasing in point. The first write for a holder inserts a base
//! entry `{point: 0, balance: 0}`; a second write at the same point
//! overwrites the last entry instead of appending, so there is never more
//! than one entry per point.

use flow_types::{Address, OracleError, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A holder's balance as recorded at a specific point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub point: Point,
    pub balance: u128,
}

impl BalanceSnapshot {
    /// The mandatory first entry of every history.
    pub const BASE: Self = Self {
        point: Point::GENESIS,
        balance: 0,
    };
}

/// The ordered snapshot list of a single holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceHistory {
    entries: Vec<BalanceSnapshot>,
}

impl BalanceHistory {
    /// A fresh history holding only the base entry.
    pub fn new() -> Self {
        Self {
            entries: vec![BalanceSnapshot::BASE],
        }
    }

    /// Rebuild a history from raw entries, checking its invariants.
    ///
    /// Returns `None` unless the first entry sits at genesis and points are
    /// strictly increasing.
    pub fn from_entries(entries: Vec<BalanceSnapshot>) -> Option<Self> {
        let starts_at_genesis = entries.first().is_some_and(|e| e.point == Point::GENESIS);
        let strictly_increasing = entries.windows(2).all(|w| w[0].point < w[1].point);
        (starts_at_genesis && strictly_increasing).then_some(Self { entries })
    }

    pub fn entries(&self) -> &[BalanceSnapshot] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record `balance` as the holder's balance at `point`.
    pub fn record(&mut self, balance: u128, point: Point) {
        match self.entries.last_mut() {
            Some(last) if last.point == point => last.balance = balance,
            _ => self.entries.push(BalanceSnapshot { point, balance }),
        }
    }

    /// The balance that was current at `point`.
    ///
    /// Balances persist until changed, so any point at or after the last
    /// entry reports the last balance. Earlier points are resolved by binary
    /// search for the greatest entry whose point is `<= point`.
    pub fn balance_at(&self, point: Point) -> u128 {
        let Some(last) = self.entries.last() else {
            return 0;
        };
        if point >= last.point {
            return last.balance;
        }

        // Here len >= 2: a lone base entry sits at genesis, which every point
        // is >= to.
        let entries = &self.entries;
        let mut low = 0;
        let mut high = entries.len() - 2;
        let mut mid = 0;
        while low < high && entries[mid].point != point {
            mid = (low + high + 1) / 2;
            if entries[mid].point > point {
                high = mid - 1;
            }
            if entries[mid].point < point {
                low = mid;
            }
        }

        if entries[mid].point == point {
            entries[mid].balance
        } else {
            entries[low].balance
        }
    }
}

impl Default for BalanceHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Balance histories for every holder that has ever been written.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStore {
    histories: BTreeMap<Address, BalanceHistory>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current_balance` for `address` at `point`.
    ///
    /// Inserts the base entry on first write. Repeated calls at the same
    /// point overwrite the previous balance for that point.
    pub fn record(&mut self, address: &Address, current_balance: u128, point: Point) {
        let history = self.histories.entry(address.clone()).or_default();
        history.record(current_balance, point);
        tracing::debug!(%address, %point, balance = current_balance, "balance snapshot recorded");
    }

    /// Balance of `address` as of `point`, judged from the `current` point.
    ///
    /// Fails unless `point` is strictly before `current`. Holders without a
    /// history have a balance of zero at every point.
    pub fn balance_at(
        &self,
        address: &Address,
        point: Point,
        current: Point,
    ) -> Result<u128, OracleError> {
        if !point.is_final_at(current) {
            return Err(OracleError::BlockNotFinalized {
                requested: point,
                current,
            });
        }
        Ok(self
            .histories
            .get(address)
            .map_or(0, |history| history.balance_at(point)))
    }

    pub fn history(&self, address: &Address) -> Option<&BalanceHistory> {
        self.histories.get(address)
    }

    /// Number of snapshots stored for `address` (base entry included).
    pub fn snapshot_count(&self, address: &Address) -> usize {
        self.histories.get(address).map_or(0, BalanceHistory::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &BalanceHistory)> {
        self.histories.iter()
    }

    pub(crate) fn insert_history(&mut self, address: Address, history: BalanceHistory) {
        self.histories.insert(address, history);
    }
}
