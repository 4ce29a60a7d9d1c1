//! Ledger points: the discrete time axis used for balance snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monotonically increasing position in the observed ledger's history
/// (a block level).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Point(u64);

impl Point {
    /// The origin point. Every balance history starts here with a zero balance.
    pub const GENESIS: Self = Self(0);

    pub fn new(level: u64) -> Self {
        Self(level)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The point immediately before this one, or `None` at genesis.
    pub fn previous(&self) -> Option<Point> {
        self.0.checked_sub(1).map(Self)
    }

    /// Move forward by `levels`, saturating at `u64::MAX`.
    pub fn advance(&self, levels: u64) -> Point {
        Self(self.0.saturating_add(levels))
    }

    /// Whether this point is final relative to `current`.
    ///
    /// Only points strictly before the current one are final: balances at the
    /// current point may still change.
    pub fn is_final_at(&self, current: Point) -> bool {
        self.0 < current.0
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for Point {
    fn from(level: u64) -> Self {
        Self(level)
    }
}
