//! The per-call execution context supplied by the environment.

use crate::{Address, Point, Timestamp};
use serde::{Deserialize, Serialize};

/// Who is calling, and when.
///
/// Components never read ambient state: the sender, the current ledger point
/// and the current time all arrive through this value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// The immediate caller of the entry point.
    pub sender: Address,
    /// The current ledger point (block level).
    pub level: Point,
    /// The current block timestamp.
    pub now: Timestamp,
}

impl CallContext {
    pub fn new(sender: Address, level: Point, now: Timestamp) -> Self {
        Self { sender, level, now }
    }

    /// The same point in time, seen from a different caller.
    pub fn with_sender(&self, sender: Address) -> Self {
        Self {
            sender,
            level: self.level,
            now: self.now,
        }
    }
}
