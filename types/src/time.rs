//! Timestamp type used throughout the engine.
//!
//! Timestamps are Unix epoch seconds (UTC) as reported by the execution
//! environment. Nothing in the workspace reads the system clock on its own.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Shift by a signed number of seconds, saturating at both ends.
    ///
    /// Governance periods are signed durations, so a negative period moves
    /// the timestamp backwards.
    pub fn add_seconds(&self, secs: i64) -> Timestamp {
        Self(self.0.saturating_add_signed(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
