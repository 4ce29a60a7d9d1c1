//! Errors shared across the oracle boundary.

use crate::Point;
use thiserror::Error;

/// Failures a [`BalanceOracle`](crate::BalanceOracle) may report.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("point {requested} is not finalized (current point {current})")]
    BlockNotFinalized { requested: Point, current: Point },
}
